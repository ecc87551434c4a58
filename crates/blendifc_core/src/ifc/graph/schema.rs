use crate::ifc::{AttrValue, Attributes, GraphError, is_global_id};

#[derive(Debug, Clone, Copy)]
enum AttrKind {
	GlobalId,
	Text,
	Label,
	Integer,
	Number,
	Boolean,
	Entity,
	Entities,
	Numbers,
}

impl AttrKind {
	fn label(self) -> &'static str {
		match self {
			Self::GlobalId => "22-character GlobalId",
			Self::Text => "text",
			Self::Label => "enum or text",
			Self::Integer => "integer",
			Self::Number => "number",
			Self::Boolean => "boolean",
			Self::Entity => "entity",
			Self::Entities => "list of entities",
			Self::Numbers => "list of numbers",
		}
	}

	fn accepts(self, value: &AttrValue) -> bool {
		match (self, value) {
			(Self::GlobalId, AttrValue::Text(text)) => is_global_id(text),
			(Self::Text, AttrValue::Text(_)) => true,
			(Self::Label, AttrValue::Text(_) | AttrValue::Enum(_)) => true,
			(Self::Integer, AttrValue::Int(_)) => true,
			(Self::Number, AttrValue::Int(_) | AttrValue::Real(_)) => true,
			(Self::Boolean, AttrValue::Bool(_)) => true,
			(Self::Entity, AttrValue::Entity(_)) => true,
			(Self::Entities, AttrValue::List(items)) => items.iter().all(|item| matches!(item, AttrValue::Entity(_))),
			(Self::Numbers, AttrValue::List(items)) => items.iter().all(|item| matches!(item, AttrValue::Int(_) | AttrValue::Real(_))),
			_ => false,
		}
	}
}

const ATTRIBUTES: &[(&str, AttrKind)] = &[
	// rooted entities
	("GlobalId", AttrKind::GlobalId),
	("OwnerHistory", AttrKind::Entity),
	("Name", AttrKind::Text),
	("Description", AttrKind::Text),
	("ObjectType", AttrKind::Text),
	("LongName", AttrKind::Text),
	("Tag", AttrKind::Text),
	("Phase", AttrKind::Text),
	("LandTitleNumber", AttrKind::Text),
	("CompositionType", AttrKind::Label),
	("PredefinedType", AttrKind::Label),
	("Elevation", AttrKind::Number),
	("ElevationOfRefHeight", AttrKind::Number),
	("ElevationOfTerrain", AttrKind::Number),
	("RefLatitude", AttrKind::Numbers),
	("RefLongitude", AttrKind::Numbers),
	("ObjectPlacement", AttrKind::Entity),
	("Representation", AttrKind::Entity),
	("RepresentationContexts", AttrKind::Entities),
	("UnitsInContext", AttrKind::Entity),
	// relations
	("RelatingObject", AttrKind::Entity),
	("RelatedObjects", AttrKind::Entities),
	("RelatingStructure", AttrKind::Entity),
	("RelatedElements", AttrKind::Entities),
	// placement
	("PlacementRelTo", AttrKind::Entity),
	("RelativePlacement", AttrKind::Entity),
	("Location", AttrKind::Entity),
	("Axis", AttrKind::Entity),
	("RefDirection", AttrKind::Entity),
	("Coordinates", AttrKind::Numbers),
	("DirectionRatios", AttrKind::Numbers),
	// representation contexts
	("ContextIdentifier", AttrKind::Text),
	("ContextType", AttrKind::Text),
	("CoordinateSpaceDimension", AttrKind::Integer),
	("Precision", AttrKind::Number),
	("WorldCoordinateSystem", AttrKind::Entity),
	("TrueNorth", AttrKind::Entity),
	("ParentContext", AttrKind::Entity),
	("TargetScale", AttrKind::Number),
	("TargetView", AttrKind::Label),
	("UserDefinedTargetView", AttrKind::Text),
	// topology and shape
	("Polygon", AttrKind::Entities),
	("Bound", AttrKind::Entity),
	("Orientation", AttrKind::Boolean),
	("Bounds", AttrKind::Entities),
	("CfsFaces", AttrKind::Entities),
	("Outer", AttrKind::Entity),
	("ContextOfItems", AttrKind::Entity),
	("RepresentationIdentifier", AttrKind::Text),
	("RepresentationType", AttrKind::Text),
	("Items", AttrKind::Entities),
	("Representations", AttrKind::Entities),
];

fn is_known_class(class: &str) -> bool {
	class.len() > 3 && class.starts_with("Ifc") && class.bytes().all(|byte| byte.is_ascii_alphanumeric())
}

/// Check `attributes` against the attribute table; `entity_count` bounds valid references.
pub(crate) fn validate(class: &str, attributes: &Attributes, entity_count: usize) -> Result<(), GraphError> {
	if !is_known_class(class) {
		return Err(GraphError::UnknownClass { class: class.to_owned() });
	}

	for (name, value) in attributes {
		let Some((_, kind)) = ATTRIBUTES.iter().find(|(item, _)| item == name) else {
			return Err(GraphError::UnknownAttribute {
				class: class.to_owned(),
				attribute: name.clone(),
			});
		};
		if !kind.accepts(value) {
			return Err(GraphError::AttributeType {
				class: class.to_owned(),
				attribute: name.clone(),
				expected: kind.label(),
				got: value.kind(),
			});
		}
		if let Some(target) = dangling_reference(value, entity_count) {
			return Err(GraphError::DanglingReference {
				class: class.to_owned(),
				attribute: name.clone(),
				target,
			});
		}
	}

	Ok(())
}

fn dangling_reference(value: &AttrValue, entity_count: usize) -> Option<crate::ifc::EntityRef> {
	match value {
		// ids are 1-based, matching STEP instance names
		AttrValue::Entity(target) if target.0 == 0 || target.0 as usize > entity_count => Some(*target),
		AttrValue::List(items) => items.iter().find_map(|item| dangling_reference(item, entity_count)),
		_ => None,
	}
}
