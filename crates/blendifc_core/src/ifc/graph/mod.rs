use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::ifc::MetaValue;

mod memory;
mod schema;

pub use memory::{Entity, MemoryGraph};

/// Handle to an entity created by an [`EntityGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EntityRef(pub u32);

impl fmt::Display for EntityRef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}", self.0)
	}
}

/// One attribute value on an entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttrValue {
	/// Boolean value.
	Bool(bool),
	/// Integer value.
	Int(i64),
	/// Floating-point value.
	Real(f64),
	/// String value.
	Text(String),
	/// Enumeration literal.
	Enum(String),
	/// Reference to another entity.
	Entity(EntityRef),
	/// Ordered aggregate.
	List(Vec<AttrValue>),
}

/// Attribute name to value mapping.
pub type Attributes = BTreeMap<String, AttrValue>;

/// Build an [`Attributes`] map from fixed pairs.
pub fn attributes<const N: usize>(pairs: [(&str, AttrValue); N]) -> Attributes {
	pairs.into_iter().map(|(name, value)| (name.to_owned(), value)).collect()
}

impl From<&MetaValue> for AttrValue {
	fn from(value: &MetaValue) -> Self {
		match value {
			MetaValue::Bool(item) => Self::Bool(*item),
			MetaValue::Int(item) => Self::Int(*item),
			MetaValue::Real(item) => Self::Real(*item),
			MetaValue::Text(item) => Self::Text(item.clone()),
		}
	}
}

impl From<EntityRef> for AttrValue {
	fn from(value: EntityRef) -> Self {
		Self::Entity(value)
	}
}

impl AttrValue {
	/// Aggregate of entity references.
	pub fn entities(items: impl IntoIterator<Item = EntityRef>) -> Self {
		Self::List(items.into_iter().map(Self::Entity).collect())
	}

	/// Aggregate of real numbers.
	pub fn reals(items: impl IntoIterator<Item = f64>) -> Self {
		Self::List(items.into_iter().map(Self::Real).collect())
	}

	/// Short kind label for diagnostics.
	pub fn kind(&self) -> &'static str {
		match self {
			Self::Bool(_) => "boolean",
			Self::Int(_) => "integer",
			Self::Real(_) => "real",
			Self::Text(_) => "text",
			Self::Enum(_) => "enum",
			Self::Entity(_) => "entity",
			Self::List(_) => "list",
		}
	}
}

/// Errors reported by an entity graph library.
#[derive(Debug, Error)]
pub enum GraphError {
	/// Class tag is not a recognised entity class.
	#[error("unknown entity class {class}")]
	UnknownClass {
		/// Rejected class tag.
		class: String,
	},
	/// Attribute name is not defined for entities.
	#[error("{class} has no attribute {attribute}")]
	UnknownAttribute {
		/// Entity class.
		class: String,
		/// Rejected attribute name.
		attribute: String,
	},
	/// Attribute value has the wrong kind.
	#[error("{class}.{attribute} expects {expected}, got {got}")]
	AttributeType {
		/// Entity class.
		class: String,
		/// Attribute name.
		attribute: String,
		/// Expected value kind.
		expected: &'static str,
		/// Supplied value kind.
		got: &'static str,
	},
	/// Entity reference does not point at an existing entity.
	#[error("{class}.{attribute} references missing entity {target}")]
	DanglingReference {
		/// Entity class.
		class: String,
		/// Attribute name.
		attribute: String,
		/// Missing target.
		target: EntityRef,
	},
	/// Filesystem failure while writing the graph.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// Serialization failure while writing the graph.
	#[error("json: {0}")]
	Json(#[from] serde_json::Error),
}

/// Entity graph library the emitter writes into.
///
/// Only [`EntityGraph::create_entity`] and [`EntityGraph::new_global_id`] are
/// required; the geometry and relation helpers are expressed through them.
pub trait EntityGraph {
	/// Create a typed entity from a class tag and attribute set.
	fn create_entity(&mut self, class: &str, attributes: Attributes) -> Result<EntityRef, GraphError>;

	/// Generate a new globally unique identifier.
	fn new_global_id(&mut self) -> String;

	/// `IfcCartesianPoint` at `coordinates`.
	fn cartesian_point(&mut self, coordinates: [f64; 3]) -> Result<EntityRef, GraphError> {
		self.create_entity("IfcCartesianPoint", attributes([("Coordinates", AttrValue::reals(coordinates))]))
	}

	/// `IfcDirection` with `ratios`.
	fn direction(&mut self, ratios: [f64; 3]) -> Result<EntityRef, GraphError> {
		self.create_entity("IfcDirection", attributes([("DirectionRatios", AttrValue::reals(ratios))]))
	}

	/// `IfcAxis2Placement3D` at `location` with default axes.
	fn axis_placement(&mut self, location: EntityRef) -> Result<EntityRef, GraphError> {
		self.create_entity("IfcAxis2Placement3D", attributes([("Location", location.into())]))
	}

	/// `IfcLocalPlacement` of `relative` inside `rel_to` (absolute when `None`).
	fn local_placement(&mut self, rel_to: Option<EntityRef>, relative: EntityRef) -> Result<EntityRef, GraphError> {
		let mut attrs = attributes([("RelativePlacement", relative.into())]);
		if let Some(parent) = rel_to {
			attrs.insert("PlacementRelTo".to_owned(), parent.into());
		}
		self.create_entity("IfcLocalPlacement", attrs)
	}

	/// `IfcPolyLoop` through `points` in the given order.
	fn poly_loop(&mut self, points: Vec<EntityRef>) -> Result<EntityRef, GraphError> {
		self.create_entity("IfcPolyLoop", attributes([("Polygon", AttrValue::entities(points))]))
	}

	/// `IfcFaceOuterBound` around `bound`.
	fn face_outer_bound(&mut self, bound: EntityRef, orientation: bool) -> Result<EntityRef, GraphError> {
		self.create_entity("IfcFaceOuterBound", attributes([("Bound", bound.into()), ("Orientation", AttrValue::Bool(orientation))]))
	}

	/// `IfcFace` from its bounds.
	fn face(&mut self, bounds: Vec<EntityRef>) -> Result<EntityRef, GraphError> {
		self.create_entity("IfcFace", attributes([("Bounds", AttrValue::entities(bounds))]))
	}

	/// `IfcClosedShell` over `faces`.
	fn closed_shell(&mut self, faces: Vec<EntityRef>) -> Result<EntityRef, GraphError> {
		self.create_entity("IfcClosedShell", attributes([("CfsFaces", AttrValue::entities(faces))]))
	}

	/// `IfcRelAggregates` declaring `related` as structural children of `relating`.
	fn rel_aggregates(&mut self, owner_history: EntityRef, relating: EntityRef, related: Vec<EntityRef>) -> Result<EntityRef, GraphError> {
		let global_id = self.new_global_id();
		self.create_entity(
			"IfcRelAggregates",
			attributes([
				("GlobalId", AttrValue::Text(global_id)),
				("OwnerHistory", owner_history.into()),
				("RelatingObject", relating.into()),
				("RelatedObjects", AttrValue::entities(related)),
			]),
		)
	}

	/// `IfcRelContainedInSpatialStructure` placing `related` inside `relating`.
	fn rel_contained_in_spatial_structure(&mut self, owner_history: EntityRef, related: Vec<EntityRef>, relating: EntityRef) -> Result<EntityRef, GraphError> {
		let global_id = self.new_global_id();
		self.create_entity(
			"IfcRelContainedInSpatialStructure",
			attributes([
				("GlobalId", AttrValue::Text(global_id)),
				("OwnerHistory", owner_history.into()),
				("RelatedElements", AttrValue::entities(related)),
				("RelatingStructure", relating.into()),
			]),
		)
	}
}
