use std::collections::{BTreeMap, HashSet};

use tracing::{debug, warn};

use crate::ifc::naming::warn_malformed_name;
use crate::ifc::{AttrValue, Attributes, BuildContext, ExportError, GroupKind, Mesh, Result, SceneObject, classify_group, infer_class_name, split_name};

/// Group index to the ordered leaf indices it directly contains.
pub type ContainmentMap = BTreeMap<usize, Vec<usize>>;

/// One de-duplicated geometry payload.
#[derive(Debug, Clone)]
pub struct RepresentationRecord<'a> {
	/// Mesh identity.
	pub name: &'a str,
	/// Mesh payload.
	pub mesh: &'a Mesh,
}

/// One group record (spatial structure element or the context).
#[derive(Debug, Clone)]
pub struct StructureRecord<'a> {
	/// Inferred class.
	pub class: String,
	/// Inferred display name.
	pub name: String,
	/// Raw naming string from the scene.
	pub raw_name: &'a str,
	/// Entity attributes.
	pub attributes: Attributes,
}

/// One selected leaf object.
#[derive(Debug, Clone)]
pub struct ProductRecord<'a> {
	/// Inferred class.
	pub class: String,
	/// Inferred display name.
	pub name: String,
	/// Source object.
	pub object: &'a SceneObject,
	/// Entity attributes, `Name` plus harvested metadata.
	pub attributes: Attributes,
	/// Index into [`FlatScene::representations`].
	pub representation: Option<usize>,
	/// Index into [`FlatScene::structures`] of the containing group.
	pub structure: Option<usize>,
}

/// Flat record set for one export run.
#[derive(Debug, Clone)]
pub struct FlatScene<'a> {
	/// Root context record.
	pub context: StructureRecord<'a>,
	/// Spatial structure records in group order.
	pub structures: Vec<StructureRecord<'a>>,
	/// Geometry records in first-reference order.
	pub representations: Vec<RepresentationRecord<'a>>,
	/// Leaf records in selection order.
	pub products: Vec<ProductRecord<'a>>,
	/// Leaves grouped by their containing structure.
	pub containment: ContainmentMap,
	/// Raw names of groups that directly contain at least one leaf.
	pub name_filter: HashSet<&'a str>,
}

impl FlatScene<'_> {
	/// Index of the structure record with display name `name`.
	pub fn structure_index(&self, name: &str) -> Option<usize> {
		self.structures.iter().position(|item| item.name == name)
	}
}

/// Flatten the scene into typed records and the containment map.
pub fn flatten_scene<'a>(ctx: &BuildContext<'a>) -> Result<FlatScene<'a>> {
	for collection in &ctx.scene.collections {
		if split_name(&collection.name, ctx.options.separator).is_none() {
			warn_malformed_name(&collection.name, ctx.options.separator);
		}
	}

	let context = find_context(ctx)?;
	let structures = collect_structures(ctx);
	let representations = collect_representations(ctx)?;

	let mut flat = FlatScene {
		context,
		structures,
		representations,
		products: Vec::new(),
		containment: ContainmentMap::new(),
		name_filter: HashSet::new(),
	};

	for object in ctx.scene.selected_objects() {
		let product_index = flat.products.len();
		let product = flatten_product(ctx, &mut flat, object, product_index)?;
		flat.products.push(product);
	}

	debug!(
		structures = flat.structures.len(),
		representations = flat.representations.len(),
		products = flat.products.len(),
		"scene flattened"
	);
	Ok(flat)
}

fn flatten_product<'a>(ctx: &BuildContext<'a>, flat: &mut FlatScene<'a>, object: &'a SceneObject, product_index: usize) -> Result<ProductRecord<'a>> {
	let (class, name) = infer_class_name(&object.name, ctx.options.separator);

	let mut attributes = Attributes::new();
	attributes.insert("Name".to_owned(), AttrValue::Text(name.clone()));
	for (key, value) in &object.metadata {
		if let Some(attribute) = key.strip_prefix(ctx.options.attribute_marker.as_str()) {
			attributes.insert(attribute.to_owned(), AttrValue::from(value));
		}
	}

	let representation = match object.mesh.as_deref() {
		Some(mesh) => flat.representations.iter().position(|item| item.name == mesh),
		None => None,
	};

	// first qualifying membership wins
	let mut structure = None;
	for collection in ctx.scene.users_collection(&object.name) {
		if classify_group(&collection.name, ctx.options) != Some(GroupKind::Structure) {
			continue;
		}
		let (_, group_name) = infer_class_name(&collection.name, ctx.options.separator);
		let index = flat.structure_index(&group_name).ok_or(ExportError::UnresolvedStructure { name: group_name })?;
		flat.containment.entry(index).or_default().push(product_index);
		flat.name_filter.insert(collection.name.as_str());
		structure = Some(index);
		break;
	}
	if structure.is_none() {
		warn!(class = %class, display_name = %name, "object is not assigned to any spatial structure");
	}

	Ok(ProductRecord {
		class,
		name,
		object,
		attributes,
		representation,
		structure,
	})
}

fn find_context<'a>(ctx: &BuildContext<'a>) -> Result<StructureRecord<'a>> {
	let mut contexts = ctx
		.scene
		.collections
		.iter()
		.filter(|item| classify_group(&item.name, ctx.options) == Some(GroupKind::Context));

	let Some(first) = contexts.next() else {
		return Err(ExportError::MissingContext {
			expected: ctx.options.context_classes.join(", "),
		});
	};
	for extra in contexts {
		warn!(group = %extra.name, kept = %first.name, "ignoring additional context group");
	}

	Ok(structure_record(ctx, &first.name))
}

fn collect_structures<'a>(ctx: &BuildContext<'a>) -> Vec<StructureRecord<'a>> {
	ctx.scene
		.collections
		.iter()
		.filter(|item| classify_group(&item.name, ctx.options) == Some(GroupKind::Structure))
		.map(|item| structure_record(ctx, &item.name))
		.collect()
}

fn structure_record<'a>(ctx: &BuildContext<'a>, raw_name: &'a str) -> StructureRecord<'a> {
	let (class, name) = infer_class_name(raw_name, ctx.options.separator);
	let attributes = Attributes::from([("Name".to_owned(), AttrValue::Text(name.clone()))]);
	StructureRecord {
		class,
		name,
		raw_name,
		attributes,
	}
}

fn collect_representations<'a>(ctx: &BuildContext<'a>) -> Result<Vec<RepresentationRecord<'a>>> {
	let mut records: Vec<RepresentationRecord<'a>> = Vec::new();
	for object in ctx.scene.selected_objects() {
		let Some(name) = object.mesh.as_deref() else {
			continue;
		};
		if records.iter().any(|item| item.name == name) {
			continue;
		}

		let mesh = ctx.scene.mesh(name).ok_or_else(|| ExportError::MissingMesh {
			object: object.name.clone(),
			mesh: name.to_owned(),
		})?;
		mesh.validate()?;
		records.push(RepresentationRecord { name, mesh });
	}
	Ok(records)
}
