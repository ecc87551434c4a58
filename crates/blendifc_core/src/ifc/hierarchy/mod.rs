use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, warn};

use crate::ifc::{BuildContext, Collection, ExportError, FlatScene, GroupKind, Result, Scene, classify_group, infer_class_name};

/// One retained spatial structure group and its retained children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HierarchyNode {
	/// Index into [`FlatScene::structures`].
	pub structure: usize,
	/// Retained child nodes in group order.
	pub children: Vec<HierarchyNode>,
}

/// Build the pruned spatial structure forest that attaches beneath the context.
///
/// Roots are the context group's children followed by every other top-level
/// group. Non-structure groups produce no node; their retained descendants are
/// hoisted into the enclosing level. A structure group is kept when it directly
/// contains a leaf (it is in the flattener's name filter) or keeps at least one
/// child.
///
/// The whole group graph is checked for cycles first, including groups that no
/// root reaches.
pub fn resolve_hierarchy(ctx: &BuildContext<'_>, flat: &FlatScene<'_>) -> Result<Vec<HierarchyNode>> {
	ensure_acyclic(ctx.scene)?;

	let context_name = flat.context.raw_name;
	let context = ctx.scene.collection(context_name).ok_or_else(|| ExportError::UnresolvedStructure {
		name: flat.context.name.clone(),
	})?;

	let mut resolver = Resolver {
		ctx,
		flat,
		placed: HashSet::new(),
	};

	let mut forest = resolver.build_level(context_name, &context.children)?;

	let top_level: Vec<String> = ctx
		.scene
		.top_level_collections()
		.filter(|item| item.name != context_name)
		.map(|item| item.name.clone())
		.collect();
	forest.extend(resolver.build_level(context_name, &top_level)?);

	debug!(roots = forest.len(), "spatial hierarchy resolved");
	Ok(forest)
}

struct Resolver<'c, 'a> {
	ctx: &'c BuildContext<'a>,
	flat: &'c FlatScene<'a>,
	placed: HashSet<&'a str>,
}

impl<'a> Resolver<'_, 'a> {
	fn build_level(&mut self, parent: &str, names: &[String]) -> Result<Vec<HierarchyNode>> {
		let mut level = Vec::new();

		for child in names {
			let collection = self.ctx.scene.collection(child).ok_or_else(|| ExportError::UnknownGroup {
				parent: parent.to_owned(),
				child: child.clone(),
			})?;
			let name = collection.name.as_str();
			let children = self.build_level(name, &collection.children)?;

			if classify_group(name, self.ctx.options) != Some(GroupKind::Structure) {
				level.extend(children);
				continue;
			}
			if children.is_empty() && !self.flat.name_filter.contains(name) {
				continue;
			}
			if !self.placed.insert(name) {
				warn!(group = name, "group reached through more than one parent; keeping the first placement");
				continue;
			}

			let (_, display_name) = infer_class_name(name, self.ctx.options.separator);
			let structure = self.flat.structure_index(&display_name).ok_or(ExportError::UnresolvedStructure { name: display_name })?;
			level.push(HierarchyNode { structure, children });
		}

		Ok(level)
	}
}

/// Depth-first pass over every group in host order. A child already on the
/// current path is a cycle; a child name with no group is unknown.
fn ensure_acyclic(scene: &Scene) -> Result<()> {
	let mut path = Vec::new();
	let mut finished = HashSet::new();
	for collection in &scene.collections {
		visit_group(scene, collection, &mut path, &mut finished)?;
	}
	Ok(())
}

fn visit_group<'a>(scene: &'a Scene, collection: &'a Collection, path: &mut Vec<&'a str>, finished: &mut HashSet<&'a str>) -> Result<()> {
	let name = collection.name.as_str();
	if finished.contains(name) {
		return Ok(());
	}
	if path.contains(&name) {
		return Err(ExportError::GroupCycle { name: name.to_owned() });
	}

	path.push(name);
	for child in &collection.children {
		let next = scene.collection(child).ok_or_else(|| ExportError::UnknownGroup {
			parent: name.to_owned(),
			child: child.clone(),
		})?;
		visit_group(scene, next, path, finished)?;
	}
	path.pop();
	finished.insert(name);
	Ok(())
}
