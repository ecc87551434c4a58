use std::path::PathBuf;

use blendifc::ifc::{BuildContext, FlatScene, HierarchyNode, Scene, flatten_scene, resolve_hierarchy};
use serde::Serialize;

use crate::cmd::util::load_options;

#[derive(Serialize)]
struct TreeJson {
	context: String,
	roots: Vec<NodeJson>,
	unassigned: Vec<String>,
}

#[derive(Serialize)]
struct NodeJson {
	class: String,
	name: String,
	products: Vec<String>,
	children: Vec<NodeJson>,
}

/// Resolve and print the spatial hierarchy of one scene snapshot.
pub fn run(path: PathBuf, config: Option<PathBuf>, json: bool) -> blendifc::ifc::Result<()> {
	let options = load_options(config.as_deref(), false)?;
	let scene = Scene::from_json_file(&path)?;
	let ctx = BuildContext::new(&scene, &options);
	let flat = flatten_scene(&ctx)?;
	let forest = resolve_hierarchy(&ctx, &flat)?;

	let tree = TreeJson {
		context: format!("{}/{}", flat.context.class, flat.context.name),
		roots: forest.iter().map(|node| node_json(&flat, node)).collect(),
		unassigned: flat
			.products
			.iter()
			.filter(|item| item.structure.is_none())
			.map(|item| format!("{}/{}", item.class, item.name))
			.collect(),
	};

	if json {
		println!("{}", serde_json::to_string_pretty(&tree)?);
		return Ok(());
	}

	println!("context: {}", tree.context);
	for root in &tree.roots {
		print_node(root, 1);
	}
	for item in &tree.unassigned {
		println!("  - {item} (unassigned)");
	}
	Ok(())
}

fn node_json(flat: &FlatScene<'_>, node: &HierarchyNode) -> NodeJson {
	let record = &flat.structures[node.structure];
	let products = flat
		.containment
		.get(&node.structure)
		.map(|leaves| leaves.iter().map(|index| format!("{}/{}", flat.products[*index].class, flat.products[*index].name)).collect())
		.unwrap_or_default();

	NodeJson {
		class: record.class.clone(),
		name: record.name.clone(),
		products,
		children: node.children.iter().map(|child| node_json(flat, child)).collect(),
	}
}

fn print_node(node: &NodeJson, depth: usize) {
	let indent = "  ".repeat(depth);
	println!("{indent}{}/{}", node.class, node.name);
	for item in &node.products {
		println!("{indent}  - {item}");
	}
	for child in &node.children {
		print_node(child, depth + 1);
	}
}
