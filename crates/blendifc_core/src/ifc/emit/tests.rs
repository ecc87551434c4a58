use blendifc_testkit::{capture_warnings, collection, fixture_path, object, quad_mesh, scene, tower_scene};
use serde_json::json;

use crate::ifc::{AttrValue, Entity, EntityRef, ExportError, ExportOptions, ExportReport, GuidMode, MemoryGraph, Result, Scene, export_scene};

fn parse(value: serde_json::Value) -> Scene {
	serde_json::from_value(value).expect("scene document parses")
}

fn export(scene: &Scene) -> (MemoryGraph, Result<ExportReport>) {
	let options = ExportOptions {
		guids: GuidMode::Sequential,
		..ExportOptions::default()
	};
	let mut graph = MemoryGraph::new(options.guids);
	let report = export_scene(scene, &options, &mut graph);
	(graph, report)
}

fn named<'g>(graph: &'g MemoryGraph, class: &'g str, name: &str) -> &'g Entity {
	graph
		.by_class(class)
		.find(|item| item.attributes.get("Name") == Some(&AttrValue::Text(name.to_owned())))
		.unwrap_or_else(|| panic!("{class}/{name} exists"))
}

fn reference(entity: &Entity, attribute: &str) -> EntityRef {
	match entity.attributes.get(attribute) {
		Some(AttrValue::Entity(target)) => *target,
		other => panic!("{}.{attribute} is not a reference: {other:?}", entity.class),
	}
}

fn references(entity: &Entity, attribute: &str) -> Vec<EntityRef> {
	match entity.attributes.get(attribute) {
		Some(AttrValue::List(items)) => items
			.iter()
			.map(|item| match item {
				AttrValue::Entity(target) => *target,
				other => panic!("{}.{attribute} holds {other:?}", entity.class),
			})
			.collect(),
		other => panic!("{}.{attribute} is not a list: {other:?}", entity.class),
	}
}

fn parent_placement(graph: &MemoryGraph, entity: &Entity) -> Option<EntityRef> {
	let placement = graph.get(reference(entity, "ObjectPlacement")).expect("placement stored");
	placement.attributes.get("PlacementRelTo").map(|_| reference(placement, "PlacementRelTo"))
}

#[test]
fn tower_scenario_emits_linked_graph() {
	let (graph, report) = export(&parse(tower_scene()));
	let report = report.expect("export succeeds");

	assert_eq!(graph.by_class("IfcProject").count(), 1);
	let root = named(&graph, "IfcProject", "Root");
	assert_eq!(report.context, root.id);

	let plot = named(&graph, "IfcSite", "Plot");
	let tower = named(&graph, "IfcBuilding", "Tower");
	let wall = named(&graph, "IfcWall", "W1");

	assert_eq!(parent_placement(&graph, tower), Some(reference(plot, "ObjectPlacement")));
	assert_eq!(parent_placement(&graph, wall), Some(reference(tower, "ObjectPlacement")));
	let top = parent_placement(&graph, plot).expect("plot sits in the top-level placement");
	assert!(!graph.get(top).expect("top placement stored").attributes.contains_key("PlacementRelTo"));

	let shapes: Vec<&Entity> = graph.by_class("IfcProductDefinitionShape").collect();
	assert_eq!(shapes.len(), 1);
	assert_eq!(reference(wall, "Representation"), shapes[0].id);
	assert_eq!(graph.by_class("IfcFace").count(), 1);
	assert_eq!(graph.by_class("IfcPolyLoop").map(|item| references(item, "Polygon").len()).collect::<Vec<_>>(), [4]);

	let aggregates: Vec<(EntityRef, Vec<EntityRef>)> = graph
		.by_class("IfcRelAggregates")
		.map(|item| (reference(item, "RelatingObject"), references(item, "RelatedObjects")))
		.collect();
	assert_eq!(aggregates, [(plot.id, vec![tower.id]), (root.id, vec![plot.id])]);

	let contained: Vec<&Entity> = graph.by_class("IfcRelContainedInSpatialStructure").collect();
	assert_eq!(contained.len(), 1);
	assert_eq!(reference(contained[0], "RelatingStructure"), tower.id);
	assert_eq!(references(contained[0], "RelatedElements"), [wall.id]);

	assert_eq!((report.structures, report.products, report.aggregations, report.containments), (2, 1, 2, 1));
	assert!(report.skipped.is_empty());
}

#[test]
fn placements_are_created_before_their_descendants() {
	let scene = Scene::from_json_file(fixture_path("tower.scene.json")).expect("fixture parses");
	let (graph, report) = export(&scene);
	report.expect("export succeeds");

	let placements: Vec<&Entity> = graph.by_class("IfcLocalPlacement").collect();
	assert!(placements.len() > 4);
	for placement in placements {
		if placement.attributes.contains_key("PlacementRelTo") {
			assert!(reference(placement, "PlacementRelTo") < placement.id, "parent placement of {} created later", placement.id);
		}
	}
}

#[test]
fn aggregation_lists_exactly_direct_children() {
	let scene = Scene::from_json_file(fixture_path("tower.scene.json")).expect("fixture parses");
	let (graph, report) = export(&scene);
	report.expect("export succeeds");

	let name_of = |id: EntityRef| match graph.get(id).and_then(|item| item.attributes.get("Name")) {
		Some(AttrValue::Text(name)) => name.clone(),
		other => panic!("{id} has no name: {other:?}"),
	};
	let aggregates: Vec<(String, Vec<String>)> = graph
		.by_class("IfcRelAggregates")
		.map(|item| (name_of(reference(item, "RelatingObject")), references(item, "RelatedObjects").into_iter().map(name_of).collect()))
		.collect();

	assert_eq!(
		aggregates,
		[
			("Tower".to_owned(), vec!["Ground Floor".to_owned()]),
			("Plot".to_owned(), vec!["Tower".to_owned()]),
			("Root".to_owned(), vec!["Plot".to_owned()]),
		]
	);
	assert_eq!(graph.by_class("IfcBuilding").count(), 1, "empty annex is pruned");
}

#[test]
fn containment_is_one_relation_per_group() {
	let scene = Scene::from_json_file(fixture_path("tower.scene.json")).expect("fixture parses");
	let (graph, report) = export(&scene);
	let report = report.expect("export succeeds");

	let tower = named(&graph, "IfcBuilding", "Tower");
	let storey = named(&graph, "IfcBuildingStorey", "Ground Floor");
	let w1 = named(&graph, "IfcWall", "W1").id;
	let w2 = named(&graph, "IfcWall", "W2").id;
	let slab = named(&graph, "IfcSlab", "Ground").id;

	let contained: Vec<(EntityRef, Vec<EntityRef>)> = graph
		.by_class("IfcRelContainedInSpatialStructure")
		.map(|item| (reference(item, "RelatingStructure"), references(item, "RelatedElements")))
		.collect();
	assert_eq!(contained, [(tower.id, vec![w1, w2]), (storey.id, vec![slab])]);
	assert_eq!(report.containments, 2);
}

#[test]
fn shared_mesh_is_converted_once() {
	let scene = Scene::from_json_file(fixture_path("tower.scene.json")).expect("fixture parses");
	let (graph, report) = export(&scene);
	let report = report.expect("export succeeds");

	let w1 = named(&graph, "IfcWall", "W1");
	let w2 = named(&graph, "IfcWall", "W2");
	assert_eq!(reference(w1, "Representation"), reference(w2, "Representation"));
	assert_eq!(graph.by_class("IfcProductDefinitionShape").count(), 2);
	assert_eq!(report.representations, 2);
	assert_eq!(graph.by_class("IfcFurniture").count(), 0, "unselected desk is not exported");

	let slab = named(&graph, "IfcSlab", "Ground");
	assert_eq!(slab.attributes.get("PredefinedType"), Some(&AttrValue::Text("FLOOR".to_owned())));
	assert_eq!(w1.attributes.get("Tag"), Some(&AttrValue::Text("W-01".to_owned())));
}

#[test]
fn rejected_leaf_is_skipped_and_siblings_survive() {
	let mut document = scene(
		vec![quad_mesh("M")],
		vec![
			object("IfcWall/A", Some("M"), [0.0; 3]),
			object("IfcWall/B", Some("M"), [1.0, 0.0, 0.0]),
			object("IfcWall/C", Some("M"), [2.0, 0.0, 0.0]),
		],
		vec![collection("IfcProject/P", &["IfcSite/S"], &[]), collection("IfcSite/S", &[], &["IfcWall/A", "IfcWall/B", "IfcWall/C"])],
	);
	document["objects"][1]["metadata"] = json!({ "IfcElevation": "high" });

	let (graph, report) = export(&parse(document));
	let report = report.expect("export continues past the rejected leaf");

	assert_eq!(report.skipped.len(), 1);
	assert_eq!((report.skipped[0].class.as_str(), report.skipped[0].name.as_str()), ("IfcWall", "B"));
	assert!(report.skipped[0].reason.contains("Elevation"));
	assert_eq!(report.products, 2);

	let a = named(&graph, "IfcWall", "A").id;
	let c = named(&graph, "IfcWall", "C").id;
	let contained: Vec<&Entity> = graph.by_class("IfcRelContainedInSpatialStructure").collect();
	assert_eq!(contained.len(), 1);
	assert_eq!(references(contained[0], "RelatedElements"), [a, c]);
}

#[test]
fn rejected_leaf_is_logged_with_class_and_name() {
	let mut document = scene(
		vec![quad_mesh("M")],
		vec![object("IfcWall/A", Some("M"), [0.0; 3]), object("IfcWall/B", Some("M"), [1.0, 0.0, 0.0])],
		vec![collection("IfcProject/P", &["IfcSite/S"], &[]), collection("IfcSite/S", &[], &["IfcWall/A", "IfcWall/B"])],
	);
	document["objects"][1]["metadata"] = json!({ "IfcElevation": "high" });
	let scene = parse(document);

	let ((_, report), warnings) = capture_warnings(|| export(&scene));
	report.expect("export continues past the rejected leaf");

	let skipped: Vec<&String> = warnings.iter().filter(|line| line.contains("could not be created")).collect();
	assert_eq!(skipped.len(), 1, "{warnings:?}");
	assert!(skipped[0].contains("class=IfcWall"));
	assert!(skipped[0].contains("display_name=B"));
	assert!(skipped[0].contains("Elevation"));
}

#[test]
fn group_losing_every_leaf_gets_no_containment() {
	let scene = parse(scene(
		vec![],
		vec![object("Cube", None, [0.0; 3])],
		vec![collection("IfcProject/P", &["IfcSite/S"], &[]), collection("IfcSite/S", &[], &["Cube"])],
	));
	let (graph, report) = export(&scene);
	let report = report.expect("export succeeds");

	assert_eq!(report.skipped.len(), 1);
	assert_eq!(report.skipped[0].class, "Cube");
	assert_eq!(graph.by_class("IfcSite").count(), 1);
	assert_eq!(graph.by_class("IfcRelContainedInSpatialStructure").count(), 0);
}

#[test]
fn unassigned_leaf_sits_in_the_top_level_placement() {
	let scene = parse(scene(
		vec![],
		vec![object("IfcWall/Loose", None, [5.0, 0.0, 0.0])],
		vec![collection("IfcProject/P", &[], &[])],
	));
	let (graph, report) = export(&scene);
	let report = report.expect("export succeeds");

	let wall = named(&graph, "IfcWall", "Loose");
	let top = parent_placement(&graph, wall).expect("wall placement is relative");
	assert!(!graph.get(top).expect("top placement stored").attributes.contains_key("PlacementRelTo"));
	assert!(!wall.attributes.contains_key("Representation"));
	assert_eq!((report.structures, report.aggregations, report.containments), (0, 0, 0));
}

#[test]
fn rejected_structure_aborts_the_run() {
	let scene = parse(scene(
		vec![],
		vec![object("IfcWall/A", None, [0.0; 3])],
		vec![collection("IfcProject/P", &["IfcSite-X/S"], &[]), collection("IfcSite-X/S", &[], &["IfcWall/A"])],
	));
	let (_, report) = export(&scene);
	assert!(matches!(report, Err(ExportError::Create { ref class, ref name, .. }) if class == "IfcSite-X" && name == "S"));
}
