use blendifc_testkit::fixture_path;

use crate::ifc::{ExportError, Mesh, MetaValue, Scene};

#[test]
fn tower_fixture_parses_with_defaults() {
	let scene = Scene::from_json_file(fixture_path("tower.scene.json")).expect("fixture parses");

	let wall = scene.objects.iter().find(|item| item.name == "IfcWall/W1").expect("wall exists");
	assert!(wall.selected, "selected defaults to true");
	assert_eq!(wall.mesh.as_deref(), Some("WallMesh"));

	let users: Vec<&str> = scene.users_collection("IfcWall/W1").map(|item| item.name.as_str()).collect();
	assert_eq!(users, ["IfcBuilding/Tower"]);

	let top: Vec<&str> = scene.top_level_collections().map(|item| item.name.as_str()).collect();
	assert_eq!(top, ["IfcProject/Root"]);
}

#[test]
fn metadata_values_keep_their_json_kind() {
	let scene = Scene::from_json_slice(
		br#"{
			"objects": [{
				"name": "IfcSlab/S1",
				"metadata": { "IfcTag": "S-01", "IfcElevation": 3.5, "IfcCount": 2, "IfcLoadBearing": true }
			}]
		}"#,
	)
	.expect("scene parses");

	let metadata = &scene.objects[0].metadata;
	assert_eq!(metadata["IfcTag"], MetaValue::Text("S-01".to_owned()));
	assert_eq!(metadata["IfcElevation"], MetaValue::Real(3.5));
	assert_eq!(metadata["IfcCount"], MetaValue::Int(2));
	assert_eq!(metadata["IfcLoadBearing"], MetaValue::Bool(true));
	assert_eq!(scene.objects[0].location, [0.0, 0.0, 0.0]);
}

#[test]
fn mesh_validation_reports_bad_polygons() {
	let mut mesh = Mesh {
		name: "Quad".to_owned(),
		vertices: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
		polygons: vec![vec![0, 1, 2, 3]],
	};
	mesh.validate().expect("quad is valid");

	mesh.polygons.push(vec![0, 1]);
	assert!(matches!(mesh.validate(), Err(ExportError::DegeneratePolygon { polygon: 1, count: 2, .. })));

	mesh.polygons[1] = vec![0, 1, 9];
	assert!(matches!(
		mesh.validate(),
		Err(ExportError::VertexOutOfRange {
			polygon: 1,
			vertex: 9,
			vertex_count: 4,
			..
		})
	));
}
