//! Shared test helpers for workspace crates.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde_json::{Value, json};
use tracing::Level;

/// Resolve the workspace root path.
pub fn workspace_root() -> PathBuf {
	let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
	manifest_dir
		.join("..")
		.join("..")
		.canonicalize()
		.unwrap_or_else(|_| manifest_dir.join("..").join(".."))
}

/// Resolve a fixture path under `<workspace>/fixtures`.
pub fn fixture_path(name: &str) -> PathBuf {
	workspace_root().join("fixtures").join(name)
}

/// Resolve the workspace target directory.
pub fn target_dir() -> PathBuf {
	std::env::var_os("CARGO_TARGET_DIR")
		.map(PathBuf::from)
		.unwrap_or_else(|| workspace_root().join("target"))
}

/// Path for a test output file under `<target>/blendifc-scratch`, creating the directory.
pub fn scratch_path(name: &str) -> PathBuf {
	let dir = target_dir().join("blendifc-scratch");
	std::fs::create_dir_all(&dir).unwrap_or_else(|err| panic!("scratch dir {} is creatable: {err}", dir.display()));
	dir.join(name)
}

#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
	fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
		self.0.lock().map_err(|_| io::Error::other("log buffer poisoned"))?.extend_from_slice(buf);
		Ok(buf.len())
	}

	fn flush(&mut self) -> io::Result<()> {
		Ok(())
	}
}

/// Run `f` with a thread-local subscriber and return its result plus every `WARN` line logged.
pub fn capture_warnings<T>(f: impl FnOnce() -> T) -> (T, Vec<String>) {
	let buffer = LogBuffer::default();
	let writer = buffer.clone();
	let subscriber = tracing_subscriber::fmt()
		.with_max_level(Level::WARN)
		.with_ansi(false)
		.with_target(false)
		.without_time()
		.with_writer(move || writer.clone())
		.finish();

	let value = tracing::subscriber::with_default(subscriber, f);
	let bytes = buffer.0.lock().map(|item| item.clone()).unwrap_or_default();
	let lines = String::from_utf8_lossy(&bytes).lines().map(str::to_owned).collect();
	(value, lines)
}

/// Unit quad mesh in the XY plane: four vertices, one polygon.
pub fn quad_mesh(name: &str) -> Value {
	json!({
		"name": name,
		"vertices": [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
		"polygons": [[0, 1, 2, 3]],
	})
}

/// Selected object with an optional mesh at `location`.
pub fn object(name: &str, mesh: Option<&str>, location: [f64; 3]) -> Value {
	json!({
		"name": name,
		"mesh": mesh,
		"location": location,
	})
}

/// Group with child group names and directly assigned object names.
pub fn collection(name: &str, children: &[&str], objects: &[&str]) -> Value {
	json!({
		"name": name,
		"children": children,
		"objects": objects,
	})
}

/// Scene snapshot document from its parts.
pub fn scene(meshes: Vec<Value>, objects: Vec<Value>, collections: Vec<Value>) -> Value {
	json!({
		"meshes": meshes,
		"objects": objects,
		"collections": collections,
	})
}

/// `IfcProject/Root` > `IfcSite/Plot` > `IfcBuilding/Tower` with wall `IfcWall/W1` in the tower.
pub fn tower_scene() -> Value {
	scene(
		vec![quad_mesh("WallMesh")],
		vec![object("IfcWall/W1", Some("WallMesh"), [1.0, 2.0, 0.0])],
		vec![
			collection("IfcProject/Root", &["IfcSite/Plot"], &[]),
			collection("IfcSite/Plot", &["IfcBuilding/Tower"], &[]),
			collection("IfcBuilding/Tower", &[], &["IfcWall/W1"]),
		],
	)
}
