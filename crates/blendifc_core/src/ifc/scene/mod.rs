use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ifc::{ExportError, Result};

/// Snapshot of the host scene handed to the exporter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
	/// Geometry payloads, addressed by name.
	#[serde(default)]
	pub meshes: Vec<Mesh>,
	/// Scene objects in host iteration order.
	#[serde(default)]
	pub objects: Vec<SceneObject>,
	/// Groups in host iteration order.
	#[serde(default)]
	pub collections: Vec<Collection>,
}

/// Mesh payload: vertex coordinates and polygons indexing them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
	/// Mesh datablock name; the identity used for de-duplication.
	pub name: String,
	/// Vertex coordinates.
	#[serde(default)]
	pub vertices: Vec<[f64; 3]>,
	/// Polygons as ordered vertex indices.
	#[serde(default)]
	pub polygons: Vec<Vec<usize>>,
}

/// One scene object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
	/// Raw `Class/Name` naming string.
	pub name: String,
	/// Referenced mesh, if the object carries geometry.
	#[serde(default)]
	pub mesh: Option<String>,
	/// Object location in scene space.
	#[serde(default)]
	pub location: [f64; 3],
	/// Custom properties attached to the object.
	#[serde(default)]
	pub metadata: BTreeMap<String, MetaValue>,
	/// Whether the object is part of the current selection.
	#[serde(default = "default_selected")]
	pub selected: bool,
}

/// One group of objects and child groups.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Collection {
	/// Raw `Class/Name` naming string.
	pub name: String,
	/// Child group names in host order.
	#[serde(default)]
	pub children: Vec<String>,
	/// Names of objects directly assigned to this group.
	#[serde(default)]
	pub objects: Vec<String>,
}

/// Scalar custom-property value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
	/// Boolean property.
	Bool(bool),
	/// Integer property.
	Int(i64),
	/// Floating-point property.
	Real(f64),
	/// String property.
	Text(String),
}

fn default_selected() -> bool {
	true
}

impl Scene {
	/// Parse a scene snapshot from JSON bytes.
	pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
		Ok(serde_json::from_slice(bytes)?)
	}

	/// Read and parse a scene snapshot file.
	pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
		let bytes = std::fs::read(path)?;
		Self::from_json_slice(&bytes)
	}

	/// Objects in the current selection, in host order.
	pub fn selected_objects(&self) -> impl Iterator<Item = &SceneObject> {
		self.objects.iter().filter(|item| item.selected)
	}

	/// Look up a mesh by name.
	pub fn mesh(&self, name: &str) -> Option<&Mesh> {
		self.meshes.iter().find(|item| item.name == name)
	}

	/// Look up a group by raw name.
	pub fn collection(&self, name: &str) -> Option<&Collection> {
		self.collections.iter().find(|item| item.name == name)
	}

	/// Groups that directly list `object`, in group order.
	pub fn users_collection<'a>(&'a self, object: &'a str) -> impl Iterator<Item = &'a Collection> + 'a {
		self.collections.iter().filter(move |item| item.objects.iter().any(|name| name == object))
	}

	/// Groups that are no other group's child, in group order.
	pub fn top_level_collections(&self) -> impl Iterator<Item = &Collection> {
		let nested: HashSet<&str> = self.collections.iter().flat_map(|item| item.children.iter().map(String::as_str)).collect();
		self.collections.iter().filter(move |item| !nested.contains(item.name.as_str()))
	}
}

impl Mesh {
	/// Check every polygon has at least three in-range vertex indices.
	pub fn validate(&self) -> Result<()> {
		for (polygon, indices) in self.polygons.iter().enumerate() {
			if indices.len() < 3 {
				return Err(ExportError::DegeneratePolygon {
					mesh: self.name.clone(),
					polygon,
					count: indices.len(),
				});
			}
			if let Some(vertex) = indices.iter().copied().find(|index| *index >= self.vertices.len()) {
				return Err(ExportError::VertexOutOfRange {
					mesh: self.name.clone(),
					polygon,
					vertex,
					vertex_count: self.vertices.len(),
				});
			}
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests;
