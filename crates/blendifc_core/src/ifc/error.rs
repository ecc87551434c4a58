use thiserror::Error;

use crate::ifc::GraphError;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, ExportError>;

/// Errors produced while flattening, resolving, and emitting a scene.
#[derive(Debug, Error)]
pub enum ExportError {
	/// Filesystem or stream IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// Scene snapshot or config document failed to parse.
	#[error("json: {0}")]
	Json(#[from] serde_json::Error),
	/// No group carried a context class.
	#[error("no context group found (expected one of: {expected})")]
	MissingContext {
		/// Comma-separated context classes that were searched for.
		expected: String,
	},
	/// A group listed a child group that does not exist.
	#[error("group {parent} lists unknown child group {child}")]
	UnknownGroup {
		/// Raw name of the listing group.
		parent: String,
		/// Raw name of the missing child.
		child: String,
	},
	/// Group nesting loops back on itself.
	#[error("group cycle detected at {name}")]
	GroupCycle {
		/// Raw name of the group that was re-entered.
		name: String,
	},
	/// A spatial group has no flattened record or no emitted entity.
	#[error("spatial structure {name} was never materialized")]
	UnresolvedStructure {
		/// Display name used for the lookup.
		name: String,
	},
	/// A selected object references a mesh absent from the scene.
	#[error("object {object} references missing mesh {mesh}")]
	MissingMesh {
		/// Raw object name.
		object: String,
		/// Referenced mesh name.
		mesh: String,
	},
	/// A polygon has fewer than three vertices.
	#[error("mesh {mesh} polygon {polygon} has {count} vertices (need at least 3)")]
	DegeneratePolygon {
		/// Mesh name.
		mesh: String,
		/// Polygon index.
		polygon: usize,
		/// Vertex count found.
		count: usize,
	},
	/// A polygon references a vertex index past the vertex list.
	#[error("mesh {mesh} polygon {polygon} references vertex {vertex} (mesh has {vertex_count})")]
	VertexOutOfRange {
		/// Mesh name.
		mesh: String,
		/// Polygon index.
		polygon: usize,
		/// Offending vertex index.
		vertex: usize,
		/// Number of vertices in the mesh.
		vertex_count: usize,
	},
	/// The entity graph rejected a record the run cannot continue without.
	#[error("failed to create {class}/{name}: {source}")]
	Create {
		/// Class of the rejected entity.
		class: String,
		/// Display name of the rejected entity.
		name: String,
		/// Underlying graph library error.
		#[source]
		source: GraphError,
	},
	/// Entity graph failure outside of a named entity.
	#[error("entity graph: {0}")]
	Graph(#[from] GraphError),
}
