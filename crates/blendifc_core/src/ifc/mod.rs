mod emit;
mod error;
mod export;
mod flatten;
mod geometry;
mod graph;
mod guid;
mod hierarchy;
mod naming;
mod options;
mod scene;

/// Graph emission entry point and run report.
pub use emit::{ExportReport, SkippedProduct, emit_graph};
/// Error and result aliases.
pub use error::{ExportError, Result};
/// Whole-run export entry point and shared build context.
pub use export::{BuildContext, export_scene};
/// Flattened record set produced from a scene.
pub use flatten::{ContainmentMap, FlatScene, ProductRecord, RepresentationRecord, StructureRecord, flatten_scene};
/// Mesh to boundary representation conversion.
pub use geometry::product_shape;
/// Entity graph collaborator interface and in-memory implementation.
pub use graph::{AttrValue, Attributes, Entity, EntityGraph, EntityRef, GraphError, MemoryGraph, attributes};
/// IFC GlobalId encoding and generation.
pub use guid::{GuidGenerator, GuidMode, compress_guid, expand_guid, is_global_id};
/// Spatial hierarchy tree and resolver.
pub use hierarchy::{HierarchyNode, resolve_hierarchy};
/// `Class/Name` parsing and group classification.
pub use naming::{GroupKind, NamedEntity, classify_group, infer_class_name, split_name};
/// Export configuration.
pub use options::ExportOptions;
/// Scene snapshot types.
pub use scene::{Collection, Mesh, MetaValue, Scene, SceneObject};
