//! Public library API for exporting Blender scene snapshots as IFC entity graphs.

/// Scene flattening, spatial hierarchy resolution, and entity graph emission.
pub mod ifc;
