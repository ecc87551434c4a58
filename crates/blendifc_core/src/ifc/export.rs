use tracing::info;

use crate::ifc::{EntityGraph, ExportOptions, ExportReport, Result, Scene, emit_graph, flatten_scene, resolve_hierarchy};

/// Scene and options shared by the passes of one export run.
#[derive(Debug, Clone, Copy)]
pub struct BuildContext<'a> {
	/// Scene snapshot being exported.
	pub scene: &'a Scene,
	/// Run configuration.
	pub options: &'a ExportOptions,
}

impl<'a> BuildContext<'a> {
	/// Bundle a scene with its options.
	pub fn new(scene: &'a Scene, options: &'a ExportOptions) -> Self {
		Self { scene, options }
	}
}

/// Flatten, resolve, and emit `scene` into `graph`.
pub fn export_scene<G: EntityGraph>(scene: &Scene, options: &ExportOptions, graph: &mut G) -> Result<ExportReport> {
	let ctx = BuildContext::new(scene, options);
	let flat = flatten_scene(&ctx)?;
	let forest = resolve_hierarchy(&ctx, &flat)?;
	let report = emit_graph(&ctx, graph, &flat, &forest)?;

	info!(
		structures = report.structures,
		products = report.products,
		skipped = report.skipped.len(),
		"export finished"
	);
	Ok(report)
}
