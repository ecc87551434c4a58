use std::path::{Path, PathBuf};

use blendifc::ifc::{ExportReport, MemoryGraph, Scene, export_scene};
use serde::Serialize;
use tracing::info;

use crate::cmd::util::load_options;

#[derive(Serialize)]
struct ExportSummary<'a> {
	scene: String,
	output: String,
	entities: usize,
	report: &'a ExportReport,
}

/// Export one scene snapshot and write the entity graph to `output`.
pub fn run(path: PathBuf, output: PathBuf, config: Option<PathBuf>, sequential_ids: bool, json: bool) -> blendifc::ifc::Result<()> {
	let options = load_options(config.as_deref(), sequential_ids)?;
	let scene = Scene::from_json_file(&path)?;

	let mut graph = MemoryGraph::new(options.guids);
	let report = export_scene(&scene, &options, &mut graph)?;
	graph.write_json(&output)?;
	info!(output = %output.display(), entities = graph.entities().len(), "entity graph written");

	if json {
		print_json(&path, &output, graph.entities().len(), &report)?;
		return Ok(());
	}

	print_text(&path, &output, graph.entities().len(), &report);
	Ok(())
}

fn print_json(path: &Path, output: &Path, entities: usize, report: &ExportReport) -> blendifc::ifc::Result<()> {
	let summary = ExportSummary {
		scene: path.display().to_string(),
		output: output.display().to_string(),
		entities,
		report,
	};
	println!("{}", serde_json::to_string_pretty(&summary)?);
	Ok(())
}

fn print_text(path: &Path, output: &Path, entities: usize, report: &ExportReport) {
	println!("scene: {}", path.display());
	println!("output: {}", output.display());
	println!("entities: {entities}");
	println!("context: {}", report.context);
	println!("structures: {}", report.structures);
	println!("representations: {}", report.representations);
	println!("products: {}", report.products);
	println!("aggregations: {}", report.aggregations);
	println!("containments: {}", report.containments);
	println!("skipped: {}", report.skipped.len());
	for item in &report.skipped {
		println!("  {}/{}: {}", item.class, item.name, item.reason);
	}
}
