use std::path::Path;

use blendifc::ifc::{ExportOptions, GuidMode, Result};
use tracing_subscriber::EnvFilter;

/// Install the stderr log subscriber; `RUST_LOG` overrides the verbosity count.
pub(crate) fn init_tracing(verbose: u8) {
	let default_level = match verbose {
		0 => "warn",
		1 => "info",
		_ => "debug",
	};
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

	tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).with_target(false).init();
}

/// Load options from an optional config file, then apply flag overrides.
pub(crate) fn load_options(config: Option<&Path>, sequential_ids: bool) -> Result<ExportOptions> {
	let mut options = match config {
		Some(path) => ExportOptions::from_json_file(path)?,
		None => ExportOptions::default(),
	};
	if sequential_ids {
		options.guids = GuidMode::Sequential;
	}
	Ok(options)
}
