#![allow(missing_docs)]

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

mod cmd;

#[derive(Parser)]
#[command(name = "blendifc", about = "Export Blender scene snapshots as IFC entity graphs")]
struct Cli {
	/// Raise log verbosity (`-v` info, `-vv` debug). `RUST_LOG` takes precedence.
	#[arg(short, long, action = ArgAction::Count, global = true)]
	verbose: u8,
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Export a scene snapshot to an entity graph JSON file.
	Export {
		path: PathBuf,
		#[arg(short, long)]
		output: PathBuf,
		#[arg(long)]
		config: Option<PathBuf>,
		/// Use counter-based GlobalIds for reproducible output.
		#[arg(long)]
		sequential_ids: bool,
		#[arg(long)]
		json: bool,
	},
	/// Print the resolved spatial hierarchy without emitting entities.
	Tree {
		path: PathBuf,
		#[arg(long)]
		config: Option<PathBuf>,
		#[arg(long)]
		json: bool,
	},
}

fn main() {
	let cli = Cli::parse();
	cmd::util::init_tracing(cli.verbose);

	if let Err(err) = run(cli.command) {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn run(command: Commands) -> blendifc::ifc::Result<()> {
	match command {
		Commands::Export {
			path,
			output,
			config,
			sequential_ids,
			json,
		} => cmd::export::run(path, output, config, sequential_ids, json),
		Commands::Tree { path, config, json } => cmd::tree::run(path, config, json),
	}
}
