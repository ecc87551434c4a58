use std::path::PathBuf;
use std::process::{Command, Output};
use std::sync::OnceLock;

static BLENDIFC_BIN: OnceLock<PathBuf> = OnceLock::new();

pub(crate) fn run_blendifc(args: &[&str]) -> Output {
	Command::new(blendifc_bin()).args(args).output().expect("blendifc command executes")
}

pub(crate) fn run_blendifc_json(args: &[&str]) -> serde_json::Value {
	let output = run_blendifc(args);
	assert!(
		output.status.success(),
		"blendifc {args:?} exited with {}: {}",
		output.status,
		String::from_utf8_lossy(&output.stderr)
	);
	serde_json::from_slice(&output.stdout).expect("stdout is json")
}

// The unit test harness lives in `<profile>/deps`; cargo places the binary one level up.
fn blendifc_bin() -> &'static PathBuf {
	BLENDIFC_BIN.get_or_init(|| {
		let harness = std::env::current_exe().expect("test harness path");
		let profile_dir = harness.parent().and_then(|deps| deps.parent()).expect("harness sits in <profile>/deps");
		let bin = profile_dir.join(format!("blendifc{}", std::env::consts::EXE_SUFFIX));
		assert!(bin.is_file(), "blendifc binary missing at {}", bin.display());
		bin
	})
}
