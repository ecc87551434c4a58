use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ifc::{GuidMode, Result};

/// Export configuration shared by every pass of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportOptions {
	/// Group classes treated as the run's root context.
	pub context_classes: Vec<String>,
	/// Class prefix that marks a group as a spatial structure element.
	pub class_marker: String,
	/// Object metadata key prefix harvested as entity attributes.
	pub attribute_marker: String,
	/// Separator between class and display name.
	pub separator: char,
	/// GlobalId generation strategy.
	pub guids: GuidMode,
	/// Precision recorded on the geometric representation context.
	pub precision: f64,
}

impl Default for ExportOptions {
	fn default() -> Self {
		Self {
			context_classes: vec!["IfcProject".to_owned(), "IfcProjectLibrary".to_owned()],
			class_marker: "Ifc".to_owned(),
			attribute_marker: "Ifc".to_owned(),
			separator: '/',
			guids: GuidMode::Random,
			precision: 1.0e-5,
		}
	}
}

impl ExportOptions {
	/// Load options from a JSON document; missing keys keep their defaults.
	pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
		let bytes = std::fs::read(path)?;
		Ok(serde_json::from_slice(&bytes)?)
	}

	/// Whether `class` names a root context.
	pub fn is_context_class(&self, class: &str) -> bool {
		self.context_classes.iter().any(|item| item == class)
	}
}
