use tracing::warn;

use crate::ifc::ExportOptions;

/// One well-formed `Class/Name` naming string, borrowed from its source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamedEntity<'a> {
	/// Text before the separator.
	pub class: &'a str,
	/// Text after the separator.
	pub name: &'a str,
}

/// Closed classification of scene groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
	/// Top-level root (project or project library).
	Context,
	/// Spatial containment level (site, building, storey, space).
	Structure,
}

/// Split `raw` on `separator`, requiring exactly one separator.
pub fn split_name(raw: &str, separator: char) -> Option<NamedEntity<'_>> {
	let (class, name) = raw.split_once(separator)?;
	if name.contains(separator) {
		return None;
	}
	Some(NamedEntity { class, name })
}

/// Infer `(class, display name)` for a naming string.
///
/// A malformed string logs a diagnostic and yields the part before the first
/// separator (or the whole string) as class with an empty display name.
pub fn infer_class_name(raw: &str, separator: char) -> (String, String) {
	match split_name(raw, separator) {
		Some(named) => (named.class.to_owned(), named.name.to_owned()),
		None => {
			warn_malformed_name(raw, separator);
			let class = raw.split(separator).next().unwrap_or(raw);
			(class.to_owned(), String::new())
		}
	}
}

/// Log the diagnostic for a naming string that is not `Class/Name`.
pub(crate) fn warn_malformed_name(raw: &str, separator: char) {
	warn!(raw, "name does not follow the format of \"IfcClass{separator}Name\"");
}

/// Classify a group naming string. Malformed names are neither kind.
pub fn classify_group(raw: &str, options: &ExportOptions) -> Option<GroupKind> {
	let named = split_name(raw, options.separator)?;
	if options.is_context_class(named.class) {
		return Some(GroupKind::Context);
	}
	named.class.starts_with(options.class_marker.as_str()).then_some(GroupKind::Structure)
}
