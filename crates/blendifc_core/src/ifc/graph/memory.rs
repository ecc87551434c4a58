use std::path::Path;

use serde::Serialize;

use super::schema;
use crate::ifc::{Attributes, EntityGraph, EntityRef, GraphError, GuidGenerator, GuidMode};

/// One stored entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entity {
	/// Instance handle, 1-based in creation order.
	pub id: EntityRef,
	/// Entity class tag.
	pub class: String,
	/// Validated attribute set.
	pub attributes: Attributes,
}

/// In-memory entity graph that validates attributes and writes JSON.
#[derive(Debug, Clone)]
pub struct MemoryGraph {
	entities: Vec<Entity>,
	guids: GuidGenerator,
}

#[derive(Serialize)]
struct GraphDocument<'a> {
	schema: &'static str,
	entities: &'a [Entity],
}

impl MemoryGraph {
	/// Create an empty graph using `mode` for GlobalIds.
	pub fn new(mode: GuidMode) -> Self {
		Self {
			entities: Vec::new(),
			guids: GuidGenerator::new(mode),
		}
	}

	/// All entities in creation order.
	pub fn entities(&self) -> &[Entity] {
		&self.entities
	}

	/// Look up an entity by handle.
	pub fn get(&self, id: EntityRef) -> Option<&Entity> {
		let index = (id.0 as usize).checked_sub(1)?;
		self.entities.get(index)
	}

	/// Entities of one class in creation order.
	pub fn by_class<'a>(&'a self, class: &'a str) -> impl Iterator<Item = &'a Entity> + 'a {
		self.entities.iter().filter(move |item| item.class == class)
	}

	/// Serialize the completed graph as pretty JSON.
	pub fn to_json(&self) -> Result<String, GraphError> {
		Ok(serde_json::to_string_pretty(&GraphDocument {
			schema: "IFC4",
			entities: &self.entities,
		})?)
	}

	/// Write the completed graph to `path`.
	pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), GraphError> {
		std::fs::write(path, self.to_json()?)?;
		Ok(())
	}
}

impl Default for MemoryGraph {
	fn default() -> Self {
		Self::new(GuidMode::default())
	}
}

impl EntityGraph for MemoryGraph {
	fn create_entity(&mut self, class: &str, attributes: Attributes) -> Result<EntityRef, GraphError> {
		schema::validate(class, &attributes, self.entities.len())?;

		let id = EntityRef(self.entities.len() as u32 + 1);
		self.entities.push(Entity {
			id,
			class: class.to_owned(),
			attributes,
		});
		Ok(id)
	}

	fn new_global_id(&mut self) -> String {
		self.guids.next_global_id()
	}
}
