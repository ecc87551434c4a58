use serde::Serialize;
use tracing::{debug, warn};

use crate::ifc::{
	AttrValue, Attributes, BuildContext, EntityGraph, EntityRef, ExportError, FlatScene, GraphError, HierarchyNode, ProductRecord, Result, attributes, product_shape,
};

/// Summary of one emission pass.
#[derive(Debug, Clone, Serialize)]
pub struct ExportReport {
	/// Handle of the root context entity.
	pub context: EntityRef,
	/// Spatial structure entities created.
	pub structures: usize,
	/// Shape representations created.
	pub representations: usize,
	/// Leaf entities created.
	pub products: usize,
	/// `IfcRelAggregates` relations created.
	pub aggregations: usize,
	/// `IfcRelContainedInSpatialStructure` relations created.
	pub containments: usize,
	/// Leaves the entity graph rejected.
	pub skipped: Vec<SkippedProduct>,
}

/// One leaf that could not be created.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedProduct {
	/// Inferred class of the leaf.
	pub class: String,
	/// Display name of the leaf.
	pub name: String,
	/// Rejection message from the entity graph.
	pub reason: String,
}

#[derive(Debug, Clone, Copy)]
struct Placed {
	entity: EntityRef,
	placement: EntityRef,
}

/// Emit the context, the spatial forest, geometry, leaves, and relations into `graph`.
///
/// Group entities are created pre-order so each placement exists before any
/// descendant placement refers to it. Leaf creation failures are logged and
/// skipped; every other creation failure aborts the run.
pub fn emit_graph<G: EntityGraph>(ctx: &BuildContext<'_>, graph: &mut G, flat: &FlatScene<'_>, forest: &[HierarchyNode]) -> Result<ExportReport> {
	let owner_history = graph.create_entity("IfcOwnerHistory", Attributes::new())?;
	let origin_point = graph.cartesian_point([0.0, 0.0, 0.0])?;
	let origin = graph.axis_placement(origin_point)?;
	let (model_context, body_context) = representation_contexts(graph, origin, ctx.options.precision)?;
	let top_placement = graph.local_placement(None, origin)?;

	let mut context_attributes = flat.context.attributes.clone();
	context_attributes.insert("GlobalId".to_owned(), AttrValue::Text(graph.new_global_id()));
	context_attributes.insert("RepresentationContexts".to_owned(), AttrValue::entities([model_context]));
	let context = graph.create_entity(&flat.context.class, context_attributes).map_err(|source| ExportError::Create {
		class: flat.context.class.clone(),
		name: flat.context.name.clone(),
		source,
	})?;

	let mut emitter = Emitter {
		graph,
		flat,
		owner_history,
		origin,
		structures: vec![None; flat.structures.len()],
		report: ExportReport {
			context,
			structures: 0,
			representations: 0,
			products: 0,
			aggregations: 0,
			containments: 0,
			skipped: Vec::new(),
		},
	};

	emitter.emit_level(forest, context, top_placement)?;
	let representations = emitter.emit_representations(body_context)?;
	let products = emitter.emit_products(&representations, top_placement)?;
	emitter.emit_containment(&products)?;

	Ok(emitter.report)
}

fn representation_contexts<G: EntityGraph>(graph: &mut G, origin: EntityRef, precision: f64) -> Result<(EntityRef, EntityRef)> {
	let true_north = graph.direction([0.0, 1.0, 0.0])?;
	let model = graph.create_entity(
		"IfcGeometricRepresentationContext",
		attributes([
			("ContextType", AttrValue::Text("Model".to_owned())),
			("CoordinateSpaceDimension", AttrValue::Int(3)),
			("Precision", AttrValue::Real(precision)),
			("WorldCoordinateSystem", origin.into()),
			("TrueNorth", true_north.into()),
		]),
	)?;
	let body = graph.create_entity(
		"IfcGeometricRepresentationSubContext",
		attributes([
			("ContextIdentifier", AttrValue::Text("Body".to_owned())),
			("ContextType", AttrValue::Text("Model".to_owned())),
			("ParentContext", model.into()),
			("TargetView", AttrValue::Enum("MODEL_VIEW".to_owned())),
		]),
	)?;
	Ok((model, body))
}

struct Emitter<'c, 'a, G> {
	graph: &'c mut G,
	flat: &'c FlatScene<'a>,
	owner_history: EntityRef,
	origin: EntityRef,
	structures: Vec<Option<Placed>>,
	report: ExportReport,
}

impl<G: EntityGraph> Emitter<'_, '_, G> {
	fn emit_level(&mut self, nodes: &[HierarchyNode], relating: EntityRef, parent_placement: EntityRef) -> Result<()> {
		let mut related = Vec::with_capacity(nodes.len());
		for node in nodes {
			let placed = self.emit_structure(node.structure, parent_placement)?;
			related.push(placed.entity);
			self.emit_level(&node.children, placed.entity, placed.placement)?;
		}

		if !related.is_empty() {
			self.graph.rel_aggregates(self.owner_history, relating, related)?;
			self.report.aggregations += 1;
		}
		Ok(())
	}

	fn emit_structure(&mut self, index: usize, parent_placement: EntityRef) -> Result<Placed> {
		let flat = self.flat;
		let record = flat.structures.get(index).ok_or_else(|| ExportError::UnresolvedStructure {
			name: format!("#{index}"),
		})?;

		let placement = self.graph.local_placement(Some(parent_placement), self.origin)?;
		let mut attrs = record.attributes.clone();
		attrs.insert("GlobalId".to_owned(), AttrValue::Text(self.graph.new_global_id()));
		attrs.insert("OwnerHistory".to_owned(), self.owner_history.into());
		attrs.insert("ObjectPlacement".to_owned(), placement.into());

		let entity = self.graph.create_entity(&record.class, attrs).map_err(|source| ExportError::Create {
			class: record.class.clone(),
			name: record.name.clone(),
			source,
		})?;
		debug!(class = %record.class, display_name = %record.name, %entity, "spatial structure created");

		let placed = Placed { entity, placement };
		self.structures[index] = Some(placed);
		self.report.structures += 1;
		Ok(placed)
	}

	fn emit_representations(&mut self, body_context: EntityRef) -> Result<Vec<EntityRef>> {
		let flat = self.flat;
		let mut shapes = Vec::with_capacity(flat.representations.len());
		for record in &flat.representations {
			let shape = product_shape(&mut *self.graph, record.mesh, body_context).map_err(|err| match err {
				ExportError::Graph(source) => ExportError::Create {
					class: "IfcProductDefinitionShape".to_owned(),
					name: record.name.to_owned(),
					source,
				},
				other => other,
			})?;
			shapes.push(shape);
		}
		self.report.representations = shapes.len();
		Ok(shapes)
	}

	fn emit_products(&mut self, shapes: &[EntityRef], top_placement: EntityRef) -> Result<Vec<Option<EntityRef>>> {
		let flat = self.flat;
		let mut products = Vec::with_capacity(flat.products.len());
		for record in &flat.products {
			let parent_placement = match record.structure {
				Some(index) => self.placed(index)?.placement,
				None => top_placement,
			};
			let shape = record.representation.and_then(|index| shapes.get(index).copied());

			match self.emit_product(record, parent_placement, shape) {
				Ok(entity) => {
					self.report.products += 1;
					products.push(Some(entity));
				}
				Err(err) => {
					warn!(class = %record.class, display_name = %record.name, error = %err, "product could not be created");
					self.report.skipped.push(SkippedProduct {
						class: record.class.clone(),
						name: record.name.clone(),
						reason: err.to_string(),
					});
					products.push(None);
				}
			}
		}
		Ok(products)
	}

	fn emit_product(&mut self, record: &ProductRecord<'_>, parent_placement: EntityRef, shape: Option<EntityRef>) -> std::result::Result<EntityRef, GraphError> {
		let location = self.graph.cartesian_point(record.object.location)?;
		let axis = self.graph.axis_placement(location)?;
		let placement = self.graph.local_placement(Some(parent_placement), axis)?;

		let mut attrs = record.attributes.clone();
		attrs.insert("GlobalId".to_owned(), AttrValue::Text(self.graph.new_global_id()));
		attrs.insert("OwnerHistory".to_owned(), self.owner_history.into());
		attrs.insert("ObjectPlacement".to_owned(), placement.into());
		if let Some(shape) = shape {
			attrs.insert("Representation".to_owned(), shape.into());
		}
		self.graph.create_entity(&record.class, attrs)
	}

	fn emit_containment(&mut self, products: &[Option<EntityRef>]) -> Result<()> {
		let flat = self.flat;
		for (&group, leaves) in &flat.containment {
			let related: Vec<EntityRef> = leaves.iter().filter_map(|index| products.get(*index).copied().flatten()).collect();
			if related.is_empty() {
				debug!(group, "no created leaves left to contain");
				continue;
			}

			let relating = self.placed(group)?.entity;
			self.graph.rel_contained_in_spatial_structure(self.owner_history, related, relating)?;
			self.report.containments += 1;
		}
		Ok(())
	}

	fn placed(&self, index: usize) -> Result<Placed> {
		self.structures.get(index).copied().flatten().ok_or_else(|| ExportError::UnresolvedStructure {
			name: self.flat.structures.get(index).map_or_else(|| format!("#{index}"), |item| item.name.clone()),
		})
	}
}

#[cfg(test)]
mod tests;
