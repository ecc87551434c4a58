use crate::ifc::{AttrValue, EntityGraph, EntityRef, ExportError, Mesh, Result, attributes};

/// Convert a mesh into an `IfcProductDefinitionShape` holding one faceted B-rep.
///
/// Every vertex becomes a point and every polygon a face whose outer loop walks
/// the polygon's indices in source order. Orientation is not corrected.
pub fn product_shape<G: EntityGraph>(graph: &mut G, mesh: &Mesh, body_context: EntityRef) -> Result<EntityRef> {
	let mut points = Vec::with_capacity(mesh.vertices.len());
	for vertex in &mesh.vertices {
		points.push(graph.cartesian_point(*vertex)?);
	}

	let mut faces = Vec::with_capacity(mesh.polygons.len());
	for (polygon, indices) in mesh.polygons.iter().enumerate() {
		let mut ring = Vec::with_capacity(indices.len());
		for &vertex in indices {
			let point = points.get(vertex).copied().ok_or_else(|| ExportError::VertexOutOfRange {
				mesh: mesh.name.clone(),
				polygon,
				vertex,
				vertex_count: points.len(),
			})?;
			ring.push(point);
		}
		let poly_loop = graph.poly_loop(ring)?;
		let bound = graph.face_outer_bound(poly_loop, true)?;
		faces.push(graph.face(vec![bound])?);
	}

	let shell = graph.closed_shell(faces)?;
	let brep = graph.create_entity("IfcFacetedBrep", attributes([("Outer", shell.into())]))?;
	let representation = graph.create_entity(
		"IfcShapeRepresentation",
		attributes([
			("ContextOfItems", body_context.into()),
			("RepresentationIdentifier", AttrValue::Text("Body".to_owned())),
			("RepresentationType", AttrValue::Text("Brep".to_owned())),
			("Items", AttrValue::entities([brep])),
		]),
	)?;
	Ok(graph.create_entity("IfcProductDefinitionShape", attributes([("Representations", AttrValue::entities([representation]))]))?)
}
