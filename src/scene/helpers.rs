//! Building blocks shared by anything that assembles a region.

use std::path::Path;

use super::{
    FieldId, FieldModule, MaterialId, MaterialModule, SceneError, mesh::ElementId,
};
use crate::volume_loader::{ImageVolumeLoader, VolumeLoaderError};

/// A managed 3-component finite element field named `coordinates`.
pub fn create_finite_element_field(field_module: &mut FieldModule) -> Result<FieldId, SceneError> {
    let coordinates = field_module.create_field_finite_element(3);
    field_module.set_name(coordinates, "coordinates")?;
    field_module.set_managed(coordinates, true)?;
    Ok(coordinates)
}

/// One square element whose four nodes take `node_coordinates` in the
/// order `(0,0), (1,0), (0,1), (1,1)`.
pub fn create_square_2d_finite_element(
    field_module: &mut FieldModule,
    coordinate_field: FieldId,
    node_coordinates: [[f64; 3]; 4],
) -> Result<ElementId, SceneError> {
    let mut nodes = Vec::with_capacity(4);
    for values in &node_coordinates {
        let node = field_module.mesh_mut().create_node();
        field_module.assign_node_values(coordinate_field, node, values)?;
        nodes.push(node);
    }
    let nodes = [nodes[0], nodes[1], nodes[2], nodes[3]];
    Ok(field_module.mesh_mut().create_element(nodes))
}

/// An image field holding every file as one frame, in the given order.
pub fn create_volume_image_field(
    field_module: &mut FieldModule,
    image_files: &[impl AsRef<Path> + Sync],
) -> Result<FieldId, VolumeLoaderError> {
    let volume = ImageVolumeLoader::load_from_file_paths(image_files)?;
    Ok(field_module.create_field_image(volume))
}

pub fn create_material_using_image_field(
    field_module: &FieldModule,
    material_module: &mut MaterialModule,
    image_field: FieldId,
) -> Result<MaterialId, SceneError> {
    let field = field_module.field(image_field)?;
    if field.image_volume().is_none() {
        return Err(SceneError::NotAnImageField(field.name().to_string()));
    }
    Ok(material_module.create_material(image_field))
}
