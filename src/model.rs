//! Assembly of the image region consumed by downstream steps.
//!
//! The region holds a unit square carrying a `coordinates` field, a `scale`
//! constant sized to the images, a `duration` constant for playback and a
//! `scaled_coordinates` field mapping the square onto pixel space. When
//! there are images, a material named `images` textures the square with an
//! image field holding every frame.

use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    image_context::ImageContextData,
    scene::{
        Context, MaterialId, Region, SceneError, create_finite_element_field,
        create_material_using_image_field, create_square_2d_finite_element,
        create_volume_image_field,
    },
    volume_loader::{ImageVolumeLoader, VolumeLoaderError},
};

pub const CONTEXT_NAME: &str = "images";
pub const REGION_NAME: &str = "images";
pub const SCALE_FIELD: &str = "scale";
pub const DURATION_FIELD: &str = "duration";
pub const SCALED_COORDINATES_FIELD: &str = "scaled_coordinates";
pub const MATERIAL_NAME: &str = "images";

const PLACEHOLDER_SCALE: [f64; 3] = [2.0, 3.0, 1.0];
const PLACEHOLDER_DURATION: f64 = 1.0;
const OFFSET: [f64; 3] = [0.5, 0.5, 0.0];
const UNIT_SQUARE: [[f64; 3]; 4] = [
    [0.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [1.0, 1.0, 0.0],
];

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    #[error("Image volume error: {0}")]
    Volume(#[from] VolumeLoaderError),

    #[error("Region has no field named {0:?}")]
    MissingField(&'static str),
}

/// Result of [`load_images`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadedImages {
    /// `[width, height]` of the first image, `[0, 0]` if unknown.
    pub image_dimensions: [u32; 2],
    pub material: Option<MaterialId>,
}

/// Create the `images` child of the default region and populate it with
/// placeholder geometry.
pub fn create_model(context: &mut Context) -> Result<&mut Region, SceneError> {
    let region = context.default_region_mut().create_child(REGION_NAME)?;
    let field_module = region.field_module_mut();

    let coordinate_field = create_finite_element_field(field_module)?;

    let scale_field = field_module.create_field_constant(&PLACEHOLDER_SCALE);
    field_module.set_name(scale_field, SCALE_FIELD)?;
    field_module.set_managed(scale_field, true)?;

    let duration_field = field_module.create_field_constant(&[PLACEHOLDER_DURATION]);
    field_module.set_name(duration_field, DURATION_FIELD)?;
    field_module.set_managed(duration_field, true)?;

    let offset_field = field_module.create_field_constant(&OFFSET);
    let scaled = field_module.create_field_multiply(scale_field, coordinate_field)?;
    let scaled_coordinate_field = field_module.create_field_add(scaled, offset_field)?;
    field_module.set_name(scaled_coordinate_field, SCALED_COORDINATES_FIELD)?;
    field_module.set_managed(scaled_coordinate_field, true)?;

    create_square_2d_finite_element(field_module, coordinate_field, UNIT_SQUARE)?;

    Ok(region)
}

/// Size the model to `images` and attach them as the `images` material.
///
/// Only the first image is probed; every frame is assumed to share its
/// size. An unreadable first image leaves the placeholders in place but the
/// image field is still built from all files.
pub fn load_images(
    images: &[PathBuf],
    frames_per_second: f64,
    region: &mut Region,
) -> Result<LoadedImages, ModelError> {
    let mut loaded = LoadedImages {
        image_dimensions: [0, 0],
        material: None,
    };
    let Some(first) = images.first() else {
        return Ok(loaded);
    };

    let (field_module, material_module) = region.modules_mut();
    match ImageVolumeLoader::probe_dimensions(first) {
        Some((width, height)) => {
            let cache = field_module.create_field_cache();
            let scale_field = field_module
                .find_field_by_name(SCALE_FIELD)
                .ok_or(ModelError::MissingField(SCALE_FIELD))?;
            field_module.assign_real(&cache, scale_field, &[f64::from(width), f64::from(height), 1.0])?;

            let duration = images.len() as f64 / frames_per_second;
            let duration_field = field_module
                .find_field_by_name(DURATION_FIELD)
                .ok_or(ModelError::MissingField(DURATION_FIELD))?;
            field_module.assign_real(&cache, duration_field, &[duration])?;

            debug!(width, height, duration, "sized image model");
            loaded.image_dimensions = [width, height];
        }
        None => warn!(path = %first.display(), "could not read image dimensions"),
    }

    let image_field = create_volume_image_field(field_module, images)?;
    let material = create_material_using_image_field(field_module, material_module, image_field)?;
    material_module.set_name(material, MATERIAL_NAME)?;
    material_module.set_managed(material, true)?;
    loaded.material = Some(material);

    Ok(loaded)
}

/// Build a fresh context for `images` played at `frames_per_second`.
pub fn build_image_context(
    images: &[PathBuf],
    frames_per_second: f64,
) -> Result<ImageContextData, ModelError> {
    let mut context = Context::new(CONTEXT_NAME);
    let region = create_model(&mut context)?;
    let loaded = load_images(images, frames_per_second, region)?;

    Ok(ImageContextData::new(
        context,
        frames_per_second,
        images.to_vec(),
        loaded.image_dimensions,
    ))
}

/// The `images` region built by [`create_model`], if present.
pub fn image_region(context: &Context) -> Option<&Region> {
    context.default_region().find_child(REGION_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::FieldModule;
    use image::{GrayImage, Luma};
    use std::path::Path;
    use tempfile::TempDir;

    fn write_frames(dir: &Path, count: usize, width: u32, height: u32) -> Vec<PathBuf> {
        (0..count)
            .map(|index| {
                let path = dir.join(format!("frame{index}.png"));
                GrayImage::from_pixel(width, height, Luma([(index * 40) as u8]))
                    .save(&path)
                    .unwrap();
                path
            })
            .collect()
    }

    fn value(module: &FieldModule, name: &str) -> Vec<f64> {
        let id = module.find_field_by_name(name).unwrap();
        module.evaluate_real(&module.create_field_cache(), id).unwrap()
    }

    #[test]
    fn model_starts_with_placeholders() {
        let mut context = Context::new(CONTEXT_NAME);
        let region = create_model(&mut context).unwrap();
        assert_eq!(region.name(), REGION_NAME);

        let module = region.field_module();
        assert_eq!(value(module, SCALE_FIELD), vec![2.0, 3.0, 1.0]);
        assert_eq!(value(module, DURATION_FIELD), vec![1.0]);
        for name in [SCALE_FIELD, DURATION_FIELD, SCALED_COORDINATES_FIELD] {
            let id = module.find_field_by_name(name).unwrap();
            assert!(module.field(id).unwrap().is_managed(), "{name}");
        }
        assert_eq!(module.mesh().element_count(), 1);
    }

    #[test]
    fn model_can_only_be_created_once_per_context() {
        let mut context = Context::new(CONTEXT_NAME);
        create_model(&mut context).unwrap();
        assert!(create_model(&mut context).is_err());
    }

    #[test]
    fn no_images_leaves_placeholders_and_builds_no_material() {
        let mut context = Context::new(CONTEXT_NAME);
        let region = create_model(&mut context).unwrap();
        let loaded = load_images(&[], 30.0, region).unwrap();
        assert_eq!(loaded.image_dimensions, [0, 0]);
        assert_eq!(loaded.material, None);
        assert!(region.material_module().materials().is_empty());
        assert_eq!(value(region.field_module(), DURATION_FIELD), vec![1.0]);
        let has_image_field = region
            .field_module()
            .fields()
            .any(|(_, field)| field.image_volume().is_some());
        assert!(!has_image_field);
    }

    #[test]
    fn images_size_the_model() {
        let dir = TempDir::new().unwrap();
        let images = write_frames(dir.path(), 3, 8, 6);
        let mut context = Context::new(CONTEXT_NAME);
        let region = create_model(&mut context).unwrap();

        let loaded = load_images(&images, 30.0, region).unwrap();
        assert_eq!(loaded.image_dimensions, [8, 6]);

        let module = region.field_module();
        assert_eq!(value(module, SCALE_FIELD), vec![8.0, 6.0, 1.0]);
        assert_eq!(value(module, DURATION_FIELD), vec![0.1]);

        let material = region.material_module().find_material_by_name(MATERIAL_NAME).unwrap();
        assert!(material.is_managed());
        assert_eq!(Some(material), loaded.material.and_then(|id| region.material_module().material(id)));
        let volume = module.field(material.image_field()).unwrap().image_volume().unwrap();
        assert_eq!(volume.frame_count(), 3);
        assert_eq!(volume.files(), images.as_slice());
    }

    #[test]
    fn scaled_coordinates_span_the_image() {
        let dir = TempDir::new().unwrap();
        let images = write_frames(dir.path(), 1, 8, 6);
        let mut context = Context::new(CONTEXT_NAME);
        let region = create_model(&mut context).unwrap();
        load_images(&images, 30.0, region).unwrap();

        let module = region.field_module();
        let scaled = module.find_field_by_name(SCALED_COORDINATES_FIELD).unwrap();
        let element = crate::scene::ElementId(0);
        let mut cache = module.create_field_cache();

        cache.set_mesh_location(element, [0.0, 0.0]);
        assert_eq!(module.evaluate_real(&cache, scaled).unwrap(), vec![0.5, 0.5, 0.0]);
        cache.set_mesh_location(element, [1.0, 1.0]);
        assert_eq!(module.evaluate_real(&cache, scaled).unwrap(), vec![8.5, 6.5, 0.0]);
    }

    #[test]
    fn unreadable_first_image_keeps_placeholders_but_still_fails_in_the_volume() {
        let dir = TempDir::new().unwrap();
        let broken = dir.path().join("broken.png");
        std::fs::write(&broken, b"not a png").unwrap();
        let mut context = Context::new(CONTEXT_NAME);
        let region = create_model(&mut context).unwrap();

        let error = load_images(&[broken], 30.0, region).unwrap_err();
        assert!(matches!(error, ModelError::Volume(_)));
        assert_eq!(value(region.field_module(), SCALE_FIELD), vec![2.0, 3.0, 1.0]);
    }

    #[test]
    fn builds_a_context_with_an_images_region() {
        let dir = TempDir::new().unwrap();
        let images = write_frames(dir.path(), 2, 4, 4);
        let data = build_image_context(&images, 2.0).unwrap();
        assert_eq!(data.image_dimensions(), [4, 4]);
        assert_eq!(data.frame_count(), 2);

        let region = image_region(data.context()).unwrap();
        assert_eq!(value(region.field_module(), DURATION_FIELD), vec![1.0]);
    }
}
