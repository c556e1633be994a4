use crate::{
    enums::{FrameOrder, ImageFormat},
    natural_sort::sort_naturally,
    volume::ImageVolume,
};

use dicom::{
    object::{FileDicomObject, InMemDicomObject, open_file},
    pixeldata::{ConvertOptions, PixelDecoder, VoiLutOption},
};
use dicom_dictionary_std::tags;
use image::ImageReader;
use ndarray::{Array2, Array3, s};
use rayon::prelude::*;
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum VolumeLoaderError {
    #[error("No valid images found")]
    NoValidImages,

    #[error("Inconsistent image dimensions")]
    InconsistentDimensions,

    #[error("Could not decode pixel data of {0}")]
    UndecodablePixelData(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("DICOM error: {0}")]
    Dicom(#[from] dicom::object::ReadError),
}

pub struct ImageVolumeLoader;

impl ImageVolumeLoader {
    /// Read the `(width, height)` of an image without decoding its pixels.
    ///
    /// Returns `None` when the file cannot be opened or its header does not
    /// describe a size.
    pub fn probe_dimensions(path: impl AsRef<Path>) -> Option<(u32, u32)> {
        let path = path.as_ref();
        match ImageFormat::from_path(path) {
            Some(ImageFormat::Dicom) => {
                let dicom_object = open_file(path).ok()?;
                let rows = dicom_object.element(tags::ROWS).ok()?.to_int::<u32>().ok()?;
                let columns = dicom_object
                    .element(tags::COLUMNS)
                    .ok()?
                    .to_int::<u32>()
                    .ok()?;
                Some((columns, rows))
            }
            _ => ImageReader::open(path)
                .ok()?
                .with_guessed_format()
                .ok()?
                .into_dimensions()
                .ok(),
        }
    }

    /// Load a volume from file paths, one frame per file in the given order.
    ///
    /// # Errors
    ///
    /// Returns error if no paths are given, any file fails to decode, or the
    /// frames differ in size
    pub fn load_from_file_paths(
        paths: &[impl AsRef<Path> + Sync],
    ) -> Result<ImageVolume, VolumeLoaderError> {
        if paths.is_empty() {
            return Err(VolumeLoaderError::NoValidImages);
        }

        let images = paths
            .par_iter()
            .map(|path| Self::decode_frame(path.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        Self::validate_dimensions(&images)?;

        let volume_array = Self::build_volume_array(&images);
        debug!(dim = ?volume_array.dim(), "built image volume");
        let files = paths.iter().map(|path| path.as_ref().to_path_buf()).collect();

        Ok(ImageVolume::new(volume_array, files))
    }

    /// Load a volume from every supported image in a directory
    pub fn load_from_directory(
        path: impl AsRef<Path>,
        order: FrameOrder,
    ) -> Result<ImageVolume, VolumeLoaderError> {
        let paths = Self::list_directory(path, order)?;

        if paths.is_empty() {
            return Err(VolumeLoaderError::NoValidImages);
        }

        Self::load_from_file_paths(&paths)
    }

    /// Files in `path` with a supported image extension, in frame order.
    pub fn list_directory(
        path: impl AsRef<Path>,
        order: FrameOrder,
    ) -> Result<Vec<PathBuf>, VolumeLoaderError> {
        let mut paths: Vec<_> = fs::read_dir(path.as_ref())?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && ImageFormat::from_path(path).is_some())
            .collect();

        match order {
            FrameOrder::Natural => sort_naturally(&mut paths),
            FrameOrder::Lexical => paths.sort(),
        }

        Ok(paths)
    }

    fn decode_frame(path: &Path) -> Result<Array2<u16>, VolumeLoaderError> {
        match ImageFormat::from_path(path) {
            Some(ImageFormat::Dicom) => {
                let dicom_object = open_file(path)?;
                Self::decode_dicom(&dicom_object)
                    .ok_or_else(|| VolumeLoaderError::UndecodablePixelData(path.to_path_buf()))
            }
            _ => {
                let luma = ImageReader::open(path)?
                    .with_guessed_format()?
                    .decode()?
                    .into_luma16();
                let (width, height) = luma.dimensions();
                Array2::from_shape_vec((height as usize, width as usize), luma.into_raw())
                    .map_err(|_| VolumeLoaderError::UndecodablePixelData(path.to_path_buf()))
            }
        }
    }

    fn decode_dicom(dicom_object: &FileDicomObject<InMemDicomObject>) -> Option<Array2<u16>> {
        let pixel_data = dicom_object.decode_pixel_data().ok()?;
        let options = ConvertOptions::new().with_voi_lut(VoiLutOption::First);
        pixel_data
            .to_ndarray_with_options::<u16>(&options)
            .ok()
            .map(|arr| arr.slice_move(s![0, .., .., 0]))
    }

    fn validate_dimensions(images: &[Array2<u16>]) -> Result<(), VolumeLoaderError> {
        let first_dim = images[0].dim();
        if images.iter().any(|img| img.dim() != first_dim) {
            return Err(VolumeLoaderError::InconsistentDimensions);
        }
        Ok(())
    }

    fn build_volume_array(images: &[Array2<u16>]) -> Array3<u16> {
        let (height, width) = images[0].dim();
        let depth = images.len();
        let mut volume = Array3::<u16>::zeros((depth, height, width));

        for (i, image) in images.iter().enumerate() {
            volume.slice_mut(s![i, .., ..]).assign(image);
        }

        volume
    }
}
