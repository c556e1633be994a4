use std::path::{Path, PathBuf};

use crate::{
    enums::FrameOrder,
    scene::Context,
    volume_loader::{ImageVolumeLoader, VolumeLoaderError},
};

/// Ordered image files handed to the step by whatever is wired upstream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageSequence {
    files: Vec<PathBuf>,
}

impl ImageSequence {
    pub fn new(files: Vec<PathBuf>) -> Self {
        Self { files }
    }

    /// Every supported image in `directory`, in `order`.
    pub fn from_directory(
        directory: impl AsRef<Path>,
        order: FrameOrder,
    ) -> Result<Self, VolumeLoaderError> {
        ImageVolumeLoader::list_directory(directory, order).map(Self::new)
    }

    pub fn image_files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl<P: Into<PathBuf>> FromIterator<P> for ImageSequence {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

/// The output of one execution: a context holding the `images` region, plus
/// what a viewer needs to play it back.
///
/// Immutable once built; a new execution produces a new value.
#[derive(Debug)]
pub struct ImageContextData {
    context: Context,
    frames_per_second: f64,
    image_file_names: Vec<PathBuf>,
    image_dimensions: [u32; 2],
}

impl ImageContextData {
    pub fn new(
        context: Context,
        frames_per_second: f64,
        image_file_names: Vec<PathBuf>,
        image_dimensions: [u32; 2],
    ) -> Self {
        Self {
            context,
            frames_per_second,
            image_file_names,
            image_dimensions,
        }
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn frames_per_second(&self) -> f64 {
        self.frames_per_second
    }

    pub fn frame_count(&self) -> usize {
        self.image_file_names.len()
    }

    pub fn image_file_names(&self) -> &[PathBuf] {
        &self.image_file_names
    }

    /// `[width, height]` in pixels, `[0, 0]` when unknown.
    pub fn image_dimensions(&self) -> [u32; 2] {
        self.image_dimensions
    }
}
