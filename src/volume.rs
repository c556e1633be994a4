use std::path::PathBuf;

use crate::interpolator::Interpolator;

use image::ImageBuffer;
use image::Luma;
use ndarray::Array3;
use ndarray::ArrayView2;
use ndarray::s;
use rayon::prelude::*;

/// A sequence of equally sized 2D frames stacked along a third axis.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageVolume {
    data: Array3<u16>,
    files: Vec<PathBuf>,
}

impl ImageVolume {
    pub fn new(data: Array3<u16>, files: Vec<PathBuf>) -> Self {
        Self { data, files }
    }

    /// Get the dimensions of the volume (frames, height, width)
    pub fn dim(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    pub fn frame_count(&self) -> usize {
        self.data.dim().0
    }

    /// `[width, height]` of every frame.
    pub fn frame_dimensions(&self) -> [usize; 2] {
        let (_, height, width) = self.data.dim();
        [width, height]
    }

    /// Files the frames were read from, in frame order.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Get a reference to the underlying data
    pub fn data(&self) -> &Array3<u16> {
        &self.data
    }

    #[inline]
    fn normalize_to_u8(value: u16) -> u8 {
        ((value as f32 / 65535.0) * 255.0).clamp(0.0, 255.0) as u8
    }

    pub fn frame(&self, index: usize) -> Option<ArrayView2<'_, u16>> {
        (index < self.frame_count()).then(|| self.data.slice(s![index, .., ..]))
    }

    /// Render one frame as an 8-bit grayscale image.
    pub fn frame_image(&self, index: usize) -> Option<ImageBuffer<Luma<u8>, Vec<u8>>> {
        let frame = self.frame(index)?;
        let (height, width) = frame.dim();
        let pixel_data: Vec<u8> = frame
            .into_par_iter()
            .map(|&v| Self::normalize_to_u8(v))
            .collect();
        ImageBuffer::from_raw(width as u32, height as u32, pixel_data)
    }

    /// Sample the intensity in `[0, 1]` at texture coordinates `xi`.
    ///
    /// `xi[0]` runs across the width, `xi[1]` down the rows and `xi[2]`
    /// through the frames; each spans `[0, 1]` and is clamped to it. In-frame
    /// values are interpolated bilinearly, the frame is the nearest one.
    pub fn sample(&self, xi: [f64; 3]) -> Option<f64> {
        let (frames, height, width) = self.data.dim();
        if frames == 0 || height == 0 || width == 0 {
            return None;
        }
        let index = Interpolator::to_pixel(xi[2], frames).round() as usize;
        let frame = self.frame(index)?;
        let x = Interpolator::to_pixel(xi[0], width);
        let y = Interpolator::to_pixel(xi[1], height);
        let value = Interpolator::bilinear_interpolate(&frame, y, x);
        Some(f64::from(value) / f64::from(u16::MAX))
    }
}
