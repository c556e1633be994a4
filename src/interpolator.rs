use ndarray::ArrayView2;

pub(crate) struct Interpolator;

impl Interpolator {
    /// Map a normalized coordinate in `[0, 1]` onto pixel centres
    /// `0..=extent - 1`, clamping anything outside.
    #[inline]
    pub(crate) fn to_pixel(normalized: f64, extent: usize) -> f32 {
        let max = extent.saturating_sub(1) as f32;
        ((normalized as f32) * max).clamp(0.0, max)
    }

    #[inline]
    pub(crate) fn bilinear_interpolate(slice: &ArrayView2<u16>, y: f32, x: f32) -> f32 {
        let (height, width) = slice.dim();

        let y0 = y.floor() as usize;
        let x0 = x.floor() as usize;
        let y1 = (y0 + 1).min(height - 1);
        let x1 = (x0 + 1).min(width - 1);

        let dy = y - y0 as f32;
        let dx = x - x0 as f32;
        let one_minus_dx = 1.0 - dx;
        let one_minus_dy = 1.0 - dy;

        let v00 = f32::from(slice[[y0, x0]]);
        let v01 = f32::from(slice[[y0, x1]]);
        let v10 = f32::from(slice[[y1, x0]]);
        let v11 = f32::from(slice[[y1, x1]]);

        let v0 = v00.mul_add(one_minus_dx, v01 * dx);
        let v1 = v10.mul_add(one_minus_dx, v11 * dx);

        v0.mul_add(one_minus_dy, v1 * dy)
    }
}
