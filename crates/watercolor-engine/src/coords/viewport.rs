use glam::Vec2;

/// Upper bound applied to the device pixel ratio.
///
/// High-density displays beyond 2x cost fill rate without a visible gain for a
/// full-screen feedback effect.
pub const MAX_PIXEL_RATIO: f32 = 2.0;

/// Viewport size in logical pixels plus the effective pixel ratio.
///
/// `width`/`height` are the logical (DPI-independent) container size. Offscreen
/// render targets and the camera aspect derive from them; the drawing surface is
/// sized `logical * pixel_ratio`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub pixel_ratio: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32, pixel_ratio: f32) -> Self {
        Self { width, height, pixel_ratio }
    }

    /// Builds a viewport from a logical size and the raw device pixel ratio.
    ///
    /// The pixel ratio is capped at [`MAX_PIXEL_RATIO`].
    #[inline]
    pub fn from_logical(width: f32, height: f32, device_pixel_ratio: f32) -> Self {
        Self::new(width, height, capped_pixel_ratio(device_pixel_ratio))
    }

    /// Lowers the pixel ratio to at most `max`. Invalid caps are ignored.
    #[inline]
    pub fn with_pixel_ratio_cap(self, max: f32) -> Self {
        if !max.is_finite() || max <= 0.0 {
            return self;
        }
        Self { pixel_ratio: self.pixel_ratio.min(max), ..self }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Width / height. Returns 1.0 for degenerate sizes so projections stay finite.
    #[inline]
    pub fn aspect(self) -> f32 {
        if self.is_valid() { self.width / self.height } else { 1.0 }
    }

    /// Logical size rounded to whole pixels, never zero.
    #[inline]
    pub fn logical_size(self) -> (u32, u32) {
        (
            (self.width.round() as u32).max(1),
            (self.height.round() as u32).max(1),
        )
    }

    /// Size of the drawing buffer backing the visible surface.
    #[inline]
    pub fn drawing_buffer_size(self) -> (u32, u32) {
        (
            ((self.width * self.pixel_ratio).round() as u32).max(1),
            ((self.height * self.pixel_ratio).round() as u32).max(1),
        )
    }

    /// Maps a pointer position in logical pixels to normalized device coordinates.
    ///
    /// `x` grows right and `y` grows up, both in `[-1, 1]` inside the viewport.
    #[inline]
    pub fn pointer_to_ndc(self, x: f32, y: f32) -> Vec2 {
        let w = self.width.max(f32::EPSILON);
        let h = self.height.max(f32::EPSILON);
        Vec2::new((x / w) * 2.0 - 1.0, -(y / h) * 2.0 + 1.0)
    }
}

/// `min(device_pixel_ratio, MAX_PIXEL_RATIO)`; non-finite or non-positive input falls back to 1.
#[inline]
pub fn capped_pixel_ratio(device_pixel_ratio: f32) -> f32 {
    if !device_pixel_ratio.is_finite() || device_pixel_ratio <= 0.0 {
        return 1.0;
    }
    device_pixel_ratio.min(MAX_PIXEL_RATIO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_ratio_is_capped_at_two() {
        for (dpr, expected) in [(1.0, 1.0), (1.5, 1.5), (2.0, 2.0), (3.0, 2.0)] {
            assert_eq!(Viewport::from_logical(800.0, 600.0, dpr).pixel_ratio, expected);
        }
    }

    #[test]
    fn pixel_ratio_rejects_garbage() {
        assert_eq!(capped_pixel_ratio(0.0), 1.0);
        assert_eq!(capped_pixel_ratio(f32::NAN), 1.0);
    }

    #[test]
    fn aspect_of_800_by_600() {
        let vp = Viewport::from_logical(800.0, 600.0, 2.0);
        assert!((vp.aspect() - 4.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn drawing_buffer_scales_by_ratio() {
        let vp = Viewport::from_logical(800.0, 600.0, 2.0);
        assert_eq!(vp.logical_size(), (800, 600));
        assert_eq!(vp.drawing_buffer_size(), (1600, 1200));
    }

    #[test]
    fn center_maps_to_ndc_origin() {
        let vp = Viewport::from_logical(800.0, 600.0, 1.0);
        assert_eq!(vp.pointer_to_ndc(400.0, 300.0), Vec2::ZERO);
    }

    #[test]
    fn corners_map_to_ndc_extremes() {
        let vp = Viewport::from_logical(800.0, 600.0, 1.0);
        assert_eq!(vp.pointer_to_ndc(0.0, 0.0), Vec2::new(-1.0, 1.0));
        assert_eq!(vp.pointer_to_ndc(800.0, 600.0), Vec2::new(1.0, -1.0));
    }

    #[test]
    fn lower_cap_overrides_default() {
        let vp = Viewport::from_logical(800.0, 600.0, 2.0).with_pixel_ratio_cap(1.5);
        assert_eq!(vp.pixel_ratio, 1.5);
        assert_eq!(vp.with_pixel_ratio_cap(0.0).pixel_ratio, 1.5);
    }

    #[test]
    fn degenerate_viewport_keeps_unit_aspect() {
        assert_eq!(Viewport::new(0.0, 0.0, 1.0).aspect(), 1.0);
    }
}
