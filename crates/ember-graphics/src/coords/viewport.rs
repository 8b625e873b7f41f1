/// Rasterizer viewport in physical pixels.
///
/// Mirrors the native viewport record: origin, extent and depth range.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub min_depth: f32,
    pub max_depth: f32,
}

impl Viewport {
    /// Full-target viewport anchored at the origin with depth range `[0, 1]`.
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width,
            height,
            min_depth: 0.0,
            max_depth: 1.0,
        }
    }

    #[inline]
    pub fn from_size(width: u32, height: u32) -> Self {
        Self::new(width as f32, height as f32)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}
