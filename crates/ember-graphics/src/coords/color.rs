use bytemuck::{Pod, Zeroable};

/// Linear RGBA color.
///
/// Values are expected in linear space. The layout matches the `[f32; 4]` the
/// clear calls consume.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct ColorRgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl ColorRgba {
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub const fn black() -> Self {
        Self::new(0.0, 0.0, 0.0, 1.0)
    }

    /// Returns the channels in `[r, g, b, a]` order.
    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        bytemuck::cast(self)
    }
}

impl From<[f32; 4]> for ColorRgba {
    #[inline]
    fn from(v: [f32; 4]) -> Self {
        bytemuck::cast(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_layout_is_rgba() {
        let c = ColorRgba::new(0.1, 0.2, 0.3, 0.4);
        assert_eq!(c.to_array(), [0.1, 0.2, 0.3, 0.4]);
        assert_eq!(ColorRgba::from([0.1, 0.2, 0.3, 0.4]), c);
    }
}
