//! Display settings consumed by the device layer.

/// Back-buffer size in physical pixels.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// A zero-sized resolution cannot back a swap chain (minimized windows report one).
    #[inline]
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self::new(1280, 720)
    }
}

/// Initialization parameters for the graphics device.
///
/// Keep this structure small; it mirrors the settings the engine exposes to
/// users rather than every native swap-chain knob.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphicsSettings {
    /// Swap-chain and depth-buffer size.
    pub resolution: Resolution,

    /// Start in fullscreen instead of windowed mode.
    pub fullscreen: bool,

    /// Sync interval passed to present.
    ///
    /// `0` presents immediately, `1` waits for one vertical blank.
    pub vsync_interval: u32,
}

impl Default for GraphicsSettings {
    fn default() -> Self {
        Self {
            resolution: Resolution::default(),
            fullscreen: false,
            vsync_interval: 1,
        }
    }
}
