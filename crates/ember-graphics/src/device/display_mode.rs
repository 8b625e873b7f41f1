/// Refresh rate as a rational number of frames per second.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct RefreshRate {
    pub numerator: u32,
    pub denominator: u32,
}

impl RefreshRate {
    /// `0/1`: lets the swap chain pick the rate.
    pub const UNSPECIFIED: RefreshRate = RefreshRate { numerator: 0, denominator: 1 };

    #[inline]
    pub const fn new(numerator: u32, denominator: u32) -> Self {
        Self { numerator, denominator }
    }

    /// Hertz, or `None` for a zero denominator.
    pub fn hz(self) -> Option<f64> {
        (self.denominator != 0).then(|| self.numerator as f64 / self.denominator as f64)
    }
}

impl Default for RefreshRate {
    fn default() -> Self {
        Self::UNSPECIFIED
    }
}

/// One entry of an output's display mode list.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct DisplayMode {
    pub width: u32,
    pub height: u32,
    pub refresh_rate: RefreshRate,
}

/// Picks the refresh rate for a `width` x `height` swap chain.
///
/// The first mode with an exact size match wins; without one the rate is
/// [`RefreshRate::UNSPECIFIED`].
pub fn select_refresh_rate(modes: &[DisplayMode], width: u32, height: u32) -> RefreshRate {
    modes
        .iter()
        .find(|m| m.width == width && m.height == height)
        .map(|m| m.refresh_rate)
        .unwrap_or(RefreshRate::UNSPECIFIED)
}
