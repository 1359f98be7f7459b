use alloc::sync::Arc;

use crate::engine::Windowing;
use crate::{HeightError, HeightFallback, HeightRule};

/// A callback fired when the engine's state changes (viewport, scroll, or layout inputs).
pub type OnChangeCallback = Arc<dyn Fn(&Windowing) + Send + Sync>;

pub const DEFAULT_OVERSCAN: usize = 5;
pub const DEFAULT_IS_SCROLLING_RESET_DELAY_MS: u64 = 150;

/// Plain-data settings that can be loaded from a config file.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`; missing fields take
/// their defaults.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WindowingConfig {
    pub overscan: usize,
    pub gap: u32,
    pub fallback: HeightFallback,
    pub initial_offset: u64,
    pub initial_extent: Option<u32>,
    /// How long after the last scroll event a bridge keeps reporting `is_scrolling`.
    pub is_scrolling_reset_delay_ms: u64,
}

impl Default for WindowingConfig {
    fn default() -> Self {
        Self {
            overscan: DEFAULT_OVERSCAN,
            gap: 0,
            fallback: HeightFallback::default(),
            initial_offset: 0,
            initial_extent: None,
            is_scrolling_reset_delay_ms: DEFAULT_IS_SCROLLING_RESET_DELAY_MS,
        }
    }
}

/// Configuration for [`crate::Windowing`].
///
/// Cheap to clone: the height rule and callback live behind `Arc`s, so callers can tweak a field
/// and hand the options back via `Windowing::set_options` without re-creating closures.
pub struct WindowingOptions {
    pub count: usize,
    pub height: HeightRule,
    /// Extra items resolved on each side of the visible range.
    pub overscan: usize,
    /// Space between consecutive items.
    pub gap: u32,
    pub fallback: HeightFallback,
    /// Viewport extent to use before the first measurement arrives.
    pub initial_extent: Option<u32>,
    pub initial_offset: u64,
    pub is_scrolling_reset_delay_ms: u64,
    /// Enables/disables the engine. When disabled, query methods return empty results.
    pub enabled: bool,
    pub on_change: Option<OnChangeCallback>,
}

impl Clone for WindowingOptions {
    fn clone(&self) -> Self {
        Self {
            count: self.count,
            height: self.height.clone(),
            overscan: self.overscan,
            gap: self.gap,
            fallback: self.fallback,
            initial_extent: self.initial_extent,
            initial_offset: self.initial_offset,
            is_scrolling_reset_delay_ms: self.is_scrolling_reset_delay_ms,
            enabled: self.enabled,
            on_change: self.on_change.clone(),
        }
    }
}

impl WindowingOptions {
    pub fn new(count: usize, height: impl Into<HeightRule>) -> Self {
        let config = WindowingConfig::default();
        Self {
            count,
            height: height.into(),
            overscan: config.overscan,
            gap: config.gap,
            fallback: config.fallback,
            initial_extent: config.initial_extent,
            initial_offset: config.initial_offset,
            is_scrolling_reset_delay_ms: config.is_scrolling_reset_delay_ms,
            enabled: true,
            on_change: None,
        }
    }

    /// Options for items of one fixed height.
    pub fn fixed(count: usize, height: f64) -> Self {
        Self::new(count, HeightRule::Fixed(height))
    }

    /// Options for items whose height depends on their index.
    pub fn per_item(count: usize, height: impl Fn(usize) -> f64 + Send + Sync + 'static) -> Self {
        Self::new(count, HeightRule::per_item(height))
    }

    pub fn try_per_item(
        count: usize,
        height: impl Fn(usize) -> Result<f64, HeightError> + Send + Sync + 'static,
    ) -> Self {
        Self::new(count, HeightRule::try_per_item(height))
    }

    pub fn config(&self) -> WindowingConfig {
        WindowingConfig {
            overscan: self.overscan,
            gap: self.gap,
            fallback: self.fallback,
            initial_offset: self.initial_offset,
            initial_extent: self.initial_extent,
            is_scrolling_reset_delay_ms: self.is_scrolling_reset_delay_ms,
        }
    }

    pub fn with_config(mut self, config: WindowingConfig) -> Self {
        self.overscan = config.overscan;
        self.gap = config.gap;
        self.fallback = config.fallback;
        self.initial_offset = config.initial_offset;
        self.initial_extent = config.initial_extent;
        self.is_scrolling_reset_delay_ms = config.is_scrolling_reset_delay_ms;
        self
    }

    pub fn with_height(mut self, height: impl Into<HeightRule>) -> Self {
        self.height = height.into();
        self
    }

    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    pub fn with_gap(mut self, gap: u32) -> Self {
        self.gap = gap;
        self
    }

    pub fn with_fallback(mut self, fallback: HeightFallback) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn with_initial_extent(mut self, extent: Option<u32>) -> Self {
        self.initial_extent = extent;
        self
    }

    pub fn with_initial_offset(mut self, offset: u64) -> Self {
        self.initial_offset = offset;
        self
    }

    pub fn with_is_scrolling_reset_delay_ms(mut self, delay_ms: u64) -> Self {
        self.is_scrolling_reset_delay_ms = delay_ms;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_on_change(
        mut self,
        on_change: Option<impl Fn(&Windowing) + Send + Sync + 'static>,
    ) -> Self {
        self.on_change = on_change.map(|f| Arc::new(f) as _);
        self
    }
}

impl core::fmt::Debug for WindowingOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WindowingOptions")
            .field("count", &self.count)
            .field("height", &self.height)
            .field("overscan", &self.overscan)
            .field("gap", &self.gap)
            .field("fallback", &self.fallback)
            .field("initial_extent", &self.initial_extent)
            .field("initial_offset", &self.initial_offset)
            .field(
                "is_scrolling_reset_delay_ms",
                &self.is_scrolling_reset_delay_ms,
            )
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}
