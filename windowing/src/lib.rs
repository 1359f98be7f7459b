//! A headless windowing engine for virtualized lists.
//!
//! For the scroll bridge (event coalescing, listener lifecycle, anchoring) and an item-aware
//! list front-end, see the `windowing-bridge` crate.
//!
//! This crate converts "N items, each with a height" into "the few items currently visible,
//! plus their absolute offsets":
//! - a height rule (fixed, or per item) normalized into whole units,
//! - an offset table of `N + 1` prefix sums,
//! - a window resolver (binary search, overscan, tail clamping),
//! - layout records an adapter can position absolutely.
//!
//! It is UI-agnostic. A TUI/GUI layer is expected to provide:
//! - viewport extent
//! - scroll offset
//! - the item count and a height rule
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod engine;
mod height;
mod layout;
mod offsets;
mod options;
mod state;
mod types;
mod window;

#[cfg(test)]
mod tests;

pub use engine::Windowing;
pub use height::{HeightError, HeightFallback, HeightRule, PerItemHeight, normalize_height};
pub use layout::Layouts;
pub use offsets::OffsetTable;
pub use options::{
    DEFAULT_IS_SCROLLING_RESET_DELAY_MS, DEFAULT_OVERSCAN, OnChangeCallback, WindowingConfig,
    WindowingOptions,
};
pub use state::{FrameState, ScrollState, ViewportState};
pub use types::{Align, ItemLayout, ScrollDirection, Viewport, Window};
pub use window::{max_scroll_offset, resolve_visible, resolve_window};
