//! Scroll bridge and list front-end for the `windowing` crate.
//!
//! The `windowing` crate is UI-agnostic and focuses on the offset table and window math. This
//! crate connects it to a scrolling container:
//!
//! - [`ScrollSurface`]: the container abstraction (listener registration, measurement)
//! - [`ScrollBridge`]: per-frame coalescing of scroll/resize events, the scroll-position
//!   listener, not-ready deferral, and listener release on drop
//! - Scroll anchoring (e.g. prepend in chat/timelines without visual jumps)
//! - [`VirtualList`]: owns the items, a height rule over items, and a render callback
//!
//! This crate is intentionally framework-agnostic (no DOM/egui/ratatui bindings).
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod anchor;
mod bridge;
mod list;
mod pending;
mod surface;


pub use anchor::{ScrollAnchor, anchor_offset, apply_anchor, capture_first_visible_anchor};
pub use bridge::{ScrollBridge, ScrollListener};
pub use list::{ItemHeight, RenderItem, RenderedItem, RenderedList, VirtualList};
pub use pending::{FrameUpdate, PendingScroll};
pub use surface::{ListenerId, ManagedSurface, ScrollSurface, SurfaceError};
