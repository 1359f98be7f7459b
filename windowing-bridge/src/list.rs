use alloc::sync::Arc;
use alloc::vec::Vec;

use windowing::{HeightError, HeightRule, ItemLayout, Windowing, WindowingConfig, WindowingOptions};

use crate::{ScrollAnchor, ScrollBridge, ScrollSurface};

/// Height of each item in a [`VirtualList`].
///
/// An `Err` from `TryPerItem` is treated like a non-finite or negative height: the engine
/// substitutes its [`HeightFallback`](windowing::HeightFallback) and counts it in
/// `fallback_count`.
pub enum ItemHeight<T> {
    Fixed(f64),
    PerItem(Arc<dyn Fn(&T, usize) -> f64 + Send + Sync>),
    TryPerItem(Arc<dyn Fn(&T, usize) -> Result<f64, HeightError> + Send + Sync>),
}

impl<T> ItemHeight<T> {
    pub fn per_item(f: impl Fn(&T, usize) -> f64 + Send + Sync + 'static) -> Self {
        Self::PerItem(Arc::new(f))
    }

    pub fn try_per_item(
        f: impl Fn(&T, usize) -> Result<f64, HeightError> + Send + Sync + 'static,
    ) -> Self {
        Self::TryPerItem(Arc::new(f))
    }
}

impl<T> Clone for ItemHeight<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Fixed(h) => Self::Fixed(*h),
            Self::PerItem(f) => Self::PerItem(Arc::clone(f)),
            Self::TryPerItem(f) => Self::TryPerItem(Arc::clone(f)),
        }
    }
}

impl<T> core::fmt::Debug for ItemHeight<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Fixed(h) => f.debug_tuple("Fixed").field(h).finish(),
            Self::PerItem(_) => f.write_str("PerItem(..)"),
            Self::TryPerItem(_) => f.write_str("TryPerItem(..)"),
        }
    }
}

pub type RenderItem<T, R> = Arc<dyn Fn(&T, usize) -> R + Send + Sync>;

/// A rendered node plus where to put it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedItem<R> {
    pub layout: ItemLayout,
    pub node: R,
}

/// Output of one render pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedList<R> {
    /// Size for the inner spacer element.
    pub total_extent: u64,
    pub items: Vec<RenderedItem<R>>,
}

/// An item-aware virtual list.
///
/// Owns the caller's collection, the height rule over items and the render callback, and drives
/// a [`ScrollBridge`]. The render callback is only called for items inside the resolved window.
pub struct VirtualList<T, R, S: ScrollSurface> {
    items: Arc<[T]>,
    item_height: ItemHeight<T>,
    render_item: RenderItem<T, R>,
    bridge: ScrollBridge<S>,
}

impl<T, R, S> VirtualList<T, R, S>
where
    T: Send + Sync + 'static,
    S: ScrollSurface,
{
    pub fn new(
        items: impl Into<Arc<[T]>>,
        item_height: ItemHeight<T>,
        render_item: impl Fn(&T, usize) -> R + Send + Sync + 'static,
        surface: S,
    ) -> Self {
        Self::with_config(
            items,
            item_height,
            render_item,
            surface,
            WindowingConfig::default(),
        )
    }

    pub fn with_config(
        items: impl Into<Arc<[T]>>,
        item_height: ItemHeight<T>,
        render_item: impl Fn(&T, usize) -> R + Send + Sync + 'static,
        surface: S,
        config: WindowingConfig,
    ) -> Self {
        let items = items.into();
        let options = WindowingOptions::new(items.len(), height_rule(&items, &item_height))
            .with_config(config);
        Self {
            bridge: ScrollBridge::new(options, surface),
            items,
            item_height,
            render_item: Arc::new(render_item),
        }
    }

    pub fn with_scroll_listener(mut self, f: impl Fn(u64) + Send + Sync + 'static) -> Self {
        self.bridge.set_scroll_listener(Some(f));
        self
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn engine(&self) -> &Windowing {
        self.bridge.engine()
    }

    pub fn bridge(&self) -> &ScrollBridge<S> {
        &self.bridge
    }

    pub fn bridge_mut(&mut self) -> &mut ScrollBridge<S> {
        &mut self.bridge
    }

    /// Replaces the collection and rebuilds the offset table once.
    pub fn set_items(&mut self, items: impl Into<Arc<[T]>>) {
        self.items = items.into();
        let count = self.items.len();
        let rule = height_rule(&self.items, &self.item_height);
        self.bridge.engine_mut().update_options(|o| {
            o.count = count;
            o.height = rule;
        });
    }

    /// Replaces the collection while keeping the first visible item in place.
    ///
    /// `remap` maps an index in the old collection to its index in the new one. Returns `true`
    /// when the anchor could be restored.
    pub fn set_items_anchored(
        &mut self,
        items: impl Into<Arc<[T]>>,
        remap: impl FnMut(usize) -> Option<usize>,
    ) -> bool {
        let anchor: Option<ScrollAnchor> = self.bridge.capture_anchor();
        self.set_items(items);
        match anchor {
            Some(anchor) => self.bridge.apply_anchor(&anchor, remap),
            None => false,
        }
    }

    pub fn set_item_height(&mut self, item_height: ItemHeight<T>) {
        let rule = height_rule(&self.items, &item_height);
        self.item_height = item_height;
        self.bridge.engine_mut().set_height_rule(rule);
    }

    pub fn set_gap(&mut self, gap: u32) {
        self.bridge.engine_mut().set_gap(gap);
    }

    pub fn set_overscan(&mut self, overscan: usize) {
        self.bridge.engine_mut().set_overscan(overscan);
    }

    pub fn on_scroll(&mut self, offset: u64, now_ms: u64) {
        self.bridge.on_scroll(offset, now_ms);
    }

    pub fn on_resize(&mut self, extent: u32) {
        self.bridge.on_resize(extent);
    }

    /// Runs one animation frame; renders only when the window was re-resolved.
    pub fn on_frame(&mut self, now_ms: u64) -> Option<RenderedList<R>> {
        self.bridge.on_frame(now_ms)?;
        Some(self.render())
    }

    /// Renders the current window without waiting for a frame.
    pub fn render(&self) -> RenderedList<R> {
        let engine = self.bridge.engine();
        let items = engine
            .layouts()
            .filter_map(|layout| {
                let item = self.items.get(layout.index)?;
                Some(RenderedItem {
                    layout,
                    node: (self.render_item)(item, layout.index),
                })
            })
            .collect();
        RenderedList {
            total_extent: engine.total_extent(),
            items,
        }
    }
}

fn height_rule<T: Send + Sync + 'static>(
    items: &Arc<[T]>,
    item_height: &ItemHeight<T>,
) -> HeightRule {
    match item_height {
        ItemHeight::Fixed(h) => HeightRule::Fixed(*h),
        ItemHeight::PerItem(f) => {
            let items = Arc::clone(items);
            let f = Arc::clone(f);
            HeightRule::try_per_item(move |index| match items.get(index) {
                Some(item) => Ok(f(item, index)),
                None => Err(HeightError::MissingItem { index }),
            })
        }
        ItemHeight::TryPerItem(f) => {
            let items = Arc::clone(items);
            let f = Arc::clone(f);
            HeightRule::try_per_item(move |index| match items.get(index) {
                Some(item) => f(item, index),
                None => Err(HeightError::MissingItem { index }),
            })
        }
    }
}

impl<T, R, S: ScrollSurface + core::fmt::Debug> core::fmt::Debug for VirtualList<T, R, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("VirtualList")
            .field("len", &self.items.len())
            .field("item_height", &self.item_height)
            .field("bridge", &self.bridge)
            .finish_non_exhaustive()
    }
}
