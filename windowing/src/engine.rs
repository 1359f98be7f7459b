use alloc::sync::Arc;
use alloc::vec::Vec;
use core::cell::Cell;
use core::cmp;

use crate::height::evaluate_heights;
use crate::layout::{Layouts, layout_of};
use crate::window::{self, expand, resolve_visible};
use crate::{
    Align, FrameState, HeightRule, ItemLayout, OffsetTable, ScrollDirection, ScrollState,
    Viewport, ViewportState, Window, WindowingOptions,
};

/// A headless windowing engine.
///
/// Turns "N items, each with a height" into the small window of items currently visible plus
/// their absolute offsets:
/// - It does not hold any UI objects or the caller's items.
/// - Your adapter drives it by providing viewport extent and scroll offset.
/// - Layout is exposed via allocation-free iteration (`layouts`, `for_each_layout`).
///
/// The offset table is rebuilt only when the item count, gap, fallback policy or height rule
/// changes. Viewport and scroll updates reuse it.
#[derive(Clone, Debug)]
pub struct Windowing {
    options: WindowingOptions,
    viewport_extent: u32,
    scroll_offset: u64,
    scroll_direction: Option<ScrollDirection>,

    heights: Vec<u32>,
    table: OffsetTable,
    fallback_count: usize,

    notify_depth: Cell<usize>,
    notify_pending: Cell<bool>,
}

impl Windowing {
    pub fn new(options: WindowingOptions) -> Self {
        vdebug!(
            count = options.count,
            overscan = options.overscan,
            gap = options.gap,
            "Windowing::new"
        );
        let mut w = Self {
            viewport_extent: options.initial_extent.unwrap_or(0),
            scroll_offset: options.initial_offset,
            scroll_direction: None,
            heights: Vec::new(),
            table: OffsetTable::new(),
            fallback_count: 0,
            options,
            notify_depth: Cell::new(0),
            notify_pending: Cell::new(false),
        };
        w.rebuild();
        w
    }

    pub fn options(&self) -> &WindowingOptions {
        &self.options
    }

    /// Replaces all options, rebuilding only what the change requires.
    ///
    /// - `count`, `fallback` or a different height rule: heights are re-evaluated and the
    ///   offset table is rebuilt.
    /// - `gap` alone: the offset table is rebuilt from the cached heights.
    /// - `enabled` toggled: extent and offset go back to `initial_extent` / `initial_offset`. A
    ///   bridge reapplies the live viewport on its next frame.
    /// - `overscan`, `initial_*` and the reset delay take effect on the next query.
    ///
    /// Per-item rules compare by identity (`Arc::ptr_eq`), so cloning the current options and
    /// changing only `overscan` never re-runs the rule. Emits one `on_change`.
    pub fn set_options(&mut self, options: WindowingOptions) {
        let needs_rebuild = options.count != self.options.count
            || options.fallback != self.options.fallback
            || !options.height.same_as(&self.options.height);
        let gap_changed = options.gap != self.options.gap;
        let toggled = options.enabled != self.options.enabled;
        self.options = options;
        vtrace!(
            count = self.options.count,
            enabled = self.options.enabled,
            needs_rebuild,
            "Windowing::set_options"
        );

        if needs_rebuild {
            self.rebuild();
        } else if gap_changed {
            self.table.rebuild(&self.heights, self.options.gap);
        }
        if toggled {
            self.reset_viewport();
        }
        self.notify();
    }

    /// Clones the current options, applies `f`, then delegates to `set_options`.
    pub fn update_options(&mut self, f: impl FnOnce(&mut WindowingOptions)) {
        let mut next = self.options.clone();
        f(&mut next);
        self.set_options(next);
    }

    pub fn set_on_change(
        &mut self,
        on_change: Option<impl Fn(&Windowing) + Send + Sync + 'static>,
    ) {
        self.options.on_change = on_change.map(|f| Arc::new(f) as _);
    }

    fn notify_now(&self) {
        if let Some(cb) = &self.options.on_change {
            cb(self);
        }
    }

    fn notify(&self) {
        if self.notify_depth.get() > 0 {
            self.notify_pending.set(true);
            return;
        }
        self.notify_now();
    }

    /// Batches multiple updates into a single `on_change` notification.
    ///
    /// A scroll bridge typically updates the extent and offset together on a frame; without
    /// batching each setter would fire `on_change` separately.
    pub fn batch_update(&mut self, f: impl FnOnce(&mut Self)) {
        let depth = self.notify_depth.get();
        self.notify_depth.set(depth.saturating_add(1));

        f(self);

        let depth = self.notify_depth.get();
        debug_assert!(depth > 0, "notify_depth underflow");
        let next = depth.saturating_sub(1);
        self.notify_depth.set(next);

        if next == 0 && self.notify_pending.replace(false) {
            self.notify_now();
        }
    }

    pub fn count(&self) -> usize {
        self.options.count
    }

    pub fn enabled(&self) -> bool {
        self.options.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if self.options.enabled == enabled {
            return;
        }
        self.options.enabled = enabled;
        self.reset_viewport();
        self.notify();
    }

    fn reset_viewport(&mut self) {
        if self.options.enabled {
            self.viewport_extent = self.options.initial_extent.unwrap_or(0);
        } else {
            self.viewport_extent = 0;
        }
        self.scroll_offset = self.options.initial_offset;
        self.scroll_direction = None;
    }

    pub fn set_count(&mut self, count: usize) {
        if self.options.count == count {
            return;
        }
        self.options.count = count;
        self.rebuild();
        self.notify();
    }

    /// Replaces the height rule and rebuilds the offset table.
    ///
    /// Passing a clone of the current rule (same `Arc`, or the same fixed value) is a no-op.
    pub fn set_height_rule(&mut self, height: impl Into<HeightRule>) {
        let height = height.into();
        if height.same_as(&self.options.height) {
            return;
        }
        self.options.height = height;
        self.rebuild();
        self.notify();
    }

    /// Re-evaluates the current height rule for every item.
    ///
    /// Use this when the data a per-item rule reads changed behind the same closure.
    pub fn invalidate_heights(&mut self) {
        self.rebuild();
        self.notify();
    }

    pub fn set_gap(&mut self, gap: u32) {
        if self.options.gap == gap {
            return;
        }
        self.options.gap = gap;
        self.table.rebuild(&self.heights, gap);
        self.notify();
    }

    pub fn set_overscan(&mut self, overscan: usize) {
        if self.options.overscan == overscan {
            return;
        }
        self.options.overscan = overscan;
        self.notify();
    }

    pub fn scroll_direction(&self) -> Option<ScrollDirection> {
        self.scroll_direction
    }

    pub fn viewport_extent(&self) -> u32 {
        self.viewport_extent
    }

    pub fn scroll_offset(&self) -> u64 {
        self.scroll_offset
    }

    pub fn viewport(&self) -> Viewport {
        Viewport {
            offset: self.scroll_offset,
            extent: self.viewport_extent,
        }
    }

    /// Updates the viewport extent. The offset table is reused.
    pub fn set_viewport_extent(&mut self, extent: u32) {
        if !self.options.enabled || self.viewport_extent == extent {
            return;
        }
        self.viewport_extent = extent;
        self.notify();
    }

    pub fn set_scroll_offset(&mut self, offset: u64) {
        if !self.options.enabled || self.scroll_offset == offset {
            return;
        }
        let prev = self.scroll_offset;
        self.scroll_offset = offset;
        self.scroll_direction = match offset.cmp(&prev) {
            cmp::Ordering::Greater => Some(ScrollDirection::Forward),
            cmp::Ordering::Less => Some(ScrollDirection::Backward),
            cmp::Ordering::Equal => self.scroll_direction,
        };
        self.notify();
    }

    pub fn set_scroll_offset_clamped(&mut self, offset: u64) {
        let clamped = self.clamp_scroll_offset(offset);
        self.set_scroll_offset(clamped);
    }

    /// Applies extent and offset together with a single `on_change`.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.batch_update(|w| {
            w.set_viewport_extent(viewport.extent);
            w.set_scroll_offset(viewport.offset);
        });
    }

    /// Returns a lightweight snapshot of the current viewport + scroll state.
    pub fn frame_state(&self) -> FrameState {
        FrameState {
            viewport: ViewportState {
                extent: self.viewport_extent,
            },
            scroll: ScrollState {
                offset: self.scroll_offset,
            },
        }
    }

    /// Restores viewport + scroll state from a previously captured snapshot.
    ///
    /// The offset is clamped against the current content, which may have changed since capture.
    pub fn restore_frame_state(&mut self, frame: FrameState) {
        self.batch_update(|w| {
            w.set_viewport_extent(frame.viewport.extent);
            w.set_scroll_offset_clamped(frame.scroll.offset);
        });
    }

    /// The total content extent (`offset[N]`), for sizing an inner spacer.
    pub fn total_extent(&self) -> u64 {
        if !self.options.enabled {
            return 0;
        }
        self.table.total()
    }

    pub fn offsets(&self) -> &OffsetTable {
        &self.table
    }

    /// How many items fell back to a substitute height in the last rebuild.
    pub fn fallback_count(&self) -> usize {
        self.fallback_count
    }

    pub fn max_scroll_offset(&self) -> u64 {
        if !self.options.enabled {
            return 0;
        }
        window::max_scroll_offset(&self.table, self.viewport_extent)
    }

    pub fn clamp_scroll_offset(&self, offset: u64) -> u64 {
        offset.min(self.max_scroll_offset())
    }

    /// The overscanned window for the current viewport.
    pub fn window(&self) -> Window {
        self.window_for(self.scroll_offset, self.viewport_extent)
    }

    pub fn window_for(&self, scroll_offset: u64, viewport_extent: u32) -> Window {
        expand(
            self.visible_window_for(scroll_offset, viewport_extent),
            self.options.overscan,
            self.table.len(),
        )
    }

    /// The window without overscan.
    pub fn visible_window(&self) -> Window {
        self.visible_window_for(self.scroll_offset, self.viewport_extent)
    }

    pub fn visible_window_for(&self, scroll_offset: u64, viewport_extent: u32) -> Window {
        if !self.options.enabled {
            return Window::EMPTY;
        }
        resolve_visible(&self.table, scroll_offset, viewport_extent)
    }

    /// Layout records for the current overscanned window.
    pub fn layouts(&self) -> Layouts<'_> {
        Layouts::new(&self.table, self.window())
    }

    pub fn layouts_for(&self, window: Window) -> Layouts<'_> {
        Layouts::new(&self.table, window)
    }

    pub fn for_each_layout(&self, mut f: impl FnMut(ItemLayout)) {
        for layout in self.layouts() {
            f(layout);
        }
    }

    /// Collects the current layout records into `out` (clears `out` first).
    ///
    /// For per-frame use, prefer `for_each_layout` or reuse the same buffer.
    pub fn collect_layouts(&self, out: &mut Vec<ItemLayout>) {
        out.clear();
        out.extend(self.layouts());
    }

    pub fn item_layout(&self, index: usize) -> Option<ItemLayout> {
        if !self.options.enabled {
            return None;
        }
        layout_of(&self.table, index)
    }

    pub fn index_at_offset(&self, offset: u64) -> Option<usize> {
        if !self.options.enabled {
            return None;
        }
        self.table.index_at_offset(offset)
    }

    /// Programmatically scrolls to an index. Returns the applied (clamped) offset.
    pub fn scroll_to_index(&mut self, index: usize, align: Align) -> u64 {
        let offset = self.scroll_to_index_offset(index, align);
        self.set_scroll_offset(offset);
        offset
    }

    pub fn scroll_to_index_offset(&self, index: usize, align: Align) -> u64 {
        if !self.options.enabled || self.table.is_empty() {
            return 0;
        }
        let index = index.min(self.table.len() - 1);
        let Some(item) = layout_of(&self.table, index) else {
            return 0;
        };
        let view = self.viewport_extent as u64;

        let target = match align {
            Align::Start => item.top,
            Align::End => item.bottom().saturating_sub(view),
            Align::Center => {
                let center = item.top.saturating_add(item.height as u64 / 2);
                center.saturating_sub(view / 2)
            }
            Align::Auto => {
                let cur = self.scroll_offset;
                let cur_end = cur.saturating_add(view);
                if item.top >= cur && item.bottom() <= cur_end {
                    cur
                } else if item.top < cur {
                    item.top
                } else {
                    item.bottom().saturating_sub(view)
                }
            }
        };

        self.clamp_scroll_offset(target)
    }

    fn rebuild(&mut self) {
        self.fallback_count = evaluate_heights(
            &self.options.height,
            self.options.count,
            self.options.fallback,
            &mut self.heights,
        );
        self.table.rebuild(&self.heights, self.options.gap);
        vdebug!(
            count = self.options.count,
            total = self.table.total(),
            fallbacks = self.fallback_count,
            "Windowing::rebuild"
        );
    }
}
