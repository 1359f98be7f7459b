use alloc::sync::Arc;
use alloc::vec::Vec;

use windowing::{Align, ItemLayout, Viewport, Windowing, WindowingOptions};

use crate::anchor::{ScrollAnchor, anchor_offset, capture_first_visible_anchor};
use crate::{FrameUpdate, ListenerId, PendingScroll, ScrollSurface};

/// Receives the raw (unclamped) scroll offset whenever it changes.
pub type ScrollListener = Arc<dyn Fn(u64) + Send + Sync>;

/// Connects a [`Windowing`] engine to a scrolling surface.
///
/// The bridge does not hold any UI objects beyond the surface handle. Adapters drive it by
/// calling:
/// - `on_scroll` / `on_resize` from native events (cheap: they only record the latest values)
/// - `on_frame(now_ms)` once per animation frame, which resolves the window at most once
///
/// Until the surface accepts a listener and reports a viewport, the bridge stays not-ready and
/// keeps retrying on each frame. Dropping the bridge releases the listener; so does `detach`,
/// after which frames are ignored until `reattach`.
pub struct ScrollBridge<S: ScrollSurface> {
    engine: Windowing,
    surface: S,
    listener: Option<ListenerId>,
    ready: bool,
    detached: bool,
    /// Last viewport reported by the surface. Reapplied on every resolving frame.
    observed: Viewport,
    pending: PendingScroll,
    scroll_listener: Option<ScrollListener>,
    last_reported: Option<u64>,
    is_scrolling: bool,
    last_scroll_event_ms: Option<u64>,
    layouts: Vec<ItemLayout>,
    resolves: u64,
}

impl<S: ScrollSurface> ScrollBridge<S> {
    pub fn new(options: WindowingOptions, surface: S) -> Self {
        Self::from_engine(Windowing::new(options), surface)
    }

    pub fn from_engine(engine: Windowing, surface: S) -> Self {
        let mut bridge = Self {
            last_reported: Some(engine.scroll_offset()),
            engine,
            surface,
            listener: None,
            ready: false,
            detached: false,
            observed: Viewport::default(),
            pending: PendingScroll::default(),
            scroll_listener: None,
            is_scrolling: false,
            last_scroll_event_ms: None,
            layouts: Vec::new(),
            resolves: 0,
        };
        bridge.connect();
        bridge
    }

    pub fn with_scroll_listener(mut self, f: impl Fn(u64) + Send + Sync + 'static) -> Self {
        self.scroll_listener = Some(Arc::new(f));
        self
    }

    pub fn set_scroll_listener(&mut self, f: Option<impl Fn(u64) + Send + Sync + 'static>) {
        self.scroll_listener = f.map(|f| Arc::new(f) as _);
    }

    pub fn engine(&self) -> &Windowing {
        &self.engine
    }

    /// Mutable access to the engine. Layout-affecting changes are picked up on the next frame.
    ///
    /// That frame reapplies the last observed viewport, so the surface stays authoritative for
    /// extent and offset (e.g. after `set_enabled(true)` reset them).
    pub fn engine_mut(&mut self) -> &mut Windowing {
        self.pending.invalidate();
        &mut self.engine
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Listening and measured: frames will resolve.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn is_listening(&self) -> bool {
        self.listener.is_some()
    }

    pub fn is_detached(&self) -> bool {
        self.detached
    }

    pub fn is_scrolling(&self) -> bool {
        self.is_scrolling
    }

    /// Number of window resolutions performed so far.
    pub fn resolve_count(&self) -> u64 {
        self.resolves
    }

    /// Layout records emitted by the most recent resolving frame.
    pub fn layouts(&self) -> &[ItemLayout] {
        &self.layouts
    }

    /// Tries to attach to the surface. Returns `true` once the bridge is ready.
    ///
    /// Always `false` after `detach`.
    pub fn connect(&mut self) -> bool {
        if self.ready {
            return true;
        }
        if self.detached {
            return false;
        }
        if self.listener.is_none() {
            match self.surface.listen() {
                Ok(id) => {
                    vdebug!(listener = id.0, "ScrollBridge: listening");
                    self.listener = Some(id);
                }
                Err(_err) => {
                    vdebug!(error = %_err, "ScrollBridge: surface not ready, deferring");
                    return false;
                }
            }
        }
        let Some(viewport) = self.surface.viewport() else {
            vtrace!("ScrollBridge: surface not measured yet");
            return false;
        };
        self.pending.seed(viewport);
        self.ready = true;
        true
    }

    /// Records a native scroll event. Resolution happens on the next frame.
    pub fn on_scroll(&mut self, offset: u64, now_ms: u64) {
        vtrace!(offset, now_ms, "ScrollBridge::on_scroll");
        self.pending.record_scroll(offset);
        self.last_scroll_event_ms = Some(now_ms);
        self.is_scrolling = true;
    }

    /// Records a viewport resize. The offset table is reused on the next frame.
    pub fn on_resize(&mut self, extent: u32) {
        vtrace!(extent, "ScrollBridge::on_resize");
        self.pending.record_extent(extent);
    }

    /// Forces the next frame to resolve even if the viewport did not change.
    pub fn invalidate(&mut self) {
        self.pending.invalidate();
    }

    /// Runs one animation frame.
    ///
    /// Applies every event recorded since the previous frame in one batch, notifies the scroll
    /// listener, and resolves the window. Returns the emitted layout, or `None` when nothing
    /// changed, the surface is not ready, or the bridge was detached.
    pub fn on_frame(&mut self, now_ms: u64) -> Option<&[ItemLayout]> {
        self.update_scrolling(now_ms);
        if !self.connect() {
            return None;
        }
        let update = self.pending.take()?;
        self.apply(update);

        self.engine.collect_layouts(&mut self.layouts);
        self.resolves = self.resolves.saturating_add(1);
        vtrace!(
            events = update.events,
            start = self.engine.window().start,
            end = self.engine.window().end,
            "ScrollBridge::on_frame resolved"
        );
        Some(self.layouts.as_slice())
    }

    fn apply(&mut self, update: FrameUpdate) {
        if let Some(extent) = update.extent {
            self.observed.extent = extent;
        }
        if let Some(offset) = update.offset {
            self.observed.offset = offset;
        }
        // The engine drops viewport writes while disabled and resets them when re-enabled.
        self.engine.set_viewport(self.observed);

        let Some(offset) = update.offset else {
            return;
        };
        if self.last_reported == Some(offset) {
            return;
        }
        self.last_reported = Some(offset);
        if let Some(listener) = &self.scroll_listener {
            listener(offset);
        }
    }

    fn update_scrolling(&mut self, now_ms: u64) {
        if !self.is_scrolling {
            return;
        }
        let Some(last) = self.last_scroll_event_ms else {
            return;
        };
        let delay = self.engine.options().is_scrolling_reset_delay_ms;
        if now_ms.saturating_sub(last) >= delay {
            self.is_scrolling = false;
            self.last_scroll_event_ms = None;
        }
    }

    /// Scrolls the surface so `index` is aligned; the window follows on the next frame.
    ///
    /// Returns the target (clamped) offset.
    pub fn scroll_to_index(&mut self, index: usize, align: Align) -> u64 {
        let offset = self.engine.scroll_to_index_offset(index, align);
        self.scroll_to_offset(offset)
    }

    pub fn scroll_to_offset(&mut self, offset: u64) -> u64 {
        let offset = self.engine.clamp_scroll_offset(offset);
        self.surface.scroll_to(offset);
        self.pending.record_scroll(offset);
        offset
    }

    pub fn capture_anchor(&self) -> Option<ScrollAnchor> {
        capture_first_visible_anchor(&self.engine)
    }

    /// Restores an anchor captured before a data change, scrolling the surface to match.
    pub fn apply_anchor(
        &mut self,
        anchor: &ScrollAnchor,
        remap: impl FnMut(usize) -> Option<usize>,
    ) -> bool {
        let Some(offset) = anchor_offset(&self.engine, anchor, remap) else {
            return false;
        };
        self.surface.scroll_to(offset);
        self.pending.record_scroll(offset);
        true
    }

    /// Releases the surface listener. Safe to call more than once.
    ///
    /// Later frames return `None` and never listen again, so a frame callback still queued at
    /// teardown cannot re-register the observer.
    pub fn detach(&mut self) {
        self.ready = false;
        self.detached = true;
        self.pending = PendingScroll::default();
        if let Some(id) = self.listener.take() {
            vdebug!(listener = id.0, "ScrollBridge: released listener");
            self.surface.unlisten(id);
        }
    }

    /// Undoes `detach` and tries to listen again. Returns `true` once ready.
    pub fn reattach(&mut self) -> bool {
        self.detached = false;
        self.pending.invalidate();
        self.connect()
    }
}

impl<S: ScrollSurface> Drop for ScrollBridge<S> {
    fn drop(&mut self) {
        self.detach();
    }
}

impl<S: ScrollSurface + core::fmt::Debug> core::fmt::Debug for ScrollBridge<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ScrollBridge")
            .field("engine", &self.engine)
            .field("surface", &self.surface)
            .field("listener", &self.listener)
            .field("ready", &self.ready)
            .field("detached", &self.detached)
            .field("pending", &self.pending)
            .field("is_scrolling", &self.is_scrolling)
            .field("resolves", &self.resolves)
            .finish_non_exhaustive()
    }
}
