use windowing::Viewport;

/// Viewport changes observed since the last frame, folded into one update.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameUpdate {
    pub offset: Option<u64>,
    pub extent: Option<u32>,
    /// How many raw events were folded into this update.
    pub events: u32,
}

/// Collects scroll/resize events between frames.
///
/// Later events overwrite earlier ones, so the update taken at frame time always carries the last
/// observed position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PendingScroll {
    offset: Option<u64>,
    extent: Option<u32>,
    dirty: bool,
    events: u32,
}

impl PendingScroll {
    pub fn record_scroll(&mut self, offset: u64) {
        self.offset = Some(offset);
        self.events = self.events.saturating_add(1);
    }

    pub fn record_extent(&mut self, extent: u32) {
        self.extent = Some(extent);
        self.events = self.events.saturating_add(1);
    }

    /// Fills in values that no event has reported yet.
    pub fn seed(&mut self, viewport: Viewport) {
        self.offset.get_or_insert(viewport.offset);
        self.extent.get_or_insert(viewport.extent);
    }

    /// Forces the next frame to resolve even without viewport changes (e.g. the data changed).
    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    pub fn is_empty(&self) -> bool {
        self.offset.is_none() && self.extent.is_none() && !self.dirty
    }

    pub fn take(&mut self) -> Option<FrameUpdate> {
        if self.is_empty() {
            return None;
        }
        let update = FrameUpdate {
            offset: self.offset,
            extent: self.extent,
            events: self.events,
        };
        *self = Self::default();
        Some(update)
    }
}
