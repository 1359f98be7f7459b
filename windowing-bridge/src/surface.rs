use alloc::string::String;

use windowing::Viewport;

/// Handle returned by [`ScrollSurface::listen`], passed back to release the listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ListenerId(pub u64);

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SurfaceError {
    /// The container does not exist yet (e.g. its view has not been mounted).
    #[error("scroll surface is not attached")]
    NotAttached,
    #[error("scroll surface rejected the listener: {0}")]
    Rejected(String),
}

/// A scrolling container the bridge observes.
///
/// Implementations register whatever native scroll/resize observer the host platform needs in
/// `listen`, and must release it in `unlisten`. The host then forwards the observed events to
/// [`crate::ScrollBridge::on_scroll`] / [`crate::ScrollBridge::on_resize`].
pub trait ScrollSurface {
    /// Current scroll offset and extent, or `None` while the container is not measurable.
    fn viewport(&self) -> Option<Viewport>;

    fn listen(&mut self) -> Result<ListenerId, SurfaceError>;

    fn unlisten(&mut self, id: ListenerId);

    /// Moves the container's scroll position (programmatic scrolling).
    fn scroll_to(&mut self, _offset: u64) {}
}

/// A container owned by the bridge itself: the host only reports its measurements.
#[derive(Clone, Debug, Default)]
pub struct ManagedSurface {
    offset: u64,
    extent: Option<u32>,
    next_id: u64,
    active: Option<ListenerId>,
}

impl ManagedSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// A surface that is already measured.
    pub fn with_extent(extent: u32) -> Self {
        Self {
            extent: Some(extent),
            ..Self::default()
        }
    }

    pub fn resize(&mut self, extent: u32) {
        self.extent = Some(extent);
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn is_listening(&self) -> bool {
        self.active.is_some()
    }
}

impl ScrollSurface for ManagedSurface {
    fn viewport(&self) -> Option<Viewport> {
        let extent = self.extent?;
        Some(Viewport {
            offset: self.offset,
            extent,
        })
    }

    fn listen(&mut self) -> Result<ListenerId, SurfaceError> {
        if let Some(id) = self.active {
            return Err(SurfaceError::Rejected(alloc::format!(
                "listener {} is already registered",
                id.0
            )));
        }
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.active = Some(id);
        Ok(id)
    }

    fn unlisten(&mut self, id: ListenerId) {
        if self.active == Some(id) {
            self.active = None;
        }
    }

    fn scroll_to(&mut self, offset: u64) {
        self.offset = offset;
    }
}
