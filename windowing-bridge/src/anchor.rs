use windowing::Windowing;

/// A scroll anchor that can be used to preserve visual position across data changes.
///
/// Typical use cases:
/// - chat/timeline "prepend" (load older messages above) without content jumping
/// - replacing the collection while the viewport stays on the same logical row
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollAnchor {
    pub index: usize,
    /// The distance from the anchor item's top to the scroll offset.
    pub offset_in_item: u64,
}

/// Captures an anchor for the first visible item.
///
/// Returns `None` if the engine is disabled or the visible window is empty.
pub fn capture_first_visible_anchor(w: &Windowing) -> Option<ScrollAnchor> {
    let visible = w.visible_window();
    if visible.is_empty() {
        return None;
    }
    let index = visible.start;
    let top = w.item_layout(index)?.top;
    let offset = w.clamp_scroll_offset(w.scroll_offset());
    Some(ScrollAnchor {
        index,
        offset_in_item: offset.saturating_sub(top),
    })
}

/// Computes the scroll offset that puts a previously captured anchor back in place.
///
/// `remap` translates the anchor's old index into the current collection (for a prepend of `k`
/// items: `|i| Some(i + k)`). Returns `None` when the anchored item no longer exists.
pub fn anchor_offset(
    w: &Windowing,
    anchor: &ScrollAnchor,
    mut remap: impl FnMut(usize) -> Option<usize>,
) -> Option<u64> {
    let index = remap(anchor.index)?;
    let top = w.item_layout(index)?.top;
    Some(w.clamp_scroll_offset(top.saturating_add(anchor.offset_in_item)))
}

/// Applies a previously captured anchor by adjusting the scroll offset.
///
/// Returns `true` when the anchor was successfully applied.
pub fn apply_anchor(
    w: &mut Windowing,
    anchor: &ScrollAnchor,
    remap: impl FnMut(usize) -> Option<usize>,
) -> bool {
    let Some(target) = anchor_offset(w, anchor, remap) else {
        return false;
    };
    w.set_scroll_offset(target);
    true
}
