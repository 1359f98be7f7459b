use core::cmp;

use crate::{OffsetTable, Window};

/// Largest scroll offset that still fills the viewport (0 when content fits).
pub fn max_scroll_offset(table: &OffsetTable, viewport_extent: u32) -> u64 {
    table.total().saturating_sub(viewport_extent as u64)
}

/// Resolves the items intersecting `[scroll_offset, scroll_offset + viewport_extent)`.
///
/// Scroll offsets past the end of the content are clamped first, so a list whose content shrank
/// below the current scroll position resolves to its tail instead of an empty window. A zero
/// extent means the viewport has not been measured yet and resolves to an empty window.
pub fn resolve_visible(table: &OffsetTable, scroll_offset: u64, viewport_extent: u32) -> Window {
    let n = table.len();
    if n == 0 || viewport_extent == 0 {
        return Window::EMPTY;
    }

    let start_offset = scroll_offset.min(max_scroll_offset(table, viewport_extent));
    let end_offset = start_offset.saturating_add(viewport_extent as u64);

    let Some(start) = table.last_start_at_or_before(start_offset) else {
        return Window::EMPTY;
    };
    let end = table.first_start_at_or_after(end_offset);
    let end = cmp::min(n, cmp::max(end, start + 1));

    Window { start, end }
}

/// Resolves the visible window and widens it by `overscan` items on each side, clamped to
/// `[0, N)`.
pub fn resolve_window(
    table: &OffsetTable,
    scroll_offset: u64,
    viewport_extent: u32,
    overscan: usize,
) -> Window {
    expand(
        resolve_visible(table, scroll_offset, viewport_extent),
        overscan,
        table.len(),
    )
}

pub(crate) fn expand(visible: Window, overscan: usize, count: usize) -> Window {
    if visible.is_empty() {
        return visible;
    }
    Window {
        start: visible.start.saturating_sub(overscan),
        end: cmp::min(count, visible.end.saturating_add(overscan)),
    }
}
