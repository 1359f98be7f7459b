use core::iter::FusedIterator;

use crate::{ItemLayout, OffsetTable, Window};

/// Yields an [`ItemLayout`] for every index of a window, in ascending order.
///
/// Does not allocate; indexes outside the table are skipped.
#[derive(Clone, Debug)]
pub struct Layouts<'a> {
    table: &'a OffsetTable,
    next: usize,
    end: usize,
}

impl<'a> Layouts<'a> {
    pub fn new(table: &'a OffsetTable, window: Window) -> Self {
        let end = window.end.min(table.len());
        Self {
            table,
            next: window.start.min(end),
            end,
        }
    }
}

impl Iterator for Layouts<'_> {
    type Item = ItemLayout;

    fn next(&mut self) -> Option<ItemLayout> {
        if self.next >= self.end {
            return None;
        }
        let index = self.next;
        self.next += 1;
        layout_of(self.table, index)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.end - self.next;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Layouts<'_> {}
impl FusedIterator for Layouts<'_> {}

pub(crate) fn layout_of(table: &OffsetTable, index: usize) -> Option<ItemLayout> {
    Some(ItemLayout {
        index,
        top: table.offset(index)?,
        height: table.item_height(index)?,
    })
}
