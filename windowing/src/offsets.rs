use alloc::vec::Vec;
use core::cmp;

/// Prefix sums over item heights.
///
/// Holds `N + 1` entries: `offset(i)` is the distance from the top of the content to the top of
/// item `i`, and `offset(N)` is the total content extent. The gap separates consecutive items, so
/// the last item carries no trailing gap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OffsetTable {
    offsets: Vec<u64>,
    gap: u32,
}

impl Default for OffsetTable {
    fn default() -> Self {
        Self::new()
    }
}

impl OffsetTable {
    /// An empty table (`[0]`).
    pub fn new() -> Self {
        Self {
            offsets: alloc::vec![0],
            gap: 0,
        }
    }

    pub fn build(heights: &[u32], gap: u32) -> Self {
        let mut table = Self::new();
        table.rebuild(heights, gap);
        table
    }

    /// Recomputes every entry from `heights`, reusing the allocation.
    pub fn rebuild(&mut self, heights: &[u32], gap: u32) {
        let n = heights.len();
        self.gap = gap;
        self.offsets.clear();
        self.offsets.reserve_exact(n + 1);
        self.offsets.push(0);

        let gap = gap as u64;
        let mut acc = 0u64;
        for (i, &h) in heights.iter().enumerate() {
            acc = acc.saturating_add(h as u64);
            if gap > 0 && i + 1 < n {
                acc = acc.saturating_add(gap);
            }
            self.offsets.push(acc);
        }
    }

    /// Number of items (one less than the number of entries).
    pub fn len(&self) -> usize {
        self.offsets.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn gap(&self) -> u32 {
        self.gap
    }

    pub fn as_slice(&self) -> &[u64] {
        &self.offsets
    }

    pub fn offset(&self, index: usize) -> Option<u64> {
        self.offsets.get(index).copied()
    }

    pub fn total(&self) -> u64 {
        self.offsets[self.len()]
    }

    /// The item's own height, without the gap that follows it.
    pub fn item_height(&self, index: usize) -> Option<u32> {
        let n = self.len();
        if index >= n {
            return None;
        }
        let mut span = self.offsets[index + 1] - self.offsets[index];
        if index + 1 < n {
            span = span.saturating_sub(self.gap as u64);
        }
        Some(cmp::min(span, u32::MAX as u64) as u32)
    }

    /// Greatest item index `i` with `offset(i) <= target`. `None` when the table is empty.
    pub fn last_start_at_or_before(&self, target: u64) -> Option<usize> {
        let n = self.len();
        if n == 0 {
            return None;
        }
        // offset(0) == 0 <= target, so at least one entry qualifies.
        let p = self.offsets[..n].partition_point(|&o| o <= target);
        Some(p - 1)
    }

    /// Least entry index `j` with `offset(j) >= target`, clamped to `len()`.
    pub fn first_start_at_or_after(&self, target: u64) -> usize {
        let p = self.offsets.partition_point(|&o| o < target);
        cmp::min(p, self.len())
    }

    /// The item containing `offset`. Offsets inside a gap map to the preceding item, offsets past
    /// the end map to the last item.
    pub fn index_at_offset(&self, offset: u64) -> Option<usize> {
        self.last_start_at_or_before(offset)
    }
}
