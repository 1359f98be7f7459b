use crate::*;

use alloc::string::ToString;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicUsize, Ordering};

#[derive(Clone, Copy, Debug)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u64(&mut self) -> u64 {
        // Deterministic, dependency-free PRNG for tests.
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    fn gen_range_u64(&mut self, start: u64, end_exclusive: u64) -> u64 {
        debug_assert!(start < end_exclusive);
        let span = end_exclusive - start;
        start + (self.next_u64() % span)
    }

    fn gen_range_usize(&mut self, start: usize, end_exclusive: usize) -> usize {
        self.gen_range_u64(start as u64, end_exclusive as u64) as usize
    }

    fn gen_range_u32(&mut self, start: u32, end_exclusive: u32) -> u32 {
        self.gen_range_u64(start as u64, end_exclusive as u64) as u32
    }
}

fn expected_offsets(heights: &[u32], gap: u32) -> Vec<u64> {
    let mut out = alloc::vec![0u64];
    let mut acc = 0u64;
    for (i, &h) in heights.iter().enumerate() {
        acc += h as u64;
        if i + 1 < heights.len() {
            acc += gap as u64;
        }
        out.push(acc);
    }
    out
}

fn heights_rule(heights: &[u32]) -> HeightRule {
    let heights: Arc<[u32]> = heights.into();
    HeightRule::per_item(move |i| heights[i] as f64)
}

#[test]
fn empty_list_has_single_entry_table_and_empty_window() {
    let w = Windowing::new(WindowingOptions::fixed(0, 40.0).with_initial_extent(Some(300)));
    assert_eq!(w.offsets().as_slice(), &[0]);
    assert_eq!(w.total_extent(), 0);
    assert_eq!(w.window(), Window::EMPTY);
    assert_eq!(w.window_for(10_000, 300), Window::EMPTY);
    assert_eq!(w.layouts().count(), 0);
    assert_eq!(w.index_at_offset(0), None);
}

#[test]
fn fixed_height_window_without_overscan() {
    let w = Windowing::new(
        WindowingOptions::fixed(100, 40.0)
            .with_overscan(0)
            .with_initial_extent(Some(300)),
    );
    // 300 / 40 = 7.5, so the eighth item is partially visible.
    assert_eq!(w.window(), Window::new(0, 8));
    assert_eq!(w.total_extent(), 4000);
}

#[test]
fn overscan_is_clamped_at_the_start() {
    let w = Windowing::new(
        WindowingOptions::fixed(100, 40.0)
            .with_overscan(5)
            .with_initial_extent(Some(300)),
    );
    assert_eq!(w.visible_window(), Window::new(0, 8));
    assert_eq!(w.window(), Window::new(0, 13));
}

#[test]
fn overscan_widens_both_sides_mid_list() {
    let mut w = Windowing::new(
        WindowingOptions::fixed(100, 40.0)
            .with_overscan(2)
            .with_initial_extent(Some(80)),
    );
    w.set_scroll_offset(400);
    assert_eq!(w.visible_window(), Window::new(10, 12));
    assert_eq!(w.window(), Window::new(8, 14));
}

#[test]
fn variable_heights_match_manual_prefix_sum() {
    let w = Windowing::new(WindowingOptions::per_item(10_000, |i| {
        40.0 + (i % 3) as f64 * 10.0
    }));
    assert_eq!(&w.offsets().as_slice()[..6], &[0, 40, 90, 150, 190, 240]);
    assert_eq!(w.offsets().len(), 10_000);
    assert_eq!(w.item_layout(2).map(|l| l.height), Some(60));
}

#[test]
fn scrolling_past_content_clamps_to_tail() {
    let mut w = Windowing::new(
        WindowingOptions::fixed(200, 40.0)
            .with_overscan(0)
            .with_initial_extent(Some(300)),
    );
    assert_eq!(w.total_extent(), 8000);
    w.set_scroll_offset(10_000);

    let win = w.window();
    assert!(!win.is_empty());
    assert_eq!(win.end, 200);
    // Clamped to 8000 - 300 = 7700, inside item 192.
    assert_eq!(win.start, 192);
}

#[test]
fn shrinking_content_keeps_a_tail_window() {
    let mut w = Windowing::new(
        WindowingOptions::fixed(1000, 10.0)
            .with_overscan(1)
            .with_initial_extent(Some(50)),
    );
    w.set_scroll_offset(9000);
    assert_eq!(w.visible_window(), Window::new(900, 905));

    w.set_count(20);
    // Scroll offset is kept as-is; only resolution clamps.
    assert_eq!(w.scroll_offset(), 9000);
    assert_eq!(w.visible_window(), Window::new(15, 20));
    assert_eq!(w.window(), Window::new(14, 20));
}

#[test]
fn zero_extent_means_not_ready() {
    let w = Windowing::new(WindowingOptions::fixed(10, 10.0));
    assert_eq!(w.viewport_extent(), 0);
    assert!(w.window().is_empty());
}

#[test]
fn gap_separates_items_without_trailing_gap() {
    let heights = [10u32, 20, 30, 40];
    let w = Windowing::new(
        WindowingOptions::new(4, heights_rule(&heights))
            .with_gap(5)
            .with_initial_extent(Some(1000)),
    );
    // sum(100) + (n - 1) * gap(15)
    assert_eq!(w.total_extent(), 115);
    assert_eq!(w.offsets().as_slice(), &[0, 15, 40, 75, 115]);

    let layouts: Vec<ItemLayout> = w.layouts().collect();
    assert_eq!(layouts.len(), 4);
    for (l, &h) in layouts.iter().zip(heights.iter()) {
        assert_eq!(l.height, h);
    }
    for pair in layouts.windows(2) {
        assert!(pair[0].top < pair[1].top);
        assert_eq!(pair[0].bottom() + 5, pair[1].top);
    }
}

#[test]
fn index_at_offset_inside_gap_maps_to_previous_item() {
    let w = Windowing::new(WindowingOptions::fixed(2, 2.0).with_gap(1));
    // layout: item0(0..2), gap(2..3), item1(3..5)
    assert_eq!(w.index_at_offset(0), Some(0));
    assert_eq!(w.index_at_offset(2), Some(0));
    assert_eq!(w.index_at_offset(3), Some(1));
    assert_eq!(w.index_at_offset(99), Some(1));
}

#[test]
fn set_gap_rebuilds_offsets_without_reevaluating() {
    let evals = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&evals);
    let mut w = Windowing::new(WindowingOptions::per_item(3, move |_| {
        counter.fetch_add(1, Ordering::Relaxed);
        2.0
    }));
    assert_eq!(evals.load(Ordering::Relaxed), 3);
    assert_eq!(w.total_extent(), 6);

    w.set_gap(1);
    assert_eq!(w.total_extent(), 8);
    assert_eq!(evals.load(Ordering::Relaxed), 3);
}

#[test]
fn invalid_heights_use_last_valid_by_default() {
    let w = Windowing::new(WindowingOptions::per_item(5, |i| match i {
        0 => 10.0,
        1 => f64::NAN,
        2 => -3.0,
        3 => 7.0,
        _ => f64::INFINITY,
    }));
    assert_eq!(w.fallback_count(), 3);
    let heights: Vec<u32> = (0..5).filter_map(|i| w.offsets().item_height(i)).collect();
    assert_eq!(heights, [10, 10, 10, 7, 7]);
}

#[test]
fn invalid_heights_before_any_valid_item_fall_back_to_zero() {
    let w = Windowing::new(WindowingOptions::per_item(3, |i| {
        if i == 0 { f64::NAN } else { 4.0 }
    }));
    assert_eq!(w.offsets().as_slice(), &[0, 0, 4, 8]);
}

#[test]
fn fallback_policy_is_configurable() {
    let rule = |i: usize| if i == 1 { -1.0 } else { 10.0 };

    let zero = Windowing::new(WindowingOptions::per_item(3, rule).with_fallback(HeightFallback::Zero));
    assert_eq!(zero.total_extent(), 20);

    let fixed = Windowing::new(
        WindowingOptions::per_item(3, rule).with_fallback(HeightFallback::Value(3)),
    );
    assert_eq!(fixed.total_extent(), 23);
}

#[test]
fn failing_rule_does_not_abort_the_rebuild() {
    let w = Windowing::new(WindowingOptions::try_per_item(4, |i| {
        if i == 2 {
            Err(HeightError::Unavailable {
                index: i,
                reason: "row not loaded".to_string(),
            })
        } else {
            Ok(5.0)
        }
    }));
    assert_eq!(w.fallback_count(), 1);
    assert_eq!(w.total_extent(), 20);
    assert_eq!(w.offsets().len(), 4);
}

#[test]
fn invalid_fixed_height_collapses_every_item() {
    let w = Windowing::new(WindowingOptions::fixed(4, f64::NAN));
    assert_eq!(w.fallback_count(), 4);
    assert_eq!(w.total_extent(), 0);
}

#[test]
fn fractional_heights_round_up() {
    assert_eq!(normalize_height(12.0), Some(12));
    assert_eq!(normalize_height(12.25), Some(13));
    assert_eq!(normalize_height(0.0), Some(0));
    assert_eq!(normalize_height(-0.5), None);
    assert_eq!(normalize_height(f64::NAN), None);
    assert_eq!(normalize_height(1e20), Some(u32::MAX));
}

#[test]
fn rebuild_is_idempotent_and_resolution_deterministic() {
    let rule = HeightRule::per_item(|i| 10.0 + (i % 7) as f64);
    let mut w = Windowing::new(WindowingOptions::new(500, rule).with_gap(2));
    let before = w.offsets().clone();
    w.invalidate_heights();
    assert_eq!(w.offsets(), &before);

    let a = resolve_window(w.offsets(), 1234, 200, 3);
    let b = resolve_window(w.offsets(), 1234, 200, 3);
    assert_eq!(a, b);
}

#[test]
fn same_rule_does_not_rebuild_but_new_rule_does() {
    let evals = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&evals);
    let rule = HeightRule::per_item(move |_| {
        counter.fetch_add(1, Ordering::Relaxed);
        1.0
    });
    let mut w = Windowing::new(WindowingOptions::new(10, rule.clone()));
    assert_eq!(evals.load(Ordering::Relaxed), 10);

    w.set_height_rule(rule.clone());
    w.set_height_rule(rule);
    assert_eq!(evals.load(Ordering::Relaxed), 10);

    w.set_height_rule(HeightRule::Fixed(3.0));
    assert_eq!(w.total_extent(), 30);
    w.set_height_rule(3.0);
    assert_eq!(w.total_extent(), 30);
}

#[test]
fn viewport_changes_reuse_the_offset_table() {
    let evals = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&evals);
    let mut w = Windowing::new(WindowingOptions::per_item(100, move |_| {
        counter.fetch_add(1, Ordering::Relaxed);
        10.0
    }));
    w.set_viewport(Viewport {
        offset: 120,
        extent: 40,
    });
    w.set_viewport_extent(80);
    w.set_scroll_offset(300);
    assert_eq!(evals.load(Ordering::Relaxed), 100);
    assert_eq!(w.visible_window(), Window::new(30, 38));
}

#[test]
fn batch_update_coalesces_on_change() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let mut w = Windowing::new(
        WindowingOptions::fixed(100, 10.0).with_on_change(Some(move |_: &Windowing| {
            counter.fetch_add(1, Ordering::Relaxed);
        })),
    );

    w.set_viewport_extent(50);
    w.set_scroll_offset(10);
    assert_eq!(calls.load(Ordering::Relaxed), 2);

    w.batch_update(|w| {
        w.set_viewport_extent(60);
        w.set_scroll_offset(20);
        w.set_overscan(1);
    });
    assert_eq!(calls.load(Ordering::Relaxed), 3);

    // Nothing changed: no notification.
    w.batch_update(|w| w.set_scroll_offset(20));
    assert_eq!(calls.load(Ordering::Relaxed), 3);
}

#[test]
fn scroll_direction_follows_offset_changes() {
    let mut w = Windowing::new(WindowingOptions::fixed(100, 10.0));
    assert_eq!(w.scroll_direction(), None);
    w.set_scroll_offset(50);
    assert_eq!(w.scroll_direction(), Some(ScrollDirection::Forward));
    w.set_scroll_offset(20);
    assert_eq!(w.scroll_direction(), Some(ScrollDirection::Backward));
}

#[test]
fn scroll_to_index_aligns_and_clamps() {
    let mut w = Windowing::new(WindowingOptions::fixed(100, 10.0).with_initial_extent(Some(30)));
    assert_eq!(w.scroll_to_index_offset(5, Align::Start), 50);
    assert_eq!(w.scroll_to_index_offset(5, Align::End), 30);
    assert_eq!(w.scroll_to_index_offset(5, Align::Center), 40);
    assert_eq!(w.scroll_to_index_offset(99, Align::Start), 970);
    assert_eq!(w.scroll_to_index_offset(500, Align::Start), 970);

    w.set_scroll_offset(40);
    // Already fully visible.
    assert_eq!(w.scroll_to_index_offset(5, Align::Auto), 40);
    assert_eq!(w.scroll_to_index_offset(1, Align::Auto), 10);
    assert_eq!(w.scroll_to_index_offset(9, Align::Auto), 70);

    assert_eq!(w.scroll_to_index(20, Align::Start), 200);
    assert_eq!(w.scroll_offset(), 200);
}

#[test]
fn disabled_engine_reports_nothing() {
    let mut w = Windowing::new(WindowingOptions::fixed(100, 10.0).with_initial_extent(Some(50)));
    assert!(!w.window().is_empty());

    w.set_enabled(false);
    assert_eq!(w.total_extent(), 0);
    assert!(w.window().is_empty());
    assert_eq!(w.item_layout(0), None);
    w.set_scroll_offset(40);
    assert_eq!(w.scroll_offset(), 0);

    w.set_enabled(true);
    assert_eq!(w.viewport_extent(), 50);
    assert_eq!(w.window(), Window::new(0, 10));
}

#[test]
fn frame_state_restore_clamps_to_current_content() {
    let mut w = Windowing::new(WindowingOptions::fixed(100, 10.0));
    w.set_viewport(Viewport {
        offset: 600,
        extent: 40,
    });
    let frame = w.frame_state();
    assert_eq!(frame.scroll.offset, 600);

    let mut smaller = Windowing::new(WindowingOptions::fixed(20, 10.0));
    smaller.restore_frame_state(frame);
    assert_eq!(smaller.viewport_extent(), 40);
    assert_eq!(smaller.scroll_offset(), 160);
}

#[test]
fn set_options_rebuilds_only_on_layout_inputs() {
    let evals = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&evals);
    let mut w = Windowing::new(WindowingOptions::per_item(10, move |_| {
        counter.fetch_add(1, Ordering::Relaxed);
        4.0
    }));

    w.update_options(|o| o.overscan = 1);
    w.update_options(|o| o.gap = 1);
    assert_eq!(evals.load(Ordering::Relaxed), 10);
    assert_eq!(w.total_extent(), 49);

    w.update_options(|o| o.count = 12);
    assert_eq!(evals.load(Ordering::Relaxed), 22);
    assert_eq!(w.total_extent(), 59);
}

#[test]
fn config_round_trips_through_options() {
    let config = WindowingConfig {
        overscan: 2,
        gap: 8,
        fallback: HeightFallback::Value(12),
        initial_offset: 40,
        initial_extent: Some(300),
        is_scrolling_reset_delay_ms: 90,
    };
    let opts = WindowingOptions::fixed(10, 72.0).with_config(config);
    assert_eq!(opts.config(), config);

    let w = Windowing::new(opts);
    assert_eq!(w.viewport(), Viewport {
        offset: 40,
        extent: 300,
    });
    assert_eq!(WindowingConfig::default().overscan, DEFAULT_OVERSCAN);
}

#[test]
fn collect_layouts_reuses_buffer() {
    let w = Windowing::new(
        WindowingOptions::fixed(10, 10.0)
            .with_overscan(0)
            .with_initial_extent(Some(25)),
    );
    let mut out = alloc::vec![ItemLayout {
        index: 99,
        top: 0,
        height: 0,
    }];
    w.collect_layouts(&mut out);
    assert_eq!(
        out,
        [
            ItemLayout { index: 0, top: 0, height: 10 },
            ItemLayout { index: 1, top: 10, height: 10 },
            ItemLayout { index: 2, top: 20, height: 10 },
        ]
    );
}

#[test]
fn randomized_window_contains_every_intersecting_item() {
    let mut rng = Lcg::new(0x5eed_1234);
    for _ in 0..300 {
        let n = rng.gen_range_usize(0, 60);
        let heights: Vec<u32> = (0..n).map(|_| rng.gen_range_u32(0, 50)).collect();
        let gap = rng.gen_range_u32(0, 5);
        let table = OffsetTable::build(&heights, gap);

        let expected = expected_offsets(&heights, gap);
        assert_eq!(table.as_slice(), expected.as_slice());
        assert_eq!(table.offset(0), Some(0));
        assert!(table.as_slice().windows(2).all(|p| p[0] <= p[1]));
        let sum: u64 = heights.iter().map(|&h| h as u64).sum();
        let gaps = (n.saturating_sub(1) as u64) * gap as u64;
        assert_eq!(table.total(), sum + gaps);

        let view = rng.gen_range_u32(1, 300);
        let max = max_scroll_offset(&table, view);
        let scroll = rng.gen_range_u64(0, max + 1);
        let overscan = rng.gen_range_usize(0, 6);

        let visible = resolve_visible(&table, scroll, view);
        let window = resolve_window(&table, scroll, view, overscan);
        assert!(window.end <= n);
        assert!(window.start <= visible.start || visible.is_empty());
        assert!(window.end >= visible.end);
        if n == 0 {
            assert!(window.is_empty());
            continue;
        }
        assert!(!visible.is_empty());

        let view_end = scroll + view as u64;
        for (k, &h) in heights.iter().enumerate() {
            let top = expected[k];
            if top < view_end && top + h as u64 > scroll {
                assert!(
                    visible.contains(k),
                    "item {k} intersects [{scroll}, {view_end}) but window is {visible:?}"
                );
            }
        }
    }
}
