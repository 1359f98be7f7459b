// Example: per-item heights, gap, and the fallback policy for bad rows.
use windowing::{HeightFallback, Viewport, Windowing, WindowingOptions};

fn main() {
    let opts = WindowingOptions::per_item(1_000, |i| {
        if i == 3 {
            // A broken row: the engine substitutes the fallback instead of failing.
            f64::NAN
        } else {
            40.0 + (i % 3) as f64 * 10.0
        }
    })
    .with_gap(8)
    .with_overscan(2)
    .with_fallback(HeightFallback::LastValid);

    let mut w = Windowing::new(opts);
    w.set_viewport(Viewport {
        offset: 0,
        extent: 200,
    });

    println!(
        "total_extent={} fallbacks={} first offsets={:?}",
        w.total_extent(),
        w.fallback_count(),
        &w.offsets().as_slice()[..6]
    );

    let mut buf = Vec::new();
    w.collect_layouts(&mut buf);
    println!("window={:?} layouts={buf:?}", w.window());
}
