// Example: a fixed-height list and a scroll-to helper.
use windowing::{Align, Viewport, Windowing, WindowingOptions};

fn main() {
    let mut w = Windowing::new(WindowingOptions::fixed(10_000, 40.0));
    w.set_viewport(Viewport {
        offset: 123_456,
        extent: 300,
    });

    println!("total_extent={}", w.total_extent());
    println!("visible={:?} window={:?}", w.visible_window(), w.window());
    for layout in w.layouts() {
        println!("  #{} top={} height={}", layout.index, layout.top, layout.height);
    }

    let off = w.scroll_to_index_offset(9_999, Align::End);
    w.set_scroll_offset_clamped(off);
    println!("after scroll_to_index: offset={}", w.scroll_offset());
}
