// Example: loading older messages above the viewport without a visual jump.
use windowing_bridge::{ItemHeight, ManagedSurface, VirtualList};

fn main() {
    let messages: Vec<String> = (100..200).map(|i| format!("message #{i}")).collect();
    let mut list = VirtualList::new(
        messages.clone(),
        ItemHeight::per_item(|m: &String, _| 20.0 + (m.len() % 4) as f64 * 6.0),
        |m: &String, _| m.clone(),
        ManagedSurface::with_extent(120),
    );
    list.on_frame(0);
    list.on_scroll(800, 1);
    let before = list.on_frame(16).and_then(|r| r.items.first().map(|it| it.node.clone()));

    // Prepend 100 older messages: every old index shifts by 100.
    let mut older: Vec<String> = (0..100).map(|i| format!("message #{i}")).collect();
    older.extend(messages);
    let anchored = list.set_items_anchored(older, |i| Some(i + 100));

    let after = list.on_frame(32).and_then(|r| r.items.first().map(|it| it.node.clone()));
    println!("anchored={anchored} before={before:?} after={after:?}");
    println!("scroll_offset={}", list.engine().scroll_offset());
}
