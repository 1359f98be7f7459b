// Example: a host loop forwarding native scroll events and rendering once per frame.
use windowing::WindowingConfig;
use windowing_bridge::{ItemHeight, ManagedSurface, VirtualList};

struct User {
    name: String,
    email: String,
}

fn main() {
    let users: Vec<User> = (0..5_000)
        .map(|i| User {
            name: format!("User {}", i + 1),
            email: format!("user{}@example.com", i + 1),
        })
        .collect();

    let config = WindowingConfig {
        gap: 4,
        ..WindowingConfig::default()
    };
    let mut list = VirtualList::with_config(
        users,
        ItemHeight::Fixed(60.0),
        |user: &User, i| format!("[{i}] {} <{}>", user.name, user.email),
        ManagedSurface::with_extent(300),
        config,
    )
    .with_scroll_listener(|offset| println!("scrolled to {offset}"));

    // A burst of wheel events between two frames resolves only once.
    let mut now_ms = 0u64;
    for frame in 0..4u64 {
        for step in 0..5u64 {
            list.on_scroll(frame * 1_000 + step * 37, now_ms + step);
        }
        now_ms += 16;
        if let Some(rendered) = list.on_frame(now_ms) {
            println!(
                "frame {frame}: spacer={} rows={} first={:?}",
                rendered.total_extent,
                rendered.items.len(),
                rendered.items.first().map(|it| &it.node)
            );
        }
    }

    println!("resolves={}", list.bridge().resolve_count());
}
