//! Viewport demo: re-derive a few numbers whenever the window state changes.
//!
//! Run with: RUST_LOG=sublet=trace cargo run --example basic

use std::time::Duration;

use serde_json::json;
use sublet::{advance, State, Target};
use tracing_subscriber::EnvFilter;

fn number(view: &impl Target, key: &str) -> Option<f64> {
    view.get(key).and_then(|v| v.as_f64())
}

fn render(state: &impl Target) {
    let width = number(state, "width").unwrap_or_default();
    let height = number(state, "height").unwrap_or_default();
    let scroll_height = number(state, "scrollHeight").unwrap_or(height);
    let zoom = number(state, "zoom").unwrap_or(1.0);

    println!("visible pixels: {}", width * height);
    println!("percent visible: {}%", (height / scroll_height * 100.0).round());
    println!("scale factor: {zoom}x");
    println!("scaled pixels: {}", width * height * zoom);
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let window = State::new(json!({ "width": 1200, "height": 1024 }));

    #[cfg(not(feature = "legacy"))]
    let viewport = sublet::track(window.clone(), |view| render(view))?;
    #[cfg(feature = "legacy")]
    let viewport = sublet::track(&window, |view| render(view))?;

    advance(Duration::from_secs(1));
    println!("\n~> changing width & scrollHeight");
    viewport.set("width", 1024);
    viewport.set("scrollHeight", 1600);

    advance(Duration::from_secs(1));
    println!("\n~> changing height & zoom");
    viewport.set("height", 800);
    viewport.set("zoom", 1.25);

    advance(Duration::from_secs(1));
    Ok(())
}
