//! Todo list demo driven by real timers on a tokio LocalSet.
//!
//! Run with: cargo run --example todos

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use serde_json::{json, Value};
use sublet::{cloned, proxy, Proxy, State, Target, TokioScheduler, TrackOptions};
use tokio::task::LocalSet;
use tokio::time::sleep;
use tracing_subscriber::EnvFilter;

type View = Proxy<State>;

fn todos(view: &View) -> Vec<Value> {
    match view.get("todos") {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    }
}

fn render(view: &View, renders: &Cell<u32>) {
    let hide_done = view.get("hideDone").and_then(|v| v.as_bool()).unwrap_or(false);
    let all = todos(view);
    let shown: Vec<&Value> = all
        .iter()
        .filter(|todo| !(hide_done && todo["done"].as_bool().unwrap_or(false)))
        .collect();

    println!("~> showing {} of {}", shown.len(), all.len());
    for todo in shown {
        let mark = if todo["done"].as_bool().unwrap_or(false) { "[x]" } else { "[ ]" };
        println!("{mark} {}", todo["text"].as_str().unwrap_or_default());
    }

    renders.set(renders.get() + 1);
    println!("~> render #{}", renders.get());
}

fn add(view: &View, text: &str) {
    let mut items = todos(view);
    items.push(json!({ "text": text, "done": false }));
    view.set("todos", items);
}

fn toggle(view: &View, index: usize) {
    let items: Vec<Value> = todos(view)
        .into_iter()
        .enumerate()
        .map(|(i, mut todo)| {
            if i == index {
                let done = todo["done"].as_bool().unwrap_or(false);
                todo["done"] = json!(!done);
            }
            todo
        })
        .collect();
    view.set("todos", items);
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    LocalSet::new()
        .run_until(async {
            let renders = Rc::new(Cell::new(0));
            let view = proxy::track_with_options(
                State::new(json!({ "hideDone": false, "todos": [] })),
                Some(Box::new(cloned!(renders => move |view: &View| render(view, &renders)))),
                TrackOptions::default().with_scheduler(TokioScheduler::new()),
            )?;

            sleep(Duration::from_millis(100)).await;
            println!("\n# Adding 3 items");
            add(&view, "eat");
            add(&view, "sleep");
            add(&view, "code");

            sleep(Duration::from_millis(100)).await;
            println!("\n# Toggle \"sleep\" task");
            toggle(&view, 1);

            sleep(Duration::from_millis(100)).await;
            println!("\n# Hide Completed");
            view.set("hideDone", true);

            sleep(Duration::from_millis(100)).await;
            println!("\n# Add 1 item");
            add(&view, "repeat!");

            sleep(Duration::from_millis(100)).await;
            Ok::<(), Box<dyn std::error::Error>>(())
        })
        .await
}
