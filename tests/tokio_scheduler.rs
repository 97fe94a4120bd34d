#![cfg(feature = "tokio")]

mod common;

use std::time::Duration;

use common::Recorder;
use serde_json::json;
use sublet::{descriptor, proxy, Proxy, State, Target, TokioScheduler, TrackOptions};
use tokio::task::LocalSet;

fn options(scheduler: &TokioScheduler) -> TrackOptions {
    TrackOptions::default().with_scheduler(scheduler.clone())
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn proxy_burst_is_delivered_once() {
    LocalSet::new()
        .run_until(async {
            let scheduler = TokioScheduler::new();
            let recorder = Recorder::new();
            let view = proxy::track_with_options(
                State::new(json!({ "width": 1200, "height": 1024 })),
                Some(Box::new(recorder.hook::<Proxy<State>>())),
                options(&scheduler),
            )
            .unwrap();

            view.set("width", 1024);
            view.set("scrollHeight", 1600);
            assert_eq!(scheduler.pending(), 1);

            tokio::time::sleep(Duration::from_millis(10)).await;

            assert_eq!(recorder.calls(), 2);
            assert_eq!(
                recorder.last(),
                json!({ "width": 1024, "height": 1024, "scrollHeight": 1600 })
            );
            assert_eq!(scheduler.pending(), 0);
        })
        .await;
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn descriptor_respects_a_custom_window() {
    LocalSet::new()
        .run_until(async {
            let scheduler = TokioScheduler::new();
            let recorder = Recorder::new();
            let state = State::new(json!({ "zoom": 1 }));
            descriptor::track_with_options(
                &state,
                Some(Box::new(recorder.hook::<State>())),
                options(&scheduler).with_window(Duration::from_millis(50)),
            )
            .unwrap();

            state.set("zoom", 2);
            tokio::time::sleep(Duration::from_millis(40)).await;
            state.set("zoom", 3);
            tokio::time::sleep(Duration::from_millis(40)).await;
            assert_eq!(recorder.calls(), 1, "window restarted by the second write");

            tokio::time::sleep(Duration::from_millis(20)).await;
            assert_eq!(recorder.calls(), 2);
            assert_eq!(recorder.last(), json!({ "zoom": 3 }));
        })
        .await;
}
