//! Replay a short synthetic gesture session and print the wire lines a
//! connected client would receive.
//!
//!     cargo run -p gesture_keys --example demo

use std::io::Cursor;
use std::time::Duration;

use gesture_fsm::GestureTracker;
use gesture_keys::capture::ReplayCapture;
use gesture_keys::detector::ReplayDetector;
use gesture_keys::tracking::run_tracking;
use gesture_wire::{encode_line, spawn_hub};
use hand_landmarks::classify::Finger;
use hand_landmarks::pose::HandPose;
use serde_json::json;

fn detection(pose: HandPose) -> String {
    json!({
        "hands": [{ "handedness": "Right", "score": 0.95, "landmarks": pose.frame().points().to_vec() }],
        "error": null,
    })
    .to_string()
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let m = HandPose::at_control_angle(90.0);
    let session = [
        m,
        m.pinch(Finger::Index, 0.03),           // print M
        m,
        m.back_of_hand(),                       // delete
        m,
        HandPose::default().thumbs_up(),        // space
        m.pinch(Finger::Ring, 0.03),            // fonts
        HandPose::at_control_angle(20.0),
        m.pinch(Finger::Pinky, 0.03),           // size
        HandPose::at_control_angle(160.0),
    ];
    let recording: String = session.into_iter().map(|p| detection(p) + "\n").collect();

    let (publisher, subs, hub) = spawn_hub(64)?;
    let events = subs.add_local();
    let stats = run_tracking(
        ReplayCapture::from_reader(Cursor::new(recording)),
        ReplayDetector::new(0.7),
        GestureTracker::default(),
        publisher,
        Duration::ZERO,
    );
    hub.join().map_err(|_| anyhow::anyhow!("event hub panicked"))?;

    for event in events.try_iter() {
        print!("{}", encode_line(&event)?);
    }
    println!("-- {} frames, {} events", stats.frames, stats.published);
    Ok(())
}
