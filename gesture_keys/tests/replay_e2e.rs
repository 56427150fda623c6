use std::io::Write;
use std::time::Duration;

use gesture_fsm::{GestureEvent, GestureTracker, Mode};
use gesture_keys::app::{run, Source};
use gesture_keys::capture::ReplayCapture;
use gesture_keys::config::AppConfig;
use gesture_keys::detector::ReplayDetector;
use gesture_keys::tracking::run_tracking;
use gesture_wire::spawn_hub;
use hand_landmarks::classify::Finger;
use hand_landmarks::pose::HandPose;
use serde_json::json;
use tempfile::NamedTempFile;

fn detection(score: f32, pose: HandPose) -> String {
    json!({
        "hands": [{
            "handedness": "Right",
            "score": score,
            "landmarks": pose.frame().points().to_vec(),
        }],
        "error": null,
    })
    .to_string()
}

/// Letters at 90° ('M'), an index tap, then a pinky pinch into size mode,
/// with noise the pipeline must ignore.
fn recording() -> NamedTempFile {
    let lines = [
        detection(0.95, HandPose::default()),
        String::new(),
        r#"{"hands":[]}"#.to_string(),
        detection(0.95, HandPose::default().pinch(Finger::Index, 0.10)),
        detection(0.95, HandPose::default().pinch(Finger::Index, 0.03)),
        detection(0.95, HandPose::default().pinch(Finger::Index, 0.03)),
        "this is not json".to_string(),
        detection(0.30, HandPose::default().pinch(Finger::Ring, 0.01)),
        detection(0.95, HandPose::default().pinch(Finger::Pinky, 0.05)),
    ];
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{line}").unwrap();
    }
    file.flush().unwrap();
    file
}

#[test]
fn replay_drives_events_to_subscribers() {
    let file = recording();
    let (publisher, subs, hub) = spawn_hub(64).unwrap();
    let rx = subs.add_local();

    let stats = run_tracking(
        ReplayCapture::open(file.path()).unwrap(),
        ReplayDetector::new(0.7),
        GestureTracker::default(),
        publisher,
        Duration::ZERO,
    );
    hub.join().unwrap();

    assert_eq!(stats.frames, 8);
    assert_eq!(stats.skipped, 1);
    // the empty and low-confidence frames reach the tracker without a hand
    assert_eq!(stats.with_hand, 5);
    assert_eq!(stats.dropped, 0);

    let events: Vec<_> = rx.try_iter().collect();
    assert_eq!(events.len(), 5, "{events:?}");
    assert_eq!(events[0], GestureEvent::SelectionUpdate { selection: "M".into() });
    assert_eq!(events[1], GestureEvent::Print { ch: 'M' });
    assert_eq!(events[2], GestureEvent::ModeChange { mode: Mode::Size });
    assert_eq!(events[3], GestureEvent::SelectionUpdate { selection: String::new() });
    match events[4] {
        GestureEvent::SizeChange { size } => assert!((size - 7.0).abs() < 1e-3, "{size}"),
        ref other => panic!("expected SIZE_CHANGE, got {other:?}"),
    }
}

#[test]
fn app_runs_a_replay_to_completion() {
    let file = recording();
    let cfg = AppConfig {
        listen: "127.0.0.1:0".to_string(),
        frame_pause_ms: 0,
        ..AppConfig::default()
    };
    run(cfg, Source::Replay(file.path().to_path_buf())).unwrap();
}

#[test]
fn missing_replay_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = AppConfig { listen: "127.0.0.1:0".to_string(), ..AppConfig::default() };
    assert!(run(cfg, Source::Replay(dir.path().join("missing.jsonl"))).is_err());
}
