//! Top-level wiring: event hub, TCP server, tracking thread and, in
//! simulator mode, the window loop on the main thread.

use std::path::PathBuf;
use std::sync::mpsc;
use std::thread::JoinHandle;

use anyhow::{anyhow, Context, Result};
use gesture_fsm::GestureTracker;
use gesture_wire::{spawn_hub, EventServer, Publisher, Subscribers};
use tracing::{error, info};

use crate::capture::ReplayCapture;
use crate::config::AppConfig;
use crate::detector::ReplayDetector;
use crate::preview::TextPreview;
use crate::sim::{SimCapture, SimDetector};
use crate::tracking::{spawn_tracking, TrackingStats};
use crate::visualizer::Visualizer;

/// Where hand landmarks come from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Source {
    /// Keyboard + mouse simulator window.
    Sim,
    /// Recorded detector output, one JSON line per frame.
    Replay(PathBuf),
    /// Live webcam through the MediaPipe helper (`camera` feature).
    Camera,
}

/// Run until the source is exhausted (replay), the window closes (sim), or
/// forever (camera, where the server outlives a failed or finished capture).
pub fn run(cfg: AppConfig, source: Source) -> Result<()> {
    let (publisher, subscribers, hub) = spawn_hub(cfg.event_queue).context("starting event hub")?;
    let server = EventServer::bind(cfg.listen.as_str(), subscribers.clone())
        .with_context(|| format!("binding event server to {}", cfg.listen))?;
    let server = server.spawn().context("starting event server")?;

    match source {
        Source::Sim => run_sim(&cfg, publisher, &subscribers)?,
        Source::Replay(path) => {
            let capture = ReplayCapture::open(&path)?;
            let detector = ReplayDetector::new(cfg.min_detection_confidence);
            let tracking = spawn_tracking(capture, detector, tracker(&cfg), publisher, cfg.frame_pause())
                .context("starting tracking thread")?;
            join_tracking(tracking)?;
        }
        Source::Camera => {
            start_camera(&cfg, publisher);
            info!("serving until interrupted");
            return server.join().map_err(|_| anyhow!("event server thread panicked"));
        }
    }

    // every publisher is gone by now; let the hub flush what is queued
    hub.join().map_err(|_| anyhow!("event hub thread panicked"))?;
    Ok(())
}

fn tracker(cfg: &AppConfig) -> GestureTracker {
    GestureTracker::new(cfg.gesture_config())
}

fn join_tracking(handle: JoinHandle<TrackingStats>) -> Result<TrackingStats> {
    handle.join().map_err(|_| anyhow!("tracking thread panicked"))
}

// ════════════════════════════════════════════════════════════════════════════
// Simulator
// ════════════════════════════════════════════════════════════════════════════

fn run_sim(cfg: &AppConfig, publisher: Publisher, subscribers: &Subscribers) -> Result<()> {
    let mut vis = Visualizer::new()?;
    let events = subscribers.add_local();
    let mut preview = TextPreview::default();

    let (pose_tx, pose_rx) = mpsc::channel();
    let tracking = spawn_tracking(
        SimCapture::new(pose_rx),
        SimDetector,
        tracker(cfg),
        publisher,
        cfg.frame_pause(),
    )
    .context("starting tracking thread")?;

    info!("simulator ready; close the window or press Esc to quit");
    while vis.is_open() {
        let Some(controls) = vis.poll_input() else { break };
        let pose = controls.pose();
        if pose_tx.send(pose).is_err() {
            break;
        }

        while let Ok(event) = events.try_recv() {
            preview.apply(&event);
        }

        let frame = pose.map(|p| p.frame());
        vis.render(frame.as_ref(), &preview);
    }

    drop(pose_tx);
    join_tracking(tracking)?;
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Camera
// ════════════════════════════════════════════════════════════════════════════

/// A camera or detector that fails to start is logged and leaves the server
/// running without events.
#[cfg(feature = "camera")]
fn start_camera(cfg: &AppConfig, publisher: Publisher) {
    use crate::capture::Camera;
    use crate::detector::MediapipeDetector;

    let camera = match Camera::open(cfg.camera_id) {
        Ok(camera) => camera,
        Err(e) => {
            error!("could not open video device, hand tracking will not start: {:#}", e);
            return;
        }
    };
    let detector = match MediapipeDetector::spawn(
        &cfg.detector_python,
        &cfg.detector_script,
        cfg.min_detection_confidence,
    ) {
        Ok(detector) => detector,
        Err(e) => {
            error!("could not start hand detector, hand tracking will not start: {:#}", e);
            return;
        }
    };
    if let Err(e) = spawn_tracking(camera, detector, tracker(cfg), publisher, cfg.frame_pause()) {
        error!("could not start tracking thread: {}", e);
    }
}

#[cfg(not(feature = "camera"))]
fn start_camera(_cfg: &AppConfig, _publisher: Publisher) {
    error!("built without camera support (rebuild with --features camera), hand tracking will not start");
}
