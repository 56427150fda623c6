//! The tracking loop: capture → detect → gesture state machine → publish.
//!
//! The loop owns its capture device, detector and [`GestureTracker`] for
//! its whole life and runs until the capture yields nothing. Both devices
//! are dropped exactly once when it returns.

use std::io;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use gesture_fsm::GestureTracker;
use gesture_wire::Publisher;
use tracing::{debug, info, warn};

use crate::capture::CaptureDevice;
use crate::detector::HandDetector;

/// Counters reported when the loop stops.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TrackingStats {
    /// Frames read from the capture device.
    pub frames:    u64,
    /// Frames the detector could not process.
    pub skipped:   u64,
    /// Frames with at least one hand, as seen by the gesture tracker.
    pub with_hand: u64,
    /// Events handed to the publisher.
    pub published: u64,
    /// Events the publisher had to drop.
    pub dropped:   u64,
}

pub fn run_tracking<C, D>(
    mut capture: C,
    mut detector: D,
    mut tracker: GestureTracker,
    publisher: Publisher,
    pause: Duration,
) -> TrackingStats
where
    C: CaptureDevice,
    D: HandDetector<C::Frame>,
{
    let mut stats = TrackingStats::default();
    info!("hand tracking started");

    loop {
        let Some(frame) = capture.read() else {
            warn!(frames = stats.frames, "no more frames, stopping hand tracking");
            break;
        };
        stats.frames += 1;

        match detector.detect(&frame) {
            Ok(hands) => {
                for event in tracker.on_hands(&hands) {
                    debug!(?event, "gesture");
                    if publisher.publish(event) {
                        stats.published += 1;
                    } else {
                        stats.dropped += 1;
                    }
                }
            }
            Err(e) => {
                stats.skipped += 1;
                warn!(frame = stats.frames, "skipping frame: {}", e);
            }
        }

        if !pause.is_zero() {
            thread::sleep(pause);
        }
    }

    drop(detector);
    drop(capture);
    stats.with_hand = tracker.frames_processed();
    info!(
        frames = stats.frames,
        skipped = stats.skipped,
        with_hand = stats.with_hand,
        published = stats.published,
        dropped = stats.dropped,
        "hand tracking stopped"
    );
    stats
}

/// Run [`run_tracking`] on its own thread.
pub fn spawn_tracking<C, D>(
    capture: C,
    detector: D,
    tracker: GestureTracker,
    publisher: Publisher,
    pause: Duration,
) -> io::Result<JoinHandle<TrackingStats>>
where
    C: CaptureDevice + Send + 'static,
    D: HandDetector<C::Frame> + Send + 'static,
{
    thread::Builder::new()
        .name("hand-tracking".into())
        .spawn(move || run_tracking(capture, detector, tracker, publisher, pause))
}
