//! Event hand-off and fan-out.
//!
//! The tracking thread holds a [`Publisher`]; the hub thread drains the
//! bounded [`EventQueue`] and writes every event to every registered
//! subscriber, in publish order.

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::net::{Shutdown, TcpStream};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, SyncSender, TrySendError};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};

use gesture_fsm::GestureEvent;
use tracing::{debug, info, warn};

use crate::encode_line;

// ════════════════════════════════════════════════════════════════════════════
// Queue
// ════════════════════════════════════════════════════════════════════════════

/// Producer side of the event queue. Never blocks.
#[derive(Clone)]
pub struct Publisher {
    tx:      SyncSender<GestureEvent>,
    dropped: Arc<AtomicU64>,
}

/// Consumer side of the event queue, drained by [`run_hub`].
pub struct EventQueue {
    rx: Receiver<GestureEvent>,
}

/// A bounded queue holding at most `capacity` undelivered events.
pub fn event_queue(capacity: usize) -> (Publisher, EventQueue) {
    let (tx, rx) = mpsc::sync_channel(capacity.max(1));
    let publisher = Publisher { tx, dropped: Arc::new(AtomicU64::new(0)) };
    (publisher, EventQueue { rx })
}

impl Publisher {
    /// Queue an event for broadcast. Returns `false` if it was dropped
    /// because the queue is full or the hub has stopped.
    pub fn publish(&self, event: GestureEvent) -> bool {
        match self.tx.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(event)) => {
                let n = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
                warn!(kind = event.kind(), dropped = n, "event queue full, dropping event");
                false
            }
            Err(TrySendError::Disconnected(event)) => {
                debug!(kind = event.kind(), "hub stopped, dropping event");
                false
            }
        }
    }

    /// Events lost to a full queue so far.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl EventQueue {
    /// Blocking receive; `None` once every publisher is gone.
    pub fn recv(&self) -> Option<GestureEvent> {
        self.rx.recv().ok()
    }

    pub fn try_recv(&self) -> Option<GestureEvent> {
        self.rx.try_recv().ok()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Subscribers
// ════════════════════════════════════════════════════════════════════════════

enum Sink {
    /// A byte stream that receives encoded lines (a TCP socket in practice).
    Stream { peer: String, writer: Box<dyn Write + Send> },
    /// A connected TCP client. Shut down in both directions when pruned, so
    /// the peer sees EOF and its watcher thread exits.
    Socket { peer: String, stream: TcpStream },
    /// An in-process receiver of decoded events.
    Local(Sender<GestureEvent>),
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    sinks:   BTreeMap<u64, Sink>,
}

/// Shared set of current subscribers. Cheap to clone.
#[derive(Clone, Default)]
pub struct Subscribers {
    inner: Arc<Mutex<Registry>>,
}

impl Subscribers {
    pub fn new() -> Self { Subscribers::default() }

    fn lock(&self) -> MutexGuard<'_, Registry> {
        // a panic while holding the lock leaves the map itself consistent
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn insert(&self, sink: Sink) -> u64 {
        let mut reg = self.lock();
        reg.next_id += 1;
        let id = reg.next_id;
        reg.sinks.insert(id, sink);
        id
    }

    /// Register a byte stream; returns its subscriber id.
    pub fn add_stream(&self, peer: impl Into<String>, writer: Box<dyn Write + Send>) -> u64 {
        self.insert(Sink::Stream { peer: peer.into(), writer })
    }

    /// Register a TCP client; returns its subscriber id.
    pub fn add_socket(&self, peer: impl Into<String>, stream: TcpStream) -> u64 {
        self.insert(Sink::Socket { peer: peer.into(), stream })
    }

    /// Register an in-process subscriber.
    pub fn add_local(&self) -> Receiver<GestureEvent> {
        let (tx, rx) = mpsc::channel();
        self.insert(Sink::Local(tx));
        rx
    }

    /// Returns `true` if `id` was still registered.
    pub fn remove(&self, id: u64) -> bool {
        self.lock().sinks.remove(&id).is_some()
    }

    pub fn len(&self) -> usize { self.lock().sinks.len() }
    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Deliver one event to everyone, pruning subscribers that fail.
    /// Returns the number of successful deliveries.
    pub fn broadcast(&self, event: &GestureEvent) -> usize {
        let line = match encode_line(event) {
            Ok(line) => line,
            Err(e) => {
                warn!(kind = event.kind(), "failed to encode event: {}", e);
                return 0;
            }
        };

        let mut reg = self.lock();
        let mut failed = Vec::new();
        for (&id, sink) in reg.sinks.iter_mut() {
            let ok = match sink {
                Sink::Stream { peer, writer } => write_line(id, peer, writer, &line),
                Sink::Socket { peer, stream } => write_line(id, peer, stream, &line),
                Sink::Local(tx) => tx.send(event.clone()).is_ok(),
            };
            if !ok {
                failed.push(id);
            }
        }
        for id in &failed {
            if let Some(Sink::Socket { stream, .. }) = reg.sinks.remove(id) {
                // a timed-out write may have left half a line on the wire
                let _ = stream.shutdown(Shutdown::Both);
            }
        }
        reg.sinks.len()
    }
}

fn write_line<W: Write + ?Sized>(id: u64, peer: &str, writer: &mut W, line: &str) -> bool {
    match writer.write_all(line.as_bytes()).and_then(|_| writer.flush()) {
        Ok(()) => true,
        Err(e) => {
            info!(client_id = id, %peer, "dropping client after write error: {}", e);
            false
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Hub thread
// ════════════════════════════════════════════════════════════════════════════

/// Drain `queue` into `subscribers` until every publisher is dropped.
pub fn run_hub(queue: EventQueue, subscribers: Subscribers) {
    let mut sent = 0u64;
    while let Some(event) = queue.recv() {
        let delivered = subscribers.broadcast(&event);
        debug!(kind = event.kind(), delivered, "broadcast");
        sent += 1;
    }
    info!(events = sent, "event hub stopped");
}

/// Create a queue and start the hub thread draining it.
pub fn spawn_hub(capacity: usize) -> io::Result<(Publisher, Subscribers, JoinHandle<()>)> {
    let (publisher, queue) = event_queue(capacity);
    let subscribers = Subscribers::new();
    let hub_subs = subscribers.clone();
    let handle = thread::Builder::new()
        .name("event-hub".into())
        .spawn(move || run_hub(queue, hub_subs))?;
    Ok((publisher, subscribers, handle))
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use gesture_fsm::Mode;

    /// Writer that appends into a shared buffer.
    #[derive(Clone, Default)]
    struct Shared(Arc<Mutex<Vec<u8>>>);

    impl Write for Shared {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> { Ok(()) }
    }

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "gone"))
        }
        fn flush(&mut self) -> io::Result<()> { Ok(()) }
    }

    #[test]
    fn full_queue_drops_without_blocking() {
        let (publisher, queue) = event_queue(2);
        assert!(publisher.publish(GestureEvent::Delete));
        assert!(publisher.publish(GestureEvent::Delete));
        assert!(!publisher.publish(GestureEvent::Print { ch: 'A' }));
        assert_eq!(publisher.dropped(), 1);
        assert_eq!(queue.try_recv(), Some(GestureEvent::Delete));
        assert!(publisher.publish(GestureEvent::Print { ch: 'B' }));
    }

    #[test]
    fn publish_after_hub_gone_is_dropped() {
        let (publisher, queue) = event_queue(4);
        drop(queue);
        assert!(!publisher.publish(GestureEvent::Delete));
        assert_eq!(publisher.dropped(), 0);
    }

    #[test]
    fn broadcast_reaches_streams_and_locals_in_order() {
        let subs = Subscribers::new();
        let buf = Shared::default();
        subs.add_stream("test", Box::new(buf.clone()));
        let rx = subs.add_local();

        let events = [
            GestureEvent::ModeChange { mode: Mode::Size },
            GestureEvent::SelectionUpdate { selection: String::new() },
        ];
        for e in &events {
            assert_eq!(subs.broadcast(e), 2);
        }

        let text = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        let lines: Vec<_> = text.lines().map(|l| crate::decode_line(l).unwrap()).collect();
        assert_eq!(lines, events);
        assert_eq!(rx.try_iter().collect::<Vec<_>>(), events);
    }

    #[test]
    fn failing_subscribers_are_pruned() {
        let subs = Subscribers::new();
        subs.add_stream("broken", Box::new(Broken));
        let rx = subs.add_local();
        drop(rx);
        let keep = subs.add_local();
        assert_eq!(subs.len(), 3);

        assert_eq!(subs.broadcast(&GestureEvent::Delete), 1);
        assert_eq!(subs.len(), 1);
        assert_eq!(keep.try_recv().unwrap(), GestureEvent::Delete);
    }

    #[test]
    fn remove_reports_membership() {
        let subs = Subscribers::new();
        let id = subs.add_stream("x", Box::new(Shared::default()));
        assert!(subs.remove(id));
        assert!(!subs.remove(id));
        assert!(subs.is_empty());
    }

    #[test]
    fn hub_thread_drains_until_publishers_drop() {
        let (publisher, subs, handle) = spawn_hub(8).unwrap();
        let rx = subs.add_local();
        publisher.publish(GestureEvent::Print { ch: 'Z' });
        publisher.publish(GestureEvent::Delete);
        drop(publisher);
        handle.join().unwrap();
        assert_eq!(
            rx.try_iter().collect::<Vec<_>>(),
            vec![GestureEvent::Print { ch: 'Z' }, GestureEvent::Delete]
        );
    }
}
