//! TCP listener: every accepted connection becomes a line-stream subscriber.
//!
//! Clients never send anything the server acts on. Each connection gets a
//! small reader thread that discards inbound bytes and notices EOF, so a
//! disconnect is logged even when no event is being written at the time.

use std::io::{self, Read};
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::hub::Subscribers;
use crate::WireError;

/// A write that stalls longer than this gets the client dropped.
const WRITE_TIMEOUT: Duration = Duration::from_millis(250);

pub struct EventServer {
    listener:    TcpListener,
    subscribers: Subscribers,
}

impl EventServer {
    pub fn bind<A: ToSocketAddrs>(addr: A, subscribers: Subscribers) -> Result<Self, WireError> {
        let listener = TcpListener::bind(addr)?;
        info!(addr = %listener.local_addr()?, "event server listening");
        Ok(EventServer { listener, subscribers })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, WireError> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept connections forever on a background thread.
    pub fn spawn(self) -> io::Result<JoinHandle<()>> {
        thread::Builder::new()
            .name("event-server".into())
            .spawn(move || self.accept_loop())
    }

    fn accept_loop(self) {
        for stream in self.listener.incoming() {
            match stream {
                Ok(stream) => {
                    if let Err(e) = register(stream, &self.subscribers) {
                        warn!("failed to register client: {}", e);
                    }
                }
                Err(e) => error!("accept error: {}", e),
            }
        }
    }
}

fn register(stream: TcpStream, subscribers: &Subscribers) -> io::Result<()> {
    let peer = stream.peer_addr().map(|a| a.to_string()).unwrap_or_else(|_| "?".into());
    stream.set_nodelay(true)?;
    stream.set_write_timeout(Some(WRITE_TIMEOUT))?;
    let reader = stream.try_clone()?;

    let client_id = subscribers.add_socket(peer.clone(), stream);
    info!(client_id, %peer, "client connected");

    let subs = subscribers.clone();
    let spawned = thread::Builder::new()
        .name(format!("client-{client_id}"))
        .spawn(move || watch_client(reader, client_id, &peer, &subs));
    if let Err(e) = spawned {
        // nothing would notice the disconnect; do not keep writing to it
        subscribers.remove(client_id);
        return Err(e);
    }
    Ok(())
}

/// Discard inbound bytes until the peer goes away, then unregister it.
fn watch_client(mut stream: TcpStream, client_id: u64, peer: &str, subscribers: &Subscribers) {
    let mut buf = [0u8; 512];
    loop {
        match stream.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => debug!(client_id, bytes = n, "ignoring inbound data"),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                debug!(client_id, "read error: {}", e);
                break;
            }
        }
    }
    if subscribers.remove(client_id) {
        info!(client_id, %peer, "client disconnected");
    }
    let _ = stream.shutdown(Shutdown::Both);
}
