use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpStream;
use std::thread;
use std::time::{Duration, Instant};

use gesture_fsm::{GestureEvent, Mode};
use gesture_wire::{decode_line, spawn_hub, EventServer, Subscribers};

fn wait_for(subs: &Subscribers, n: usize) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while subs.len() != n {
        assert!(Instant::now() < deadline, "expected {n} subscribers, have {}", subs.len());
        thread::sleep(Duration::from_millis(5));
    }
}

fn read_events(reader: &mut BufReader<TcpStream>, n: usize) -> Vec<GestureEvent> {
    (0..n)
        .map(|_| {
            let mut line = String::new();
            reader.read_line(&mut line).expect("read line");
            decode_line(&line).expect("decode")
        })
        .collect()
}

fn connect(addr: std::net::SocketAddr) -> BufReader<TcpStream> {
    let stream = TcpStream::connect(addr).expect("connect");
    stream.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
    BufReader::new(stream)
}

#[test]
fn every_client_sees_every_event_in_order() {
    let (publisher, subs, _hub) = spawn_hub(64).unwrap();
    let server = EventServer::bind("127.0.0.1:0", subs.clone()).unwrap();
    let addr = server.local_addr().unwrap();
    server.spawn().unwrap();

    let mut a = connect(addr);
    let mut b = connect(addr);
    wait_for(&subs, 2);

    let events = vec![
        GestureEvent::ModeChange { mode: Mode::Size },
        GestureEvent::SelectionUpdate { selection: String::new() },
        GestureEvent::SizeChange { size: 7.0 },
        GestureEvent::Delete,
    ];
    for e in &events {
        assert!(publisher.publish(e.clone()));
    }

    assert_eq!(read_events(&mut a, events.len()), events);
    assert_eq!(read_events(&mut b, events.len()), events);
}

#[test]
fn inbound_bytes_are_ignored() {
    let (publisher, subs, _hub) = spawn_hub(16).unwrap();
    let server = EventServer::bind("127.0.0.1:0", subs.clone()).unwrap();
    let addr = server.local_addr().unwrap();
    server.spawn().unwrap();

    let mut client = connect(addr);
    wait_for(&subs, 1);
    client.get_mut().write_all(b"{\"hello\":\"server\"}\n").unwrap();

    publisher.publish(GestureEvent::Print { ch: 'H' });
    assert_eq!(read_events(&mut client, 1), vec![GestureEvent::Print { ch: 'H' }]);
    assert_eq!(subs.len(), 1);
}

#[test]
fn disconnect_unregisters_client() {
    let (_publisher, subs, _hub) = spawn_hub(16).unwrap();
    let server = EventServer::bind("127.0.0.1:0", subs.clone()).unwrap();
    let addr = server.local_addr().unwrap();
    server.spawn().unwrap();

    let client = connect(addr);
    wait_for(&subs, 1);
    drop(client);
    wait_for(&subs, 0);
}

#[test]
fn stalled_client_is_pruned_and_sees_eof() {
    let subs = Subscribers::new();
    let server = EventServer::bind("127.0.0.1:0", subs.clone()).unwrap();
    let addr = server.local_addr().unwrap();
    server.spawn().unwrap();

    // never reads until the server gives up on it
    let mut client = connect(addr);
    wait_for(&subs, 1);

    let big = GestureEvent::FontChange { font: "x".repeat(60_000) };
    let mut sent = 0;
    while !subs.is_empty() {
        assert!(sent < 2_000, "client still registered after {sent} broadcasts");
        subs.broadcast(&big);
        sent += 1;
    }

    let mut buf = vec![0u8; 64 * 1024];
    let mut total = 0usize;
    loop {
        match client.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => total += n,
            Err(e) => panic!("expected EOF after {total} bytes, got {e}"),
        }
    }
    assert!(total > 0);
}
