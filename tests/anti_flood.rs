//! Outbound pacing under paused time.
//!
//! Run with: `cargo test --test anti_flood`

use std::time::Duration;

use slirc_client::{AntiFlood, Event, FixedDelay, Outbound, RateLimit, Transport};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;
use tokio::time::Instant;

struct Harness {
    outbound: Outbound,
    events: broadcast::Receiver<Event>,
    // Keeps the far end open.
    _peer: tokio::io::DuplexStream,
}

fn harness() -> Harness {
    let (ours, theirs) = tokio::io::duplex(64 * 1024);
    let (_reader, writer) = Transport::from_stream(ours).into_split();
    let (tx, events) = broadcast::channel(64);
    Harness {
        outbound: Outbound::new(writer, tx),
        events,
        _peer: theirs,
    }
}

/// Offsets from `start` at which each `RawSent` was observed.
async fn sent_at(events: &mut broadcast::Receiver<Event>, start: Instant, n: usize) -> Vec<(String, Duration)> {
    let mut seen = Vec::new();
    while seen.len() < n {
        if let Event::RawSent(raw) = events.recv().await.unwrap() {
            seen.push((raw.line, start.elapsed()));
        }
    }
    seen
}

fn assert_near(actual: Duration, expected: Duration) {
    let slack = Duration::from_millis(5);
    assert!(
        actual >= expected && actual <= expected + slack,
        "expected ~{:?}, got {:?}",
        expected,
        actual
    );
}

#[tokio::test(start_paused = true)]
async fn test_fixed_delay_paces_in_order() {
    let mut h = harness();
    let flood = AntiFlood::new(Box::new(FixedDelay::new(Duration::from_millis(500))));
    let start = Instant::now();

    for text in ["one", "two", "three"] {
        flood
            .submit(&h.outbound, format!("PRIVMSG #chan :{}", text))
            .await
            .unwrap();
    }

    let seen = sent_at(&mut h.events, start, 3).await;
    assert_eq!(seen[0].0, "PRIVMSG #chan :one");
    assert_eq!(seen[1].0, "PRIVMSG #chan :two");
    assert_eq!(seen[2].0, "PRIVMSG #chan :three");
    assert_near(seen[0].1, Duration::ZERO);
    assert_near(seen[1].1, Duration::from_millis(500));
    assert_near(seen[2].1, Duration::from_millis(1000));
}

#[tokio::test(start_paused = true)]
async fn test_rate_limit_window() {
    let mut h = harness();
    let flood = AntiFlood::new(Box::new(RateLimit::new(2, Duration::from_secs(30))));
    let start = Instant::now();

    for i in 0..3 {
        flood.submit(&h.outbound, format!("PRIVMSG #c :{}", i)).await.unwrap();
    }
    let seen = sent_at(&mut h.events, start, 3).await;
    assert_near(seen[0].1, Duration::ZERO);
    assert_near(seen[1].1, Duration::ZERO);
    assert_near(seen[2].1, Duration::from_secs(30));

    // The third line opened a new window; wait it out entirely.
    tokio::time::sleep(Duration::from_secs(31)).await;
    let later = Instant::now();
    flood.submit(&h.outbound, "PRIVMSG #c :late".to_owned()).await.unwrap();
    assert!(!flood.is_draining().await);
    let seen = sent_at(&mut h.events, later, 1).await;
    assert_near(seen[0].1, Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_unpaced_lines_reach_peer() {
    let (ours, theirs) = tokio::io::duplex(4096);
    let (_reader, writer) = Transport::from_stream(ours).into_split();
    let (tx, _rx) = broadcast::channel(8);
    let outbound = Outbound::new(writer, tx);

    outbound.write("PING :a").await.unwrap();
    outbound.write("PING :b").await.unwrap();

    let mut lines = BufReader::new(theirs).lines();
    assert_eq!(lines.next_line().await.unwrap().unwrap(), "PING :a");
    assert_eq!(lines.next_line().await.unwrap().unwrap(), "PING :b");
}
