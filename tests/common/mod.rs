//! A scripted server on the far end of an in-memory pipe.

#![allow(dead_code)]

use std::io;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::Duration;

use slirc_client::{Client, ClientConfig, Event, Transport};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, ReadHalf, WriteHalf};
use tokio::io::{AsyncRead, AsyncWrite, DuplexStream, ReadBuf};
use tokio::sync::broadcast;
use tracing_subscriber::EnvFilter;

const WAIT: Duration = Duration::from_secs(5);

pub struct Peer {
    lines: Lines<BufReader<ReadHalf<DuplexStream>>>,
    write: WriteHalf<DuplexStream>,
}

impl Peer {
    /// Send a line to the client.
    pub async fn send(&mut self, line: &str) {
        self.write.write_all(line.as_bytes()).await.unwrap();
        self.write.write_all(b"\r\n").await.unwrap();
    }

    /// Send raw bytes, terminator included.
    pub async fn send_bytes(&mut self, bytes: &[u8]) {
        self.write.write_all(bytes).await.unwrap();
    }

    /// The next line the client wrote.
    pub async fn recv(&mut self) -> String {
        tokio::time::timeout(WAIT, self.lines.next_line())
            .await
            .expect("timed out waiting for a line")
            .unwrap()
            .expect("client closed the stream")
    }

    /// Read lines until one satisfies `pred`.
    pub async fn recv_until(&mut self, pred: impl Fn(&str) -> bool) -> String {
        loop {
            let line = self.recv().await;
            if pred(&line) {
                return line;
            }
        }
    }

    /// Returns `None` once the client has closed its side.
    pub async fn recv_eof(&mut self) -> Option<String> {
        tokio::time::timeout(WAIT, self.lines.next_line())
            .await
            .expect("timed out waiting for end of stream")
            .unwrap()
    }
}

/// Log to the test output, filtered by `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Arms a read error on a [`FaultyStream`].
#[derive(Clone, Default)]
pub struct Fault(Arc<Mutex<Option<io::ErrorKind>>>);

impl Fault {
    /// Fail the next read with `kind`. The read only happens once the
    /// peer sends something.
    pub fn arm(&self, kind: io::ErrorKind) {
        *self.0.lock().unwrap() = Some(kind);
    }
}

/// A duplex stream whose reads can be made to fail.
pub struct FaultyStream {
    inner: DuplexStream,
    fault: Fault,
}

impl AsyncRead for FaultyStream {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        if let Some(kind) = self.fault.0.lock().unwrap().take() {
            return Poll::Ready(Err(io::Error::new(kind, "injected")));
        }
        Pin::new(&mut self.inner).poll_read(cx, buf)
    }
}

impl AsyncWrite for FaultyStream {
    fn poll_write(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        Pin::new(&mut self.inner).poll_write(cx, buf)
    }

    fn poll_flush(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.inner).poll_flush(cx)
    }

    fn poll_shutdown(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.inner).poll_shutdown(cx)
    }
}

fn peer(theirs: DuplexStream) -> Peer {
    let (read, write) = tokio::io::split(theirs);
    Peer {
        lines: BufReader::new(read).lines(),
        write,
    }
}

/// A connected client, the server end, and an event stream subscribed
/// before registration.
pub async fn connect(config: ClientConfig) -> (Client, Peer, broadcast::Receiver<Event>) {
    init_tracing();
    let client = Client::new(config).unwrap();
    let events = client.subscribe();
    let (ours, theirs) = tokio::io::duplex(64 * 1024);
    client.connect_with(Transport::from_stream(ours)).await.unwrap();
    (client, peer(theirs), events)
}

/// Like [`connect`], with a handle for failing the client's reads.
pub async fn connect_faulty(
    config: ClientConfig,
) -> (Client, Peer, broadcast::Receiver<Event>, Fault) {
    init_tracing();
    let client = Client::new(config).unwrap();
    let events = client.subscribe();
    let (ours, theirs) = tokio::io::duplex(64 * 1024);
    let fault = Fault::default();
    let stream = FaultyStream {
        inner: ours,
        fault: fault.clone(),
    };
    client.connect_with(Transport::from_stream(stream)).await.unwrap();
    (client, peer(theirs), events, fault)
}

/// The next event matching `pred`, skipping the rest.
pub async fn next_event<F>(events: &mut broadcast::Receiver<Event>, pred: F) -> Event
where
    F: Fn(&Event) -> bool,
{
    tokio::time::timeout(WAIT, async {
        loop {
            let event = events.recv().await.unwrap();
            if pred(&event) {
                return event;
            }
        }
    })
    .await
    .expect("timed out waiting for an event")
}

/// Every event up to and including the first matching `pred`.
pub async fn events_until<F>(events: &mut broadcast::Receiver<Event>, pred: F) -> Vec<Event>
where
    F: Fn(&Event) -> bool,
{
    tokio::time::timeout(WAIT, async {
        let mut seen = Vec::new();
        loop {
            let event = events.recv().await.unwrap();
            let done = pred(&event);
            seen.push(event);
            if done {
                return seen;
            }
        }
    })
    .await
    .expect("timed out waiting for an event")
}

/// Returns `true` for the `RawSent` event of `line`.
pub fn sent(event: &Event, line: &str) -> bool {
    matches!(event, Event::RawSent(raw) if raw.line == line)
}
