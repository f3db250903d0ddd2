//! Outbound pacing.
//!
//! [`AntiFlood`] sits in front of an [`Outbound`] and decides, per line,
//! whether it can be written now or has to wait in a FIFO queue. The
//! queue is emptied by a single drain task that sleeps for whatever the
//! [`FloodPolicy`] asks before each write. Cancelling the controller's
//! token throws the queue away and stops the drain task, even mid-sleep.
//!
//! ```no_run
//! # async fn demo(outbound: slirc_client::flood::Outbound) -> slirc_client::error::Result<()> {
//! use std::time::Duration;
//! use slirc_client::flood::{AntiFlood, FixedDelay};
//!
//! let flood = AntiFlood::new(Box::new(FixedDelay::new(Duration::from_millis(500))));
//! flood.submit(&outbound, "PRIVMSG #rust :one".to_owned()).await?;
//! flood.submit(&outbound, "PRIVMSG #rust :two".to_owned()).await?;
//! # Ok(())
//! # }
//! ```

mod outbound;
mod policy;

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

pub use self::outbound::Outbound;
pub use self::policy::{FixedDelay, FloodPolicy, RateLimit};
use crate::error::Result;
use crate::event::Event;

struct FloodState {
    policy: Box<dyn FloodPolicy>,
    queue: VecDeque<String>,
    draining: bool,
}

/// The flow controller of one connection.
///
/// Cloning shares the queue and the policy.
#[derive(Clone)]
pub struct AntiFlood {
    state: Arc<Mutex<FloodState>>,
    cancel: CancellationToken,
}

impl AntiFlood {
    /// A controller pacing lines with `policy`.
    pub fn new(policy: Box<dyn FloodPolicy>) -> Self {
        AntiFlood {
            state: Arc::new(Mutex::new(FloodState {
                policy,
                queue: VecDeque::new(),
                draining: false,
            })),
            cancel: CancellationToken::new(),
        }
    }

    /// Tie the controller to `cancel`, typically a child of the
    /// connection's token.
    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Drop queued lines and stop the drain task.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Send `line` now if the policy allows it and nothing is queued,
    /// otherwise queue it behind earlier lines.
    ///
    /// Errors are only returned for the immediate path; failures of the
    /// drain task are published as [`Event::Error`].
    pub async fn submit(&self, outbound: &Outbound, line: String) -> Result<()> {
        let mut state = self.state.lock().await;

        if !state.draining && state.policy.remaining_delay(Instant::now()).is_zero() {
            outbound.write(&line).await?;
            state.policy.record_send(Instant::now());
            return Ok(());
        }

        state.queue.push_back(line);
        trace!(queued = state.queue.len(), "line queued");
        if !state.draining {
            state.draining = true;
            tokio::spawn(drain(
                Arc::clone(&self.state),
                outbound.clone(),
                self.cancel.clone(),
            ));
        }
        Ok(())
    }

    /// Number of lines waiting to be sent.
    pub async fn queued(&self) -> usize {
        self.state.lock().await.queue.len()
    }

    /// Returns `true` while a drain task is running.
    pub async fn is_draining(&self) -> bool {
        self.state.lock().await.draining
    }
}

impl fmt::Debug for AntiFlood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AntiFlood").finish_non_exhaustive()
    }
}

async fn drain(state: Arc<Mutex<FloodState>>, outbound: Outbound, cancel: CancellationToken) {
    loop {
        let delay = {
            let mut guard = state.lock().await;
            if guard.queue.is_empty() || cancel.is_cancelled() {
                abandon(&mut guard);
                return;
            }
            guard.policy.remaining_delay(Instant::now())
        };

        if !delay.is_zero() {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {}
                _ = tokio::time::sleep(delay) => {}
            }
        }

        let mut guard = state.lock().await;
        if cancel.is_cancelled() {
            abandon(&mut guard);
            return;
        }
        let Some(line) = guard.queue.pop_front() else {
            guard.draining = false;
            return;
        };

        match outbound.write(&line).await {
            Ok(()) => guard.policy.record_send(Instant::now()),
            Err(e) => {
                debug!(dropped = guard.queue.len(), "flood queue dropped after write failure");
                guard.queue.clear();
                guard.draining = false;
                drop(guard);
                outbound.publish(Event::error(e));
                return;
            }
        }
    }
}

fn abandon(state: &mut FloodState) {
    if !state.queue.is_empty() {
        trace!(dropped = state.queue.len(), "flood queue abandoned");
        state.queue.clear();
    }
    state.draining = false;
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::io::AsyncBufReadExt;
    use tokio::sync::broadcast;

    use super::*;
    use crate::transport::Transport;

    fn pipe() -> (Outbound, tokio::io::Lines<tokio::io::BufReader<tokio::io::DuplexStream>>) {
        let (ours, theirs) = tokio::io::duplex(4096);
        let (_reader, writer) = Transport::from_stream(ours).into_split();
        let (events, _) = broadcast::channel(16);
        let outbound = Outbound::new(writer, events);
        (outbound, tokio::io::BufReader::new(theirs).lines())
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_line_is_immediate() {
        let (outbound, mut peer) = pipe();
        let flood = AntiFlood::new(Box::new(FixedDelay::new(Duration::from_secs(1))));

        flood.submit(&outbound, "PING :a".to_owned()).await.unwrap();
        assert!(!flood.is_draining().await);
        assert_eq!(flood.queued().await, 0);
        assert_eq!(peer.next_line().await.unwrap().unwrap(), "PING :a");
    }

    #[tokio::test(start_paused = true)]
    async fn test_queue_drains_in_order() {
        let (outbound, mut peer) = pipe();
        let flood = AntiFlood::new(Box::new(FixedDelay::new(Duration::from_millis(100))));

        for i in 0..3 {
            flood.submit(&outbound, format!("PRIVMSG #c :{}", i)).await.unwrap();
        }
        assert!(flood.is_draining().await);
        assert_eq!(flood.queued().await, 2);

        for i in 0..3 {
            assert_eq!(peer.next_line().await.unwrap().unwrap(), format!("PRIVMSG #c :{}", i));
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!flood.is_draining().await);
        assert_eq!(flood.queued().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_write_failure_clears_queue() {
        let (ours, theirs) = tokio::io::duplex(4096);
        let (_reader, writer) = Transport::from_stream(ours).into_split();
        let (events, mut rx) = broadcast::channel(16);
        let outbound = Outbound::new(writer, events);
        let flood = AntiFlood::new(Box::new(FixedDelay::new(Duration::from_millis(100))));

        flood.submit(&outbound, "A".to_owned()).await.unwrap();
        flood.submit(&outbound, "B".to_owned()).await.unwrap();
        flood.submit(&outbound, "C".to_owned()).await.unwrap();
        drop(theirs);

        loop {
            match rx.recv().await.unwrap() {
                Event::Error(_) => break,
                Event::RawSent(_) => continue,
                other => panic!("unexpected event {:?}", other),
            }
        }
        assert_eq!(flood.queued().await, 0);
        assert!(!flood.is_draining().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_drain_silently() {
        let (ours, _theirs) = tokio::io::duplex(4096);
        let (_reader, writer) = Transport::from_stream(ours).into_split();
        let (events, mut rx) = broadcast::channel(16);
        let outbound = Outbound::new(writer, events);
        let token = CancellationToken::new();
        let flood = AntiFlood::new(Box::new(FixedDelay::new(Duration::from_secs(5))))
            .with_cancellation(token.child_token());

        for line in ["A", "B", "C"] {
            flood.submit(&outbound, line.to_owned()).await.unwrap();
        }
        assert!(matches!(rx.recv().await.unwrap(), Event::RawSent(_)));

        token.cancel();
        tokio::time::sleep(Duration::from_secs(60)).await;

        assert_eq!(flood.queued().await, 0);
        assert!(!flood.is_draining().await);
        assert!(rx.try_recv().is_err());
    }
}
