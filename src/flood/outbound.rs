//! The write half of a connection.

use std::sync::Arc;

use tokio::sync::{broadcast, Mutex};
use tracing::trace;

use crate::event::{Event, RawLine};
use crate::error::{ClientError, IrcError};
use crate::transport::LineWriter;

/// The shared write path of a connection.
///
/// Writes one line at a time and publishes [`Event::RawSent`] for each.
/// Cloning shares the underlying writer.
#[derive(Clone)]
pub struct Outbound {
    writer: Arc<Mutex<Option<LineWriter>>>,
    events: broadcast::Sender<Event>,
}

impl Outbound {
    /// A write path over `writer`, publishing to `events`.
    pub fn new(writer: LineWriter, events: broadcast::Sender<Event>) -> Self {
        Outbound {
            writer: Arc::new(Mutex::new(Some(writer))),
            events,
        }
    }

    /// Write a line now.
    pub async fn write(&self, line: &str) -> Result<(), IrcError> {
        let mut guard = self.writer.lock().await;
        let writer = guard.as_mut().ok_or(ClientError::NotConnected)?;
        writer.write_line(line).await?;
        drop(guard);

        trace!(line, "sent");
        self.publish(Event::RawSent(RawLine::now(line)));
        Ok(())
    }

    /// Publish an event; having no subscribers is fine.
    pub fn publish(&self, event: Event) {
        let _ = self.events.send(event);
    }

    /// Detach and close the writer. Later writes fail with `NotConnected`.
    pub(crate) async fn close(&self) {
        let writer = self.writer.lock().await.take();
        if let Some(mut writer) = writer {
            if let Err(e) = writer.close().await {
                trace!(error = %e, "error while closing the transport");
            }
        }
    }
}

impl std::fmt::Debug for Outbound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Outbound").finish_non_exhaustive()
    }
}
