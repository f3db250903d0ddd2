//! The receive loop.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use super::Client;
use crate::error::Result;
use crate::event::{Event, RawLine};
use crate::message::Message;
use crate::registry::Context;
use crate::state::ConnectionState;
use crate::transport::LineReader;

/// Read and dispatch lines until the stream ends, `cancel` fires or the
/// client goes offline.
///
/// A line the codec has to drop is reported as [`Event::Error`] and
/// reading goes on.
pub(super) async fn run(client: Client, mut reader: LineReader, cancel: CancellationToken) {
    while client.state().is_live() {
        let read = tokio::select! {
            biased;
            _ = cancel.cancelled() => return,
            read = reader.read_line() => read,
        };
        if cancel.is_cancelled() {
            return;
        }

        match read {
            Ok(Some(line)) => client.handle_line(line).await,
            Ok(None) => {
                debug!("end of stream");
                client.teardown(client.state() != ConnectionState::Disconnecting).await;
                return;
            }
            Err(e) if e.is_line_fault() => {
                debug!(error = %e, "dropped malformed line");
                client.publish(Event::error(e));
            }
            Err(e) if e.is_connection_reset() => {
                debug!(error = %e, "connection reset");
                client.teardown(client.state() != ConnectionState::Disconnecting).await;
                return;
            }
            Err(e) => {
                client.publish(Event::error(e));
                client.release().await;
                return;
            }
        }
    }
}

impl Client {
    async fn handle_line(&self, line: String) {
        trace!(line = %line, "received");
        self.publish(Event::RawReceived(RawLine::now(line.as_str())));

        let msg = Message::parse(&line);
        let (result, outbound, events) = self.dispatch(&msg);

        for event in events {
            self.publish(event);
        }
        if let Err(e) = result {
            self.publish(Event::Error(Arc::new(e)));
        }
        for line in outbound {
            if let Err(e) = self.send_raw(line).await {
                self.publish(Event::Error(Arc::new(e)));
            }
        }
    }

    /// Run the handler for `msg` against the session.
    fn dispatch(&self, msg: &Message) -> (Result<()>, Vec<String>, Vec<Event>) {
        let registry = self.inner.registry.read();
        let mut session = self.inner.session.lock();
        let mut ctx = Context::new(&mut session);
        let result = match registry.dispatch(&mut ctx, msg) {
            Ok(true) => Ok(()),
            Ok(false) => {
                trace!(command = msg.command(), "no handler");
                Ok(())
            }
            Err(e) => Err(e),
        };
        let (outbound, events) = ctx.into_parts();
        (result, outbound, events)
    }
}
