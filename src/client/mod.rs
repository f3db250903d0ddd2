//! The connection state machine.
//!
//! A [`Client`] owns one connection at a time. [`Client::connect`] opens a
//! transport, starts the receive loop as its own task and registers;
//! everything the server sends afterwards is parsed, dispatched through
//! the [`Registry`] and reported as [`Event`]s to every subscriber.
//!
//! ```no_run
//! use slirc_client::{Client, ClientConfig, Event, RegistrationInfo};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::new("irc.libera.chat", 6667, RegistrationInfo::new("slirc"));
//! let client = Client::new(config)?;
//! let mut events = client.subscribe();
//!
//! client.connect().await?;
//! client.join_channel("rust").await?;
//!
//! while let Ok(event) = events.recv().await {
//!     if let Event::ChannelMessage(msg) = event {
//!         println!("#{} <{}> {}", msg.channel.name(), msg.source.name(), msg.text);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

mod connection;
mod receive;
mod send;

use std::fmt;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::channel::Channel;
use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::event::Event;
use crate::flood::{AntiFlood, Outbound};
use crate::message::Message;
use crate::registry::{Context, Registry};
use crate::state::{ConnectionState, Session};
use crate::user::User;

/// Events buffered per subscriber before it starts lagging.
pub const EVENT_CAPACITY: usize = 256;

/// Handle to an IRC connection.
///
/// Cheap to clone; all clones drive the same connection.
#[derive(Clone)]
pub struct Client {
    inner: Arc<Inner>,
}

struct Inner {
    config: ClientConfig,
    state: Mutex<ConnectionState>,
    session: Mutex<Session>,
    registry: RwLock<Registry>,
    events: broadcast::Sender<Event>,
    link: Mutex<Option<Link>>,
}

/// Per-connection resources, dropped on teardown.
#[derive(Clone)]
struct Link {
    outbound: Outbound,
    flood: Option<AntiFlood>,
    cancel: CancellationToken,
}

impl Client {
    /// Build a client. Nothing is opened until [`connect`](Self::connect).
    pub fn new(config: ClientConfig) -> std::result::Result<Client, ClientError> {
        let registry = Registry::for_dialect(config.dialect)?;
        let session = Session::new(config.registration.nickname.clone(), config.dialect);
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Ok(Client {
            inner: Arc::new(Inner {
                config,
                state: Mutex::new(ConnectionState::Offline),
                session: Mutex::new(session),
                registry: RwLock::new(registry),
                events,
                link: Mutex::new(None),
            }),
        })
    }

    /// Receive every event published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.inner.events.subscribe()
    }

    /// The current lifecycle state.
    pub fn state(&self) -> ConnectionState {
        *self.inner.state.lock()
    }

    /// A snapshot of the local user.
    pub fn user(&self) -> User {
        self.inner.session.lock().user().clone()
    }

    /// Snapshots of all joined channels.
    pub fn channels(&self) -> Vec<Channel> {
        self.inner.session.lock().roster().iter().cloned().collect()
    }

    /// A snapshot of one joined channel, looked up case-insensitively.
    pub fn channel(&self, name: &str) -> Option<Channel> {
        let name = name.strip_prefix('#').unwrap_or(name);
        self.inner.session.lock().roster().get(name).cloned()
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Handle a command no built-in handler serves.
    ///
    /// Handlers run on the receive loop with the session locked, so they
    /// must use their [`Context`] instead of calling back into the client.
    ///
    /// ```
    /// use slirc_client::{Client, ClientConfig, RegistrationInfo};
    ///
    /// let client = Client::new(ClientConfig::new("localhost", 6667, RegistrationInfo::new("bot")))?;
    /// client.register_handler("001", |ctx, _msg| {
    ///     ctx.send("JOIN #welcome");
    ///     Ok(())
    /// })?;
    /// assert!(client.register_handler("PING", |_, _| Ok(())).is_err());
    /// # Ok::<(), slirc_client::error::ClientError>(())
    /// ```
    pub fn register_handler<F>(&self, command: &str, handler: F) -> std::result::Result<(), ClientError>
    where
        F: Fn(&mut Context<'_>, &Message) -> Result<()> + Send + Sync + 'static,
    {
        self.inner.registry.write().register(command, handler)
    }

    fn publish(&self, event: Event) {
        let _ = self.inner.events.send(event);
    }

    fn set_state(&self, state: ConnectionState) {
        *self.inner.state.lock() = state;
    }

    fn link(&self) -> Option<Link> {
        self.inner.link.lock().clone()
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("host", &self.inner.config.host)
            .field("port", &self.inner.config.port)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
