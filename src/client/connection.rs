//! Connect, disconnect and teardown.

use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::{receive, Client, Link};
use crate::error::{ClientError, IrcError};
use crate::event::Event;
use crate::flood::{AntiFlood, Outbound};
use crate::state::{ConnectionState, Session};
use crate::transport::Transport;

impl Client {
    /// Open a TCP connection to the configured server and register.
    ///
    /// Returns once registration has been sent. Calling this while a
    /// connection is live fails with [`ClientError::AlreadyConnected`] or
    /// [`ClientError::AlreadyConnecting`]. A failure while opening or
    /// registering is published as [`Event::Error`], leaves the client
    /// offline and is returned as [`ClientError::NotConnected`].
    pub async fn connect(&self) -> Result<(), ClientError> {
        self.begin_connect()?;

        let (host, port) = (&self.inner.config.host, self.inner.config.port);
        debug!(host = %host, port, "connecting");
        match Transport::connect(host, port).await {
            Ok(transport) => self.establish(transport).await,
            Err(e) => {
                self.set_state(ConnectionState::Offline);
                self.publish(Event::error(e));
                Err(ClientError::NotConnected)
            }
        }
    }

    /// Like [`connect`](Self::connect), over a stream the caller opened.
    pub async fn connect_with(&self, transport: Transport) -> Result<(), ClientError> {
        self.begin_connect()?;
        self.establish(transport).await
    }

    /// Send `QUIT` and close the connection.
    ///
    /// Publishes [`Event::Disconnected`] with `closed_by_server: false`.
    pub async fn disconnect(&self) -> Result<(), ClientError> {
        {
            let mut state = self.inner.state.lock();
            match *state {
                ConnectionState::Connected => *state = ConnectionState::Disconnecting,
                ConnectionState::Disconnecting => return Err(ClientError::AlreadyDisconnecting),
                ConnectionState::Offline | ConnectionState::Connecting => {
                    return Err(ClientError::NotConnected)
                }
            }
        }

        if let Some(link) = self.link() {
            if let Err(e) = link.outbound.write("QUIT").await {
                debug!(error = %e, "failed to send QUIT");
            }
        }
        self.teardown(false).await;
        Ok(())
    }

    /// Release the connection without saying goodbye.
    ///
    /// A connected client is torn down as by [`disconnect`](Self::disconnect)
    /// minus the `QUIT`; an offline client is left alone.
    pub async fn dispose(&self) {
        if self.state() == ConnectionState::Connected {
            self.teardown(false).await;
        } else {
            self.release().await;
        }
    }

    fn begin_connect(&self) -> Result<(), ClientError> {
        let mut state = self.inner.state.lock();
        match *state {
            ConnectionState::Connected => Err(ClientError::AlreadyConnected),
            ConnectionState::Connecting => Err(ClientError::AlreadyConnecting),
            ConnectionState::Disconnecting => Err(ClientError::AlreadyDisconnecting),
            ConnectionState::Offline => {
                *state = ConnectionState::Connecting;
                Ok(())
            }
        }
    }

    async fn establish(&self, transport: Transport) -> Result<(), ClientError> {
        let config = &self.inner.config;
        *self.inner.session.lock() =
            Session::new(config.registration.nickname.clone(), config.dialect);

        let (reader, writer) = transport.into_split();
        let cancel = CancellationToken::new();
        *self.inner.link.lock() = Some(Link {
            outbound: Outbound::new(writer, self.inner.events.clone()),
            flood: config
                .flood
                .as_ref()
                .map(|f| AntiFlood::new(f.build()).with_cancellation(cancel.child_token())),
            cancel: cancel.clone(),
        });

        tokio::spawn(receive::run(self.clone(), reader, cancel));

        if let Err(e) = self.register().await {
            self.publish(Event::error(e));
            self.release().await;
            return Err(ClientError::NotConnected);
        }

        let connected = {
            let mut state = self.inner.state.lock();
            let live = *state == ConnectionState::Connecting;
            if live {
                *state = ConnectionState::Connected;
            }
            live
        };
        if !connected {
            return Err(ClientError::NotConnected);
        }

        debug!(host = %config.host, "connected");
        self.publish(Event::Connected);
        Ok(())
    }

    async fn register(&self) -> Result<(), IrcError> {
        let reg = &self.inner.config.registration;
        if let Some(password) = &reg.password {
            self.send_raw(format!("PASS {}", password)).await?;
        }
        self.send_raw(format!("NICK {}", reg.nickname)).await?;
        let user = &reg.username;
        self.send_raw(format!("USER {} {} {} {}", user, user, user, user))
            .await?;
        for capability in &self.inner.config.capabilities {
            self.send_raw(format!("CAP REQ {}", capability)).await?;
        }
        Ok(())
    }

    /// Tear down and report the disconnect, once.
    pub(super) async fn teardown(&self, closed_by_server: bool) {
        if self.release().await {
            debug!(closed_by_server, "disconnected");
            self.publish(Event::Disconnected { closed_by_server });
        }
    }

    /// Stop the receive loop and the flood drain, close the transport and
    /// go offline.
    ///
    /// Returns `false` if there was nothing to release.
    pub(super) async fn release(&self) -> bool {
        let link = self.inner.link.lock().take();
        self.set_state(ConnectionState::Offline);
        match link {
            Some(link) => {
                link.cancel.cancel();
                link.outbound.close().await;
                true
            }
            None => false,
        }
    }
}
