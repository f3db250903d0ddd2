//! Outbound commands.

use tracing::debug;

use super::Client;
use crate::casemap::irc_to_lower;
use crate::channel::MessageTarget;
use crate::error::{ClientError, Result};

impl Client {
    /// Send one protocol line, paced by the flood controller if one is
    /// configured.
    ///
    /// CR, LF and anything after them are cut off.
    pub async fn send_raw(&self, line: impl Into<String>) -> Result<()> {
        let link = self.link().ok_or(ClientError::NotConnected)?;
        let line = line.into();
        match &link.flood {
            Some(flood) => flood.submit(&link.outbound, line).await,
            None => link.outbound.write(&line).await,
        }
    }

    /// Ask the server for a new nickname.
    pub async fn send_nick(&self, nickname: &str) -> Result<()> {
        self.send_raw(format!("NICK {}", nickname)).await
    }

    /// Send a PRIVMSG to a channel or user.
    pub async fn send_message<T>(&self, target: &T, text: &str) -> Result<()>
    where
        T: MessageTarget + ?Sized,
    {
        self.send_raw(format!("PRIVMSG {} :{}", target.target_name(), text))
            .await
    }

    /// Send a NOTICE to a channel or user.
    pub async fn send_notice<T>(&self, target: &T, text: &str) -> Result<()>
    where
        T: MessageTarget + ?Sized,
    {
        self.send_raw(format!("NOTICE {} :{}", target.target_name(), text))
            .await
    }

    /// Join a channel, named with or without `#`.
    ///
    /// The channel enters the roster when the server confirms the join.
    pub async fn join_channel(&self, name: &str) -> Result<()> {
        let name = irc_to_lower(name.strip_prefix('#').unwrap_or(name));
        let joined = self.inner.session.lock().roster().contains(&name);
        if joined {
            return Err(ClientError::AlreadyInChannel(name).into());
        }
        debug!(channel = %name, "joining");
        self.send_raw(format!("JOIN #{}", name)).await
    }

    /// Leave a channel, named with or without `#`.
    pub async fn part_channel(&self, name: &str) -> Result<()> {
        let name = name.strip_prefix('#').unwrap_or(name);
        self.send_raw(format!("PART #{}", name)).await
    }
}
