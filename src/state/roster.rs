use std::collections::hash_map::{HashMap, Values};

use crate::casemap::irc_to_lower;
use crate::channel::Channel;
use crate::error::ClientError;

/// The channels a connection has joined, keyed by casemapped name.
#[derive(Clone, Debug, Default)]
pub struct Roster {
    channels: HashMap<String, Channel>,
}

impl Roster {
    /// An empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a channel by name, with or without case differences.
    pub fn get(&self, name: &str) -> Option<&Channel> {
        self.channels.get(&irc_to_lower(name))
    }

    /// Mutable lookup.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Channel> {
        self.channels.get_mut(&irc_to_lower(name))
    }

    /// Returns `true` if the channel is joined.
    pub fn contains(&self, name: &str) -> bool {
        self.channels.contains_key(&irc_to_lower(name))
    }

    /// Add a channel. Adding one that is already present is a caller error.
    pub fn insert(&mut self, channel: Channel) -> Result<(), ClientError> {
        let key = irc_to_lower(channel.name());
        if self.channels.contains_key(&key) {
            return Err(ClientError::AlreadyInChannel(channel.name().to_owned()));
        }
        self.channels.insert(key, channel);
        Ok(())
    }

    /// Remove and return a channel.
    pub fn remove(&mut self, name: &str) -> Option<Channel> {
        self.channels.remove(&irc_to_lower(name))
    }

    /// All joined channels, in no particular order.
    pub fn iter(&self) -> Values<'_, String, Channel> {
        self.channels.values()
    }

    /// Number of joined channels.
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// Returns `true` if no channel is joined.
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

impl<'a> IntoIterator for &'a Roster {
    type Item = &'a Channel;
    type IntoIter = Values<'a, String, Channel>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
