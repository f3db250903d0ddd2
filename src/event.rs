//! Notifications published by a client.
//!
//! Every event owns snapshots of the channels and users it mentions, so a
//! subscriber can hold on to it after the roster has moved on.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::channel::Channel;
use crate::error::IrcError;
use crate::message::Tags;
use crate::twitch::SubscriptionPlan;
use crate::user::{Source, SourceType, User};

/// A line as it crossed the wire.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawLine {
    /// The line without terminator.
    pub line: String,
    /// When it was sent or received.
    pub at: DateTime<Utc>,
}

impl RawLine {
    /// Timestamp a line now.
    pub fn now(line: impl Into<String>) -> Self {
        RawLine {
            line: line.into(),
            at: Utc::now(),
        }
    }
}

/// A PRIVMSG or NOTICE addressed to a joined channel.
#[derive(Clone, Debug, PartialEq)]
pub struct ChannelMessage {
    /// The channel it was sent to.
    pub channel: Channel,
    /// Who sent it.
    pub source: Source,
    /// Message text.
    pub text: String,
    /// Tags of the line; empty if it carried none.
    pub tags: Tags,
}

/// A PRIVMSG or NOTICE addressed to the local user.
#[derive(Clone, Debug, PartialEq)]
pub struct PrivateMessage {
    /// The local user, as known when the message arrived.
    pub recipient: User,
    /// Who sent it.
    pub source: Source,
    /// Message text.
    pub text: String,
    /// Tags of the line; empty if it carried none.
    pub tags: Tags,
}

impl ChannelMessage {
    /// Whether a user or a server sent the message.
    pub fn source_type(&self) -> SourceType {
        self.source.source_type()
    }
}

impl PrivateMessage {
    /// Whether a user or a server sent the message.
    pub fn source_type(&self) -> SourceType {
        self.source.source_type()
    }
}

/// A Twitch subscription or gifted subscription.
#[derive(Clone, Debug, PartialEq)]
pub struct Subscription {
    /// The subscriber, or the gifter for gifts; `None` for anonymous gifts.
    pub user: Option<User>,
    /// The channel subscribed to.
    pub channel: Channel,
    /// Subscription tier.
    pub plan: SubscriptionPlan,
    /// Message attached by the subscriber.
    pub text: Option<String>,
    /// Cumulative months.
    pub months: u32,
    /// Consecutive months, when the subscriber chose to share them.
    pub streak: Option<u32>,
    /// The subscription was gifted.
    pub is_gift: bool,
    /// The gift was anonymous.
    pub is_anonymous: bool,
    /// Gift recipient.
    pub recipient: Option<User>,
}

/// A Twitch cheer: a chat message carrying bits.
#[derive(Clone, Debug, PartialEq)]
pub struct Cheer {
    /// The cheering user.
    pub user: User,
    /// The channel cheered in.
    pub channel: Channel,
    /// The chat message.
    pub text: String,
    /// Number of bits.
    pub bits: u32,
}

/// Everything a client reports to its subscribers.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub enum Event {
    /// A line was written to the transport.
    RawSent(RawLine),
    /// A line was read from the transport, before parsing.
    RawReceived(RawLine),
    /// Registration was sent.
    Connected,
    /// The connection is gone.
    Disconnected {
        /// `true` when the server closed or reset the stream.
        closed_by_server: bool,
    },
    /// A runtime failure that did not end the connection by itself.
    Error(Arc<IrcError>),
    /// A user, possibly the local one, joined a channel.
    ChannelJoined {
        /// The channel.
        channel: Channel,
        /// Who joined.
        user: User,
    },
    /// The local user left a channel.
    ChannelLeft {
        /// The channel, as it was before removal.
        channel: Channel,
    },
    /// Another user left a channel.
    UserLeft {
        /// The channel.
        channel: Channel,
        /// Who left.
        user: User,
    },
    /// A PRIVMSG to a channel.
    ChannelMessage(ChannelMessage),
    /// A NOTICE to a channel.
    ChannelNotice(ChannelMessage),
    /// A PRIVMSG to the local user.
    UserMessage(PrivateMessage),
    /// A NOTICE to the local user.
    UserNotice(PrivateMessage),
    /// Channel operator status was granted or revoked.
    OperatorStatusChanged {
        /// The channel.
        channel: Channel,
        /// The affected user.
        user: User,
        /// `true` for `+o`.
        granted: bool,
    },
    /// A user was permanently banned from a Twitch channel.
    UserBanned {
        /// The channel.
        channel: Channel,
        /// The banned user.
        user: User,
    },
    /// A user was timed out in a Twitch channel.
    UserTimedOut {
        /// The channel.
        channel: Channel,
        /// The silenced user.
        user: User,
        /// Length of the timeout.
        duration: Duration,
    },
    /// A Twitch subscription notice.
    UserSubscribed(Subscription),
    /// A Twitch cheer.
    UserCheered(Cheer),
    /// A Twitch channel started hosting another channel.
    HostModeStarted {
        /// The hosting channel.
        channel: Channel,
        /// The hosted channel name.
        target: String,
        /// Viewers carried over.
        viewers: u32,
    },
    /// A Twitch channel stopped hosting.
    HostModeStopped {
        /// The channel.
        channel: Channel,
        /// Viewers reported with the stop notice.
        viewers: u32,
    },
}

impl Event {
    pub(crate) fn error(err: impl Into<IrcError>) -> Self {
        Event::Error(Arc::new(err.into()))
    }
}
