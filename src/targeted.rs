//! Resolution of PRIVMSG/NOTICE lines into source, target and text.

use tracing::warn;

use crate::channel::Channel;
use crate::config::Dialect;
use crate::error::MessageError;
use crate::hostmask::HostMask;
use crate::message::{Message, Tags};
use crate::state::Session;
use crate::twitch::TwitchUserInfo;
use crate::user::{Server, Source, User};

/// Kind of a targeted message, from its command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageType {
    /// `PRIVMSG`.
    Privmsg,
    /// `NOTICE`.
    Notice,
    /// Any other command carrying a target and text.
    Unknown,
}

impl MessageType {
    fn of(command: &str) -> MessageType {
        if command.eq_ignore_ascii_case("PRIVMSG") {
            MessageType::Privmsg
        } else if command.eq_ignore_ascii_case("NOTICE") {
            MessageType::Notice
        } else {
            MessageType::Unknown
        }
    }
}

/// The resolved recipient of a targeted message.
#[derive(Clone, Copy, Debug)]
pub enum Target<'a> {
    /// A joined channel.
    Channel(&'a Channel),
    /// The local user.
    User(&'a User),
}

/// A PRIVMSG or NOTICE bound to the session it arrived on.
///
/// Borrows from both the session and the message; it lives for one
/// handler invocation.
#[derive(Debug)]
pub struct TargetedMessage<'a> {
    kind: MessageType,
    source: Source,
    target: Option<Target<'a>>,
    is_channel_message: bool,
    text: &'a str,
    tags: Option<&'a Tags>,
}

/// Build the source of a message from its prefix.
///
/// Under the Twitch dialect, user sources of tagged lines carry the
/// tag-decoded details.
pub(crate) fn resolve_source(dialect: Dialect, msg: &Message, prefix: &str) -> Source {
    match HostMask::parse(prefix) {
        Some(mask) => {
            let user = User::from_hostmask(mask);
            match (dialect, msg.tags()) {
                (Dialect::Twitch, Some(_)) => {
                    Source::User(user.with_twitch(TwitchUserInfo::from_message(msg)))
                }
                _ => Source::User(user),
            }
        }
        None => Source::Server(Server {
            host: prefix.to_owned(),
        }),
    }
}

impl<'a> TargetedMessage<'a> {
    /// Resolve `msg` against `session`.
    ///
    /// Fails if the message has no prefix or fewer than two parameters. A
    /// channel target that is not in the roster is logged and left
    /// unresolved.
    pub fn resolve(session: &'a Session, msg: &'a Message) -> Result<Self, MessageError> {
        let prefix = msg
            .prefix()
            .ok_or_else(|| MessageError::invalid_source(msg.command(), None))?;
        let (target, text) = match msg.params() {
            [target, text, ..] => (target.as_str(), text.as_str()),
            params => return Err(MessageError::not_enough(msg.command(), 2, params.len())),
        };

        let source = resolve_source(session.dialect(), msg, prefix);

        let (target, is_channel_message) = match target.strip_prefix('#') {
            Some(name) => {
                let channel = session.roster().get(name);
                if channel.is_none() {
                    warn!(channel = name, command = msg.command(), "target channel is not joined");
                }
                (channel.map(Target::Channel), true)
            }
            None => (Some(Target::User(session.user())), false),
        };

        Ok(TargetedMessage {
            kind: MessageType::of(msg.command()),
            source,
            target,
            is_channel_message,
            text,
            tags: msg.tags(),
        })
    }

    /// Privmsg, notice or other.
    pub fn kind(&self) -> MessageType {
        self.kind
    }

    /// The sender.
    pub fn source(&self) -> &Source {
        &self.source
    }

    /// Take ownership of the sender.
    pub fn into_source(self) -> Source {
        self.source
    }

    /// The recipient, `None` when a channel target is not joined.
    pub fn target(&self) -> Option<Target<'a>> {
        self.target
    }

    /// The resolved channel, for channel messages to a joined channel.
    pub fn channel(&self) -> Option<&'a Channel> {
        match self.target {
            Some(Target::Channel(channel)) => Some(channel),
            _ => None,
        }
    }

    /// `true` if the target parameter named a channel.
    pub fn is_channel_message(&self) -> bool {
        self.is_channel_message
    }

    /// The message text.
    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Tags of the line, if any.
    pub fn tags(&self) -> Option<&'a Tags> {
        self.tags
    }

    /// Tags of the line, cloned; empty if it had none.
    pub(crate) fn owned_tags(&self) -> Tags {
        self.tags.cloned().unwrap_or_default()
    }
}
