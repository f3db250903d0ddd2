//! Built-in handlers for plain IRC.

mod channel;
mod connection;
pub(crate) mod messaging;

use crate::error::MessageError;
use crate::hostmask::HostMask;
use crate::message::Message;
use crate::registry::HandlerEntry;

/// The base handler layer.
pub const BASE_HANDLERS: &[HandlerEntry] = &[
    HandlerEntry {
        commands: &["PRIVMSG", "NOTICE"],
        handler: messaging::handle_targeted,
    },
    HandlerEntry {
        commands: &["JOIN"],
        handler: channel::handle_join,
    },
    HandlerEntry {
        commands: &["PART"],
        handler: channel::handle_part,
    },
    HandlerEntry {
        commands: &["MODE"],
        handler: channel::handle_mode,
    },
    HandlerEntry {
        commands: &["PING"],
        handler: connection::handle_ping,
    },
    HandlerEntry {
        commands: &["433"],
        handler: connection::handle_nickname_in_use,
    },
    HandlerEntry {
        commands: &["NICK"],
        handler: connection::handle_nick,
    },
];

/// Parameter 0 as a channel name, `#` removed.
pub(crate) fn channel_param(msg: &Message) -> Result<&str, MessageError> {
    let target = msg
        .param(0)
        .ok_or_else(|| MessageError::not_enough(msg.command(), 1, 0))?;
    Ok(target.strip_prefix('#').unwrap_or(target))
}

/// The prefix as a `nick!ident@host` mask.
pub(crate) fn source_mask(msg: &Message) -> Result<HostMask, MessageError> {
    msg.prefix()
        .and_then(HostMask::parse)
        .ok_or_else(|| MessageError::invalid_source(msg.command(), msg.prefix()))
}
