//! Error types for the IRC client.
//!
//! Failures fall into four groups, each with its own type:
//!
//! - [`ProtocolError`]: the byte stream itself is broken (I/O), or one
//!   line was over-long or held an illegal character.
//! - [`MessageError`]: a line parsed fine but violates what a command
//!   requires (parameter counts, sources, required tags).
//! - [`ClientError`]: the caller used the client wrongly (connecting twice,
//!   joining a channel twice, registering a handler twice).
//! - [`IrcError`]: the union of the above, carried by
//!   [`Event::Error`](crate::event::Event::Error) and returned by handlers.

use thiserror::Error;

/// Convenience type alias for Results using [`IrcError`].
pub type Result<T, E = IrcError> = std::result::Result<T, E>;

/// Transport and line-codec errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// I/O error during reading or writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A line exceeded the codec's length limit.
    #[error("line too long: {actual} bytes (limit {limit})")]
    MessageTooLong {
        /// Length of the offending line.
        actual: usize,
        /// Configured limit.
        limit: usize,
    },

    /// Illegal control character in a line.
    #[error("illegal control character: {0:?}")]
    IllegalControlChar(char),
}

impl ProtocolError {
    /// Returns `true` if this error means the peer went away.
    ///
    /// Resets are reported as a server-initiated disconnect rather than
    /// as an error.
    pub fn is_connection_reset(&self) -> bool {
        match self {
            ProtocolError::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::ConnectionReset
                    | std::io::ErrorKind::ConnectionAborted
                    | std::io::ErrorKind::BrokenPipe
                    | std::io::ErrorKind::UnexpectedEof
            ),
            _ => false,
        }
    }

    /// Returns `true` if this error cost one line and the stream is intact.
    pub fn is_line_fault(&self) -> bool {
        matches!(
            self,
            ProtocolError::MessageTooLong { .. } | ProtocolError::IllegalControlChar(_)
        )
    }
}

/// A received message that does not satisfy its command's requirements.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MessageError {
    /// Not enough parameters for the command.
    #[error("{command}: not enough parameters: expected {expected}, got {got}")]
    NotEnoughArguments {
        /// The command being handled.
        command: String,
        /// Minimum number of parameters.
        expected: usize,
        /// Actual number of parameters.
        got: usize,
    },

    /// The prefix is missing or is not a `nick!ident@host` mask.
    #[error("{command}: invalid source {prefix:?}")]
    InvalidSource {
        /// The command being handled.
        command: String,
        /// The raw prefix, if any.
        prefix: Option<String>,
    },

    /// The message refers to a channel the client has not joined.
    #[error("{command}: channel #{channel} is not joined")]
    UnknownChannel {
        /// The command being handled.
        command: String,
        /// Channel name without the `#` sigil.
        channel: String,
    },

    /// A tag the command cannot do without is absent.
    #[error("{command}: missing required tag {tag}")]
    MissingTag {
        /// The command being handled.
        command: String,
        /// The missing tag key.
        tag: &'static str,
    },

    /// A required tag is present but its value cannot be decoded.
    #[error("invalid value {value:?} for tag {tag}")]
    InvalidTagValue {
        /// The tag key.
        tag: &'static str,
        /// The raw value.
        value: String,
    },

    /// Parameters are present but malformed.
    #[error("{command}: {reason}")]
    InvalidSyntax {
        /// The command being handled.
        command: String,
        /// What is wrong.
        reason: String,
    },
}

/// Precondition failures reported synchronously to the caller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ClientError {
    /// `connect` was called while connected.
    #[error("the client is already connected to a server")]
    AlreadyConnected,

    /// `connect` was called while a connection attempt is running.
    #[error("the client is already connecting to a server")]
    AlreadyConnecting,

    /// An operation needs a live connection.
    #[error("the client is not connected to a server")]
    NotConnected,

    /// `disconnect` was called twice.
    #[error("the client is already disconnecting from the server")]
    AlreadyDisconnecting,

    /// `join_channel` was called for a channel in the roster.
    #[error("the client is already present in #{0}")]
    AlreadyInChannel(String),

    /// An ad-hoc handler was registered for a command that already has one.
    #[error("the command {0} is already handled by another message handler")]
    HandlerExists(String),

    /// Two base-layer handlers claim the same command.
    #[error("duplicate base handler for command {0}")]
    DuplicateHandler(&'static str),
}

/// Any failure the client can report through its error notification.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrcError {
    /// The transport failed.
    #[error(transparent)]
    Transport(#[from] ProtocolError),

    /// A received message violated the protocol.
    #[error(transparent)]
    Protocol(#[from] MessageError),

    /// An operation was attempted in the wrong state.
    #[error(transparent)]
    Usage(#[from] ClientError),

    /// A user-registered handler failed.
    #[error("handler error: {0}")]
    Handler(#[from] anyhow::Error),
}

impl From<std::io::Error> for IrcError {
    fn from(err: std::io::Error) -> Self {
        IrcError::Transport(ProtocolError::Io(err))
    }
}

impl MessageError {
    pub(crate) fn not_enough(command: &str, expected: usize, got: usize) -> Self {
        MessageError::NotEnoughArguments {
            command: command.to_owned(),
            expected,
            got,
        }
    }

    pub(crate) fn invalid_source(command: &str, prefix: Option<&str>) -> Self {
        MessageError::InvalidSource {
            command: command.to_owned(),
            prefix: prefix.map(str::to_owned),
        }
    }

    pub(crate) fn unknown_channel(command: &str, channel: &str) -> Self {
        MessageError::UnknownChannel {
            command: command.to_owned(),
            channel: channel.to_owned(),
        }
    }

    pub(crate) fn missing_tag(command: &str, tag: &'static str) -> Self {
        MessageError::MissingTag {
            command: command.to_owned(),
            tag,
        }
    }

    pub(crate) fn syntax(command: &str, reason: impl Into<String>) -> Self {
        MessageError::InvalidSyntax {
            command: command.to_owned(),
            reason: reason.into(),
        }
    }
}
