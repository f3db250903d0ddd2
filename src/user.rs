//! Message sources: users and servers.

use std::fmt;

use crate::casemap::irc_eq;
use crate::channel::MessageTarget;
use crate::hostmask::HostMask;
use crate::twitch::TwitchUserInfo;

/// A user seen on a connection.
///
/// A user may be known only by nickname (e.g. the target of a MODE
/// change) or by a full `nick!ident@host` mask. Equality follows that
/// split: if either side lacks an ident or host, only nicknames are
/// compared; otherwise the full masks are. Both comparisons are
/// case-insensitive. The relation is therefore not transitive and
/// `User` does not implement `Eq` or `Hash`.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct User {
    nickname: String,
    ident: Option<String>,
    host: Option<String>,
    twitch: Option<TwitchUserInfo>,
}

impl User {
    /// A user known only by nickname.
    pub fn new(nickname: impl Into<String>) -> Self {
        User {
            nickname: nickname.into(),
            ident: None,
            host: None,
            twitch: None,
        }
    }

    /// A fully identified user.
    pub fn from_hostmask(mask: HostMask) -> Self {
        let (nickname, ident, host) = mask.into_parts();
        User {
            nickname,
            ident: Some(ident),
            host: Some(host),
            twitch: None,
        }
    }

    /// Attach the Twitch extension payload.
    pub fn with_twitch(mut self, info: TwitchUserInfo) -> Self {
        self.twitch = Some(info);
        self
    }

    /// The current nickname.
    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    /// The ident, if known.
    pub fn ident(&self) -> Option<&str> {
        self.ident.as_deref()
    }

    /// The host, if known.
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// Twitch-specific details decoded from message tags.
    pub fn twitch(&self) -> Option<&TwitchUserInfo> {
        self.twitch.as_ref()
    }

    /// Returns `true` unless both ident and host are known.
    pub fn is_partial(&self) -> bool {
        self.ident.is_none() || self.host.is_none()
    }

    /// Replace the identity with a freshly seen mask.
    pub fn update(&mut self, mask: &HostMask) {
        self.nickname = mask.nickname().to_owned();
        self.ident = Some(mask.ident().to_owned());
        self.host = Some(mask.host().to_owned());
    }

    pub(crate) fn set_nickname(&mut self, nickname: impl Into<String>) {
        self.nickname = nickname.into();
    }
}

impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        if self.is_partial() || other.is_partial() {
            return irc_eq(&self.nickname, &other.nickname);
        }
        irc_eq(&self.to_string(), &other.to_string())
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.ident, &self.host) {
            (Some(ident), Some(host)) => write!(f, "{}!{}@{}", self.nickname, ident, host),
            _ => f.write_str(&self.nickname),
        }
    }
}

impl MessageTarget for User {
    fn target_name(&self) -> String {
        self.nickname.clone()
    }
}

/// A message source that is not a user.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Server {
    /// The server's host name as given in the prefix.
    pub host: String,
}

/// Discriminates [`Source`] variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SourceType {
    /// The message came from a user.
    User,
    /// The message came from a server.
    Server,
}

/// Where a message came from.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Source {
    /// A `nick!ident@host` prefix.
    User(User),
    /// Any other prefix.
    Server(Server),
}

impl Source {
    /// The kind of source.
    pub fn source_type(&self) -> SourceType {
        match self {
            Source::User(_) => SourceType::User,
            Source::Server(_) => SourceType::Server,
        }
    }

    /// The user, if the source is one.
    pub fn as_user(&self) -> Option<&User> {
        match self {
            Source::User(user) => Some(user),
            Source::Server(_) => None,
        }
    }

    /// Full mask for users, host name for servers.
    pub fn name(&self) -> String {
        match self {
            Source::User(user) => user.to_string(),
            Source::Server(server) => server.host.clone(),
        }
    }
}
