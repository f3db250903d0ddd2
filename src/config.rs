//! Client configuration.

use std::time::Duration;

use crate::twitch::{TWITCH_CAPABILITIES, TWITCH_HOST, TWITCH_PORT};

/// Credentials sent during registration.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegistrationInfo {
    /// Nickname sent with `NICK`.
    pub nickname: String,
    /// Username sent with `USER`.
    pub username: String,
    /// Server password sent with `PASS`, if any.
    pub password: Option<String>,
}

impl RegistrationInfo {
    /// Registration using `nickname` as the username too.
    pub fn new(nickname: impl Into<String>) -> Self {
        let nickname = nickname.into();
        RegistrationInfo {
            username: nickname.clone(),
            nickname,
            password: None,
        }
    }

    /// Use a distinct username.
    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    /// Send a server password.
    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }
}

/// Outbound pacing policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FloodConfig {
    /// At least `delay` between two consecutive lines.
    FixedDelay {
        /// Minimum spacing.
        delay: Duration,
    },
    /// At most `rate` lines per `period`.
    RateLimit {
        /// Lines allowed per window.
        rate: u32,
        /// Window length.
        period: Duration,
    },
}

#[cfg(feature = "tokio")]
impl FloodConfig {
    /// Instantiate the runtime policy.
    pub fn build(&self) -> Box<dyn crate::flood::FloodPolicy> {
        match *self {
            FloodConfig::FixedDelay { delay } => Box::new(crate::flood::FixedDelay::new(delay)),
            FloodConfig::RateLimit { rate, period } => {
                Box::new(crate::flood::RateLimit::new(rate, period))
            }
        }
    }
}

/// Protocol dialect of a connection.
///
/// Selects the handler layers installed in the registry and the kind of
/// roster entries created on join.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Dialect {
    /// Plain IRC.
    #[default]
    Standard,
    /// Twitch chat with IRCv3 tags.
    Twitch,
}

/// Everything needed to open and register a connection.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClientConfig {
    /// Server host name.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Registration credentials.
    pub registration: RegistrationInfo,
    /// Arguments of the `CAP REQ` lines sent after registration.
    pub capabilities: Vec<String>,
    /// Outbound pacing; `None` sends every line immediately.
    pub flood: Option<FloodConfig>,
    /// Protocol dialect.
    pub dialect: Dialect,
}

impl ClientConfig {
    /// A plain IRC configuration without pacing or capabilities.
    pub fn new(host: impl Into<String>, port: u16, registration: RegistrationInfo) -> Self {
        ClientConfig {
            host: host.into(),
            port,
            registration,
            capabilities: Vec::new(),
            flood: None,
            dialect: Dialect::Standard,
        }
    }

    /// Twitch chat preset.
    ///
    /// `rate` is the number of lines allowed per 30 seconds, usually one of
    /// the `RATE_LIMIT_*` constants in [`twitch`](crate::twitch).
    ///
    /// ```
    /// use slirc_client::config::{ClientConfig, Dialect};
    /// use slirc_client::twitch::RATE_LIMIT_NORMAL;
    ///
    /// let config = ClientConfig::twitch("mybot", "oauth:token", RATE_LIMIT_NORMAL);
    /// assert_eq!(config.host, "irc.twitch.tv");
    /// assert_eq!(config.dialect, Dialect::Twitch);
    /// ```
    pub fn twitch(username: impl Into<String>, oauth_token: impl Into<String>, rate: u32) -> Self {
        let username = username.into();
        ClientConfig {
            host: TWITCH_HOST.to_owned(),
            port: TWITCH_PORT,
            registration: RegistrationInfo::new(username).with_password(oauth_token),
            capabilities: TWITCH_CAPABILITIES.iter().map(|c| (*c).to_owned()).collect(),
            flood: Some(FloodConfig::RateLimit {
                rate,
                period: Duration::from_secs(30),
            }),
            dialect: Dialect::Twitch,
        }
    }

    /// Request a capability after registration.
    #[must_use]
    pub fn with_capability(mut self, capability: impl Into<String>) -> Self {
        self.capabilities.push(capability.into());
        self
    }

    /// Pace outbound lines.
    #[must_use]
    pub fn with_flood(mut self, flood: FloodConfig) -> Self {
        self.flood = Some(flood);
        self
    }

    /// Speak a different dialect.
    #[must_use]
    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_defaults() {
        let reg = RegistrationInfo::new("bot");
        assert_eq!(reg.username, "bot");
        assert!(reg.password.is_none());

        let reg = reg.with_username("ident").with_password("secret");
        assert_eq!(reg.nickname, "bot");
        assert_eq!(reg.username, "ident");
        assert_eq!(reg.password.as_deref(), Some("secret"));
    }

    #[test]
    fn test_twitch_preset() {
        let config = ClientConfig::twitch("mybot", "oauth:abc", 50);
        assert_eq!(config.port, 6667);
        assert_eq!(config.registration.nickname, "mybot");
        assert_eq!(config.registration.username, "mybot");
        assert_eq!(config.registration.password.as_deref(), Some("oauth:abc"));
        assert_eq!(
            config.capabilities,
            [":twitch.tv/membership", ":twitch.tv/tags", ":twitch.tv/commands"]
        );
        assert_eq!(
            config.flood,
            Some(FloodConfig::RateLimit {
                rate: 50,
                period: Duration::from_secs(30)
            })
        );
    }

    #[test]
    fn test_builder() {
        let config = ClientConfig::new("irc.libera.chat", 6667, RegistrationInfo::new("n"))
            .with_capability("multi-prefix")
            .with_flood(FloodConfig::FixedDelay {
                delay: Duration::from_millis(500),
            });
        assert_eq!(config.capabilities, ["multi-prefix"]);
        assert_eq!(config.dialect, Dialect::Standard);
        assert!(config.flood.is_some());
    }
}
