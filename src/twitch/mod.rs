//! Twitch IRCv3 dialect.
//!
//! Twitch carries most of its chat semantics in message tags. This module
//! decodes those tags into typed state ([`TwitchUserInfo`],
//! [`TwitchChannelState`]) and provides the handler layer that turns
//! `USERNOTICE`, `ROOMSTATE`, `USERSTATE`, `CLEARCHAT`, `HOSTTARGET` and
//! cheering `PRIVMSG` lines into events.
//!
//! The dialect is selected with [`Dialect::Twitch`](crate::config::Dialect),
//! usually through [`ClientConfig::twitch`](crate::config::ClientConfig::twitch).

pub mod handlers;
pub mod tags;

pub use self::tags::{parse_badges, Badges};

use std::fmt;

/// Message rate for regular accounts, per 30 seconds.
pub const RATE_LIMIT_NORMAL: u32 = 20;
/// Message rate for known bots, per 30 seconds.
pub const RATE_LIMIT_KNOWN: u32 = 50;
/// Message rate for accounts that moderate every joined channel.
pub const RATE_LIMIT_MOD: u32 = 100;
/// Message rate for verified bots, per 30 seconds.
pub const RATE_LIMIT_VERIFIED: u32 = 7500;

/// Twitch chat server host.
pub const TWITCH_HOST: &str = "irc.twitch.tv";
/// Twitch chat plaintext port.
pub const TWITCH_PORT: u16 = 6667;

/// Capabilities requested on a Twitch connection, in request order.
pub const TWITCH_CAPABILITIES: [&str; 3] = [
    ":twitch.tv/membership",
    ":twitch.tv/tags",
    ":twitch.tv/commands",
];

/// A subscription tier, from the `msg-param-sub-plan` tag.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SubscriptionPlan {
    /// Subscription through Prime Gaming.
    Prime,
    /// Tier 1 (`1000`).
    Tier1,
    /// Tier 2 (`2000`).
    Tier2,
    /// Tier 3 (`3000`).
    Tier3,
    /// Any other value, kept verbatim.
    Unknown(String),
}

impl SubscriptionPlan {
    /// Decode a `msg-param-sub-plan` value.
    pub fn from_tag(value: &str) -> SubscriptionPlan {
        match value {
            "Prime" => SubscriptionPlan::Prime,
            "1000" => SubscriptionPlan::Tier1,
            "2000" => SubscriptionPlan::Tier2,
            "3000" => SubscriptionPlan::Tier3,
            other => SubscriptionPlan::Unknown(other.to_owned()),
        }
    }
}

impl fmt::Display for SubscriptionPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubscriptionPlan::Prime => f.write_str("Prime"),
            SubscriptionPlan::Tier1 => f.write_str("1000"),
            SubscriptionPlan::Tier2 => f.write_str("2000"),
            SubscriptionPlan::Tier3 => f.write_str("3000"),
            SubscriptionPlan::Unknown(raw) => f.write_str(raw),
        }
    }
}

/// Per-user details Twitch attaches to a message through tags.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TwitchUserInfo {
    /// Twitch staff administrator.
    pub is_admin: bool,
    /// Has cheered bits in the channel.
    pub is_bits_donator: bool,
    /// Owner of the channel.
    pub is_broadcaster: bool,
    /// Global moderator.
    pub is_global_mod: bool,
    /// Channel moderator.
    pub is_moderator: bool,
    /// Channel subscriber.
    pub is_subscriber: bool,
    /// Twitch staff.
    pub is_staff: bool,
    /// Turbo account.
    pub is_turbo: bool,
    /// Months subscribed, from `badge-info`; 0 when not subscribed.
    pub months_subscribed: u32,
    /// The user's display name.
    pub display_name: Option<String>,
    /// The user's numeric id.
    pub user_id: Option<u64>,
}

/// Room state of a channel joined on Twitch.
///
/// `ROOMSTATE` updates these flags incrementally; `USERSTATE` updates the
/// local user's flags.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TwitchChannelState {
    pub(crate) emote_only: bool,
    pub(crate) followers_only: Option<u32>,
    pub(crate) r9k: bool,
    pub(crate) subs_only: bool,
    pub(crate) slow_seconds: u32,
    pub(crate) is_moderator: bool,
    pub(crate) is_subscriber: bool,
    pub(crate) joined_event_fired: bool,
}

impl TwitchChannelState {
    /// Only emotes may be posted.
    pub fn is_emote_only(&self) -> bool {
        self.emote_only
    }

    /// Only followers may chat.
    pub fn is_followers_only(&self) -> bool {
        self.followers_only.is_some()
    }

    /// Minimum follow age in minutes, `None` when followers-only is off.
    pub fn followers_only_minutes(&self) -> Option<u32> {
        self.followers_only
    }

    /// Messages must be unique (R9K).
    pub fn is_r9k(&self) -> bool {
        self.r9k
    }

    /// Only subscribers may chat.
    pub fn is_subs_only(&self) -> bool {
        self.subs_only
    }

    /// Slow mode interval in seconds; 0 when off.
    pub fn slow_seconds(&self) -> u32 {
        self.slow_seconds
    }

    /// The local user moderates this channel.
    pub fn is_moderator(&self) -> bool {
        self.is_moderator
    }

    /// The local user subscribes to this channel.
    pub fn is_subscriber(&self) -> bool {
        self.is_subscriber
    }

    /// Whether the deferred join event has been raised.
    pub fn joined_event_fired(&self) -> bool {
        self.joined_event_fired
    }
}
