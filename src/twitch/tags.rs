//! Decoders for Twitch tag conventions.

use std::collections::HashMap;
use std::str::FromStr;

use nom::{
    bytes::complete::take_till1,
    character::complete::{char, digit1},
    combinator::{all_consuming, map_res},
    sequence::separated_pair,
    IResult,
};
use tracing::warn;

use super::TwitchUserInfo;
use crate::error::MessageError;
use crate::message::Message;

/// Badge name to badge version.
pub type Badges = HashMap<String, u32>;

/// `name/version`, version numeric.
fn badge(input: &str) -> IResult<&str, (&str, u32)> {
    all_consuming(separated_pair(
        take_till1(|c: char| c == '/'),
        char('/'),
        map_res(digit1, |s: &str| s.parse::<u32>()),
    ))(input)
}

/// Decode a comma-separated `name/version` badge list.
///
/// Malformed entries are skipped with a warning.
///
/// ```
/// use slirc_client::twitch::parse_badges;
///
/// let badges = parse_badges("moderator/1,subscriber/12,bogus");
/// assert_eq!(badges["subscriber"], 12);
/// assert_eq!(badges.len(), 2);
/// ```
pub fn parse_badges(raw: &str) -> Badges {
    let mut badges = Badges::new();
    for entry in raw.split(',').filter(|e| !e.is_empty()) {
        match badge(entry) {
            Ok((_, (name, version))) => {
                badges.insert(name.to_owned(), version);
            }
            Err(_) => warn!(badge = entry, "skipping malformed badge"),
        }
    }
    badges
}

/// Parse an optional numeric tag, warning when the value is not a number.
pub(crate) fn numeric_tag<T: FromStr>(msg: &Message, key: &str) -> Option<T> {
    let raw = msg.tag(key)?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(tag = key, value = raw, "tag value is not numeric");
            None
        }
    }
}

/// A tag the message type cannot do without.
pub(crate) fn required_tag<'a>(
    msg: &'a Message,
    key: &'static str,
) -> Result<&'a str, MessageError> {
    msg.tag(key)
        .ok_or_else(|| MessageError::missing_tag(msg.command(), key))
}

/// A required numeric tag.
pub(crate) fn required_numeric<T: FromStr>(
    msg: &Message,
    key: &'static str,
) -> Result<T, MessageError> {
    let raw = required_tag(msg, key)?;
    raw.parse().map_err(|_| MessageError::InvalidTagValue {
        tag: key,
        value: raw.to_owned(),
    })
}

impl TwitchUserInfo {
    /// Decode the sender details of a message.
    ///
    /// Missing tags leave their fields at the default and are logged.
    pub fn from_message(msg: &Message) -> TwitchUserInfo {
        let mut info = TwitchUserInfo::default();

        match msg.tag("badges") {
            Some(raw) => {
                let badges = parse_badges(raw);
                info.is_admin = badges.contains_key("admin");
                info.is_bits_donator = badges.contains_key("bits");
                info.is_broadcaster = badges.contains_key("broadcaster");
                info.is_global_mod = badges.contains_key("global_mod");
                info.is_moderator = badges.contains_key("moderator");
                info.is_subscriber = badges.contains_key("subscriber");
                info.is_staff = badges.contains_key("staff");
                info.is_turbo = badges.contains_key("turbo");
            }
            None => warn!("missing badges tag"),
        }

        match msg.tag("badge-info") {
            Some(raw) => {
                if let Some(months) = parse_badges(raw).get("subscriber") {
                    info.months_subscribed = *months;
                }
            }
            None => warn!("missing badge-info tag"),
        }

        match msg.tag("display-name") {
            Some(name) => info.display_name = Some(name.to_owned()),
            None => warn!("missing display-name tag"),
        }

        if msg.has_tag("user-id") {
            info.user_id = numeric_tag(msg, "user-id");
        } else {
            warn!("missing user-id tag");
        }

        info
    }
}
