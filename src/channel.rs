//! Channels and message targets.

use crate::twitch::TwitchChannelState;

/// Anything a PRIVMSG or NOTICE can be addressed to.
pub trait MessageTarget {
    /// The name to put in the target parameter.
    fn target_name(&self) -> String;
}

impl MessageTarget for str {
    fn target_name(&self) -> String {
        self.to_owned()
    }
}

impl MessageTarget for String {
    fn target_name(&self) -> String {
        self.clone()
    }
}

/// A joined channel.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Channel {
    name: String,
    is_operator: bool,
    twitch: Option<TwitchChannelState>,
}

impl Channel {
    /// A channel named without its `#` sigil.
    pub fn new(name: impl Into<String>) -> Self {
        Channel {
            name: name.into(),
            is_operator: false,
            twitch: None,
        }
    }

    /// A channel carrying Twitch room state.
    pub fn twitch(name: impl Into<String>) -> Self {
        Channel {
            twitch: Some(TwitchChannelState::default()),
            ..Channel::new(name)
        }
    }

    /// The channel name without `#`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the local user holds channel operator status.
    pub fn is_operator(&self) -> bool {
        self.is_operator
    }

    pub(crate) fn set_operator(&mut self, granted: bool) {
        self.is_operator = granted;
    }

    /// Twitch room state, for channels joined under the Twitch dialect.
    pub fn twitch_state(&self) -> Option<&TwitchChannelState> {
        self.twitch.as_ref()
    }

    pub(crate) fn twitch_state_mut(&mut self) -> Option<&mut TwitchChannelState> {
        self.twitch.as_mut()
    }
}

impl MessageTarget for Channel {
    fn target_name(&self) -> String {
        format!("#{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_names() {
        assert_eq!(Channel::new("rust").target_name(), "#rust");
        assert_eq!("nick".target_name(), "nick");
        assert_eq!(String::from("#raw").target_name(), "#raw");
    }

    #[test]
    fn test_twitch_channel_has_state() {
        assert!(Channel::new("a").twitch_state().is_none());
        let chan = Channel::twitch("a");
        let state = chan.twitch_state().unwrap();
        assert!(!state.joined_event_fired());
        assert_eq!(state.followers_only_minutes(), None);
    }
}
