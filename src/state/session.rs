use crate::channel::Channel;
use crate::config::Dialect;
use crate::user::User;

use super::Roster;

/// The local identity and joined channels of one connection.
#[derive(Clone, Debug)]
pub struct Session {
    user: User,
    roster: Roster,
    dialect: Dialect,
    nick_retried: bool,
}

impl Session {
    /// A fresh session for a registration nickname.
    pub fn new(nickname: impl Into<String>, dialect: Dialect) -> Self {
        Session {
            user: User::new(nickname),
            roster: Roster::new(),
            dialect,
            nick_retried: false,
        }
    }

    /// The local user.
    pub fn user(&self) -> &User {
        &self.user
    }

    /// Mutable access to the local user.
    pub fn user_mut(&mut self) -> &mut User {
        &mut self.user
    }

    /// The joined channels.
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Mutable access to the joined channels.
    pub fn roster_mut(&mut self) -> &mut Roster {
        &mut self.roster
    }

    /// The protocol dialect this session speaks.
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Returns `true` if `user` is the local user, by the partial-identity
    /// equality rule of [`User`].
    pub fn is_local_user(&self, user: &User) -> bool {
        *user == self.user
    }

    /// Claim the single nickname-in-use retry of this session.
    ///
    /// Returns `true` the first time only.
    pub(crate) fn claim_nick_retry(&mut self) -> bool {
        !std::mem::replace(&mut self.nick_retried, true)
    }

    /// A roster entry of the right kind for this dialect.
    pub fn new_channel(&self, name: &str) -> Channel {
        match self.dialect {
            Dialect::Standard => Channel::new(name),
            Dialect::Twitch => Channel::twitch(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hostmask::HostMask;

    #[test]
    fn test_local_user_recognised_from_partial_identity() {
        let session = Session::new("Bot", Dialect::Standard);
        let seen = User::from_hostmask(HostMask::parse("bot!bot@host").unwrap());
        assert!(session.is_local_user(&seen));
        assert!(!session.is_local_user(&User::new("someone")));
    }

    #[test]
    fn test_nick_retry_claimed_once() {
        let mut session = Session::new("a", Dialect::Standard);
        assert!(session.claim_nick_retry());
        assert!(!session.claim_nick_retry());
    }

    #[test]
    fn test_new_channel_follows_dialect() {
        let standard = Session::new("a", Dialect::Standard);
        let twitch = Session::new("a", Dialect::Twitch);
        assert!(standard.new_channel("c").twitch_state().is_none());
        assert!(twitch.new_channel("c").twitch_state().is_some());
    }
}
