//! `nick!ident@host` masks.

use std::fmt;

/// A parsed `nick!ident@host` mask.
///
/// Any part may contain the `*`/`?` wildcards. A prefix that does not
/// have the full shape is a server name, so [`HostMask::parse`] returns
/// `None` instead of an error.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HostMask {
    nickname: String,
    ident: String,
    host: String,
}

impl HostMask {
    /// Split a mask at its first `!` and first `@`.
    ///
    /// Both separators must exist and `!` must come first.
    ///
    /// ```
    /// use slirc_client::HostMask;
    ///
    /// let mask = HostMask::parse("nick!ident@host").unwrap();
    /// assert_eq!(mask.nickname(), "nick");
    /// assert!(HostMask::parse("irc.example.com").is_none());
    /// ```
    pub fn parse(s: &str) -> Option<HostMask> {
        let bang = s.find('!')?;
        let at = s.find('@')?;
        if bang > at {
            return None;
        }

        Some(HostMask {
            nickname: s[..bang].to_owned(),
            ident: s[bang + 1..at].to_owned(),
            host: s[at + 1..].to_owned(),
        })
    }

    /// The nickname part.
    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    /// The ident (username) part.
    pub fn ident(&self) -> &str {
        &self.ident
    }

    /// The host part.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns `true` if any part contains a wildcard.
    pub fn has_wildcards(&self) -> bool {
        [&self.nickname, &self.ident, &self.host]
            .iter()
            .any(|part| part.contains(['*', '?']))
    }

    pub(crate) fn into_parts(self) -> (String, String, String) {
        (self.nickname, self.ident, self.host)
    }
}

impl fmt::Display for HostMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}!{}@{}", self.nickname, self.ident, self.host)
    }
}
