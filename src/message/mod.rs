//! Parsed IRC protocol lines.
//!
//! A line has the shape
//!
//! ```text
//! [@tag1=val1;tag2=val2 ][:prefix ]COMMAND[ param1][ param2]...[ :trailing param]
//! ```
//!
//! [`Message::parse`] never fails: a line too short to carry a command
//! yields a message with an empty command and no parameters, and handlers
//! are expected to tolerate that.

mod parse;
mod serialize;
pub mod tags;

use std::collections::HashMap;

/// IRCv3 tags keyed by tag name, values already unescaped.
pub type Tags = HashMap<String, String>;

/// An owned, immutable IRC message.
///
/// # Example
///
/// ```
/// use slirc_client::Message;
///
/// let msg = Message::parse("@badges=moderator/1 :nick!ident@host PRIVMSG #rust :Hello there");
/// assert_eq!(msg.command(), "PRIVMSG");
/// assert_eq!(msg.params(), ["#rust", "Hello there"]);
/// assert_eq!(msg.tag("badges"), Some("moderator/1"));
/// ```
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Message {
    raw: String,
    tags: Option<Tags>,
    prefix: Option<String>,
    command: String,
    params: Vec<String>,
}

impl Message {
    /// The line as received, without its line terminator.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The tag map, if the line carried a tag section.
    pub fn tags(&self) -> Option<&Tags> {
        self.tags.as_ref()
    }

    /// Value of a single tag.
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.as_ref()?.get(key).map(String::as_str)
    }

    /// Returns `true` if the tag is present, whatever its value.
    pub fn has_tag(&self, key: &str) -> bool {
        self.tags.as_ref().is_some_and(|t| t.contains_key(key))
    }

    /// The prefix without its `:` sigil.
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// The command token, case as received. Empty for malformed lines.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// All parameters in order; the trailing parameter is last.
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// A single parameter.
    pub fn param(&self, index: usize) -> Option<&str> {
        self.params.get(index).map(String::as_str)
    }
}
