//! Line grammar and IRCv3 tag handling.
//!
//! Run with: `cargo test --test parser_compliance`

use slirc_client::message::tags::{escape_tag_value, unescape_tag_value};
use slirc_client::{HostMask, Message};

// =============================================================================
// IRCv3 MESSAGE TAGS ESCAPING (https://ircv3.net/specs/extensions/message-tags)
// =============================================================================

mod tag_escaping {
    use super::*;

    #[test]
    fn test_unescape_sequences() {
        assert_eq!(unescape_tag_value("a\\:b"), "a;b");
        assert_eq!(unescape_tag_value("hello\\sworld"), "hello world");
        assert_eq!(unescape_tag_value("path\\\\file"), "path\\file");
        assert_eq!(unescape_tag_value("line\\rend"), "line\rend");
        assert_eq!(unescape_tag_value("line\\nend"), "line\nend");
    }

    #[test]
    fn test_unescape_trailing_backslash() {
        assert_eq!(unescape_tag_value("test\\"), "test");
    }

    #[test]
    fn test_unescape_unknown_escape() {
        assert_eq!(unescape_tag_value("a\\xb"), "axb");
    }

    #[test]
    fn test_escape_roundtrip() {
        for original in [
            "simple",
            "with space",
            "with;semicolon",
            "with\\backslash",
            "with\nnewline",
            "complex; \\ \n \r all",
        ] {
            let mut escaped = String::new();
            escape_tag_value(&mut escaped, original).unwrap();
            assert!(!escaped.contains(' ') && !escaped.contains(';'));
            assert_eq!(unescape_tag_value(&escaped), original);
        }
    }
}

// =============================================================================
// TAG SECTION
// =============================================================================

mod tag_parsing {
    use super::*;

    #[test]
    fn test_malformed_entry_dropped() {
        let msg = Message::parse("@a=1;b;c=3 :p CMD x");
        let tags = msg.tags().unwrap();
        assert_eq!(tags.len(), 2);
        assert_eq!(msg.tag("a"), Some("1"));
        assert_eq!(msg.tag("c"), Some("3"));
        assert!(!msg.has_tag("b"));
        assert_eq!(msg.command(), "CMD");
        assert_eq!(msg.params(), ["x"]);
    }

    #[test]
    fn test_value_split_on_first_equals() {
        let msg = Message::parse("@k=a=b :p CMD x");
        assert_eq!(msg.tag("k"), Some("a=b"));
    }

    #[test]
    fn test_empty_value_kept() {
        let msg = Message::parse("@badges=;mod=0 :tmi.twitch.tv USERSTATE #c");
        assert_eq!(msg.tag("badges"), Some(""));
        assert!(msg.has_tag("badges"));
    }

    #[test]
    fn test_escaped_values() {
        let msg = Message::parse("@system-msg=5\\sraiders\\sfrom\\sA :tmi.twitch.tv USERNOTICE #c");
        assert_eq!(msg.tag("system-msg"), Some("5 raiders from A"));
    }

    #[test]
    fn test_duplicate_key_keeps_last() {
        let msg = Message::parse("@k=1;k=2 :p CMD x");
        assert_eq!(msg.tag("k"), Some("2"));
    }
}

// =============================================================================
// RFC 1459 LINE GRAMMAR
// =============================================================================

mod grammar {
    use super::*;

    #[test]
    fn test_prefix_command_params() {
        let msg = Message::parse(":irc.example.com 001 bot :Welcome to the network");
        assert_eq!(msg.prefix(), Some("irc.example.com"));
        assert_eq!(msg.command(), "001");
        assert_eq!(msg.params(), ["bot", "Welcome to the network"]);
    }

    #[test]
    fn test_middle_params_only() {
        let msg = Message::parse(":nick!i@h MODE #chan +o other");
        assert_eq!(msg.params(), ["#chan", "+o", "other"]);
    }

    #[test]
    fn test_too_short_is_empty() {
        for line in ["", "PING", "@a=1"] {
            let msg = Message::parse(line);
            assert_eq!(msg.command(), "", "line {:?}", line);
            assert!(msg.params().is_empty());
        }
    }

    #[test]
    fn test_reserialize() {
        let line = "@a=x\\sy :nick!i@h PRIVMSG #chan :hello there";
        assert_eq!(Message::parse(line).to_string(), line);
    }

    #[test]
    fn test_reserialize_colon_param() {
        let msg = Message::parse("CMD a ::starts-with-colon");
        assert_eq!(msg.params(), ["a", ":starts-with-colon"]);
        assert_eq!(msg.to_string(), "CMD a ::starts-with-colon");
    }
}

// =============================================================================
// HOSTMASKS
// =============================================================================

mod hostmasks {
    use super::*;

    #[test]
    fn test_valid_mask() {
        let mask = HostMask::parse("nick!ident@host").unwrap();
        assert_eq!(
            (mask.nickname(), mask.ident(), mask.host()),
            ("nick", "ident", "host")
        );
    }

    #[test]
    fn test_invalid_masks() {
        assert!(HostMask::parse("nick_ident@host").is_none());
        assert!(HostMask::parse("tmi.twitch.tv").is_none());
        assert!(HostMask::parse("a@b!c").is_none());
    }
}
