use std::convert::Infallible;
use std::str::FromStr;

use super::{tags, Message};

impl Message {
    /// Parse one protocol line.
    ///
    /// The line is split on single spaces. A leading `@` segment is the tag
    /// section, a following `:` segment is the prefix, the next segment is
    /// the command. The first later segment starting with `:` absorbs the
    /// rest of the line as the trailing parameter.
    pub fn parse(line: &str) -> Message {
        let line = line.trim_end_matches(['\r', '\n']);
        let mut message = Message {
            raw: line.to_owned(),
            tags: None,
            prefix: None,
            command: String::new(),
            params: Vec::new(),
        };

        let segments: Vec<&str> = line.split(' ').collect();
        if segments.len() < 2 {
            return message;
        }

        let mut idx = 0;
        if let Some(raw_tags) = segments[0].strip_prefix('@') {
            message.tags = Some(tags::parse_tags(raw_tags));
            idx += 1;
        }

        if let Some(prefix) = segments[idx].strip_prefix(':') {
            message.prefix = Some(prefix.to_owned());
            idx += 1;
        }

        match segments.get(idx) {
            Some(command) => message.command = (*command).to_owned(),
            None => return message,
        }

        let rest = &segments[idx + 1..];
        for (i, segment) in rest.iter().enumerate() {
            if let Some(first) = segment.strip_prefix(':') {
                let mut trailing = String::from(first);
                for more in &rest[i + 1..] {
                    trailing.push(' ');
                    trailing.push_str(more);
                }
                message.params.push(trailing);
                break;
            }
            message.params.push((*segment).to_owned());
        }

        message
    }
}

impl FromStr for Message {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Message::parse(s))
    }
}
