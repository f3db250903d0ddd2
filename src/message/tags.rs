//! IRCv3 tag section parsing and value escaping.

use std::fmt::{Result as FmtResult, Write};

use nom::{
    bytes::complete::take_till,
    character::complete::char,
    combinator::opt,
    multi::separated_list0,
    sequence::{pair, preceded},
    IResult,
};
use tracing::warn;

use super::Tags;

type RawTag<'a> = (&'a str, Option<&'a str>);

/// `key[=value]`, value running to the next `;`.
fn tag_entry(input: &str) -> IResult<&str, RawTag<'_>> {
    pair(
        take_till(|c: char| c == '=' || c == ';'),
        opt(preceded(char('='), take_till(|c: char| c == ';'))),
    )(input)
}

fn tag_list(input: &str) -> IResult<&str, Vec<RawTag<'_>>> {
    separated_list0(char(';'), tag_entry)(input)
}

/// Parse the tag section of a line (without the leading `@`).
///
/// Entries without `=` are dropped; a repeated key keeps its last value.
pub fn parse_tags(raw: &str) -> Tags {
    let mut tags = Tags::new();
    let entries = match tag_list(raw) {
        Ok((_, entries)) => entries,
        Err(e) => {
            warn!(error = %e, "unparseable tag section");
            return tags;
        }
    };

    for (key, value) in entries {
        match value {
            Some(value) if !key.is_empty() => {
                tags.insert(key.to_owned(), unescape_tag_value(value));
            }
            _ if key.is_empty() && value.is_none() => {}
            _ => warn!(tag = key, "dropping malformed message tag"),
        }
    }
    tags
}

/// Escape a tag value for serialization.
pub fn escape_tag_value(f: &mut dyn Write, value: &str) -> FmtResult {
    for c in value.chars() {
        match c {
            ';' => f.write_str("\\:")?,
            ' ' => f.write_str("\\s")?,
            '\\' => f.write_str("\\\\")?,
            '\r' => f.write_str("\\r")?,
            '\n' => f.write_str("\\n")?,
            c => f.write_char(c)?,
        }
    }
    Ok(())
}

/// Unescape a tag value from wire format.
///
/// Unknown escapes lose their backslash; a lone trailing backslash is dropped.
pub fn unescape_tag_value(value: &str) -> String {
    if !value.contains('\\') {
        return value.to_owned();
    }

    let mut unescaped = String::with_capacity(value.len());
    let mut iter = value.chars();
    while let Some(c) = iter.next() {
        if c != '\\' {
            unescaped.push(c);
            continue;
        }
        match iter.next() {
            Some(':') => unescaped.push(';'),
            Some('s') => unescaped.push(' '),
            Some('r') => unescaped.push('\r'),
            Some('n') => unescaped.push('\n'),
            Some(other) => unescaped.push(other),
            None => break,
        }
    }
    unescaped
}
