use std::fmt::{self, Write};

use super::tags::escape_tag_value;
use super::Message;

/// Whether a final parameter must be sent in `:trailing` form.
fn needs_trailing(param: &str) -> bool {
    param.is_empty() || param.contains(' ') || param.starts_with(':')
}

impl fmt::Display for Message {
    /// Re-serializes the message in wire form (without a line terminator).
    ///
    /// Tags are written in key order so the output is stable.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(tags) = self.tags.as_ref().filter(|t| !t.is_empty()) {
            let mut entries: Vec<_> = tags.iter().collect();
            entries.sort();

            f.write_char('@')?;
            for (i, (key, value)) in entries.into_iter().enumerate() {
                if i > 0 {
                    f.write_char(';')?;
                }
                f.write_str(key)?;
                f.write_char('=')?;
                escape_tag_value(f, value)?;
            }
            f.write_char(' ')?;
        }

        if let Some(prefix) = &self.prefix {
            write!(f, ":{} ", prefix)?;
        }

        f.write_str(&self.command)?;

        if let Some((last, middle)) = self.params.split_last() {
            for param in middle {
                write!(f, " {}", param)?;
            }
            if needs_trailing(last) {
                write!(f, " :{}", last)?;
            } else {
                write!(f, " {}", last)?;
            }
        }
        Ok(())
    }
}
