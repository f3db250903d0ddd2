//! Line framing for tokio.
//!
//! Reads CR/LF-terminated lines and writes lines with a CR/LF appended,
//! decoding UTF-8 lossily or, with the `encoding` feature, any
//! `encoding_rs` label.

use bytes::{Buf, BytesMut};
#[cfg(feature = "encoding")]
use encoding::Encoding;
use tokio_util::codec::{Decoder, Encoder};
use tracing::{debug, trace};

use crate::error::ProtocolError;

/// Longest accepted line: a 512-byte message plus an 8191-byte tag section.
pub const MAX_LINE_LEN: usize = 512 + 8191;

/// CR/LF line codec.
#[derive(Debug)]
pub struct LineCodec {
    #[cfg(feature = "encoding")]
    encoding: &'static Encoding,
    /// Index of next byte to check for newline
    next_index: usize,
    max_len: usize,
    /// Set while the rest of an over-long line is being thrown away.
    skipping: bool,
}

impl Default for LineCodec {
    fn default() -> Self {
        LineCodec {
            #[cfg(feature = "encoding")]
            encoding: encoding::UTF_8,
            next_index: 0,
            max_len: MAX_LINE_LEN,
            skipping: false,
        }
    }
}

impl LineCodec {
    /// A UTF-8 codec with the default length limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// A codec for the given encoding label (e.g. `"iso-8859-1"`).
    #[cfg(feature = "encoding")]
    pub fn with_encoding(label: &str) -> Result<Self, ProtocolError> {
        let encoding = Encoding::for_label(label.as_bytes()).ok_or_else(|| {
            ProtocolError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("unknown encoding: {}", label),
            ))
        })?;
        Ok(LineCodec {
            encoding,
            ..Self::default()
        })
    }

    /// Change the maximum line length, terminator included.
    #[must_use]
    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len;
        self
    }

    /// Prepare an outgoing line: cut at the first line break and reject NUL.
    ///
    /// The result has no terminator.
    pub fn sanitize(line: &str) -> Result<&str, ProtocolError> {
        let line = match line.find(['\r', '\n']) {
            Some(end) => &line[..end],
            None => line,
        };
        match line.find('\0') {
            Some(_) => Err(ProtocolError::IllegalControlChar('\0')),
            None => Ok(line),
        }
    }

    fn decode_bytes(&self, line: &[u8]) -> String {
        #[cfg(feature = "encoding")]
        {
            let (text, _, _) = self.encoding.decode(line);
            text.into_owned()
        }
        #[cfg(not(feature = "encoding"))]
        {
            String::from_utf8_lossy(line).into_owned()
        }
    }

    fn decode_line(&self, line: &[u8]) -> Result<String, ProtocolError> {
        if line.len() > self.max_len {
            return Err(ProtocolError::MessageTooLong {
                actual: line.len(),
                limit: self.max_len,
            });
        }
        let mut data = self.decode_bytes(line);
        let trimmed = data.trim_end_matches(['\r', '\n']).len();
        data.truncate(trimmed);
        if data.contains('\0') {
            return Err(ProtocolError::IllegalControlChar('\0'));
        }
        Ok(data)
    }
}

/// Frames are lines or the fault that made the codec drop one.
///
/// Invalid byte sequences are decoded lossily. A line that is too long or
/// contains NUL is skipped up to the next `\n` and yielded as an inner
/// error; the outer error is left to the underlying stream.
impl Decoder for LineCodec {
    type Item = Result<String, ProtocolError>;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, ProtocolError> {
        loop {
            let newline = src[self.next_index..]
                .iter()
                .position(|b| *b == b'\n')
                .map(|offset| self.next_index + offset);

            match (self.skipping, newline) {
                (true, Some(end)) => {
                    trace!(bytes = end + 1, "skipped tail of over-long line");
                    src.advance(end + 1);
                    self.next_index = 0;
                    self.skipping = false;
                }
                (true, None) => {
                    src.clear();
                    self.next_index = 0;
                    return Ok(None);
                }
                (false, Some(end)) => {
                    let line = src.split_to(end + 1);
                    self.next_index = 0;
                    return Ok(Some(self.decode_line(&line)));
                }
                (false, None) if src.len() > self.max_len => {
                    let actual = src.len();
                    src.clear();
                    self.next_index = 0;
                    self.skipping = true;
                    return Ok(Some(Err(ProtocolError::MessageTooLong {
                        actual,
                        limit: self.max_len,
                    })));
                }
                (false, None) => {
                    self.next_index = src.len();
                    return Ok(None);
                }
            }
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, ProtocolError> {
        if let Some(frame) = self.decode(src)? {
            return Ok(Some(frame));
        }
        if !src.is_empty() {
            debug!(bytes = src.len(), "unterminated line at end of stream");
            src.clear();
            self.next_index = 0;
        }
        Ok(None)
    }
}

impl Encoder<String> for LineCodec {
    type Error = ProtocolError;

    fn encode(&mut self, line: String, dst: &mut BytesMut) -> Result<(), ProtocolError> {
        let line = Self::sanitize(&line)?;

        #[cfg(feature = "encoding")]
        {
            let (bytes, _, _) = self.encoding.encode(line);
            dst.extend_from_slice(&bytes);
        }
        #[cfg(not(feature = "encoding"))]
        {
            dst.extend_from_slice(line.as_bytes());
        }

        dst.extend_from_slice(b"\r\n");
        Ok(())
    }
}
