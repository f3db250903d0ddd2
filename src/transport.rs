//! Line transport over any async byte stream.

use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::debug;

use crate::error::ProtocolError;
use crate::line::LineCodec;

type BoxedRead = Box<dyn AsyncRead + Send + Unpin>;
type BoxedWrite = Box<dyn AsyncWrite + Send + Unpin>;

/// A framed, bidirectional line stream.
///
/// The client splits it into a [`LineReader`] owned by the receive loop and
/// a [`LineWriter`] shared by all senders.
pub struct Transport {
    reader: LineReader,
    writer: LineWriter,
}

impl Transport {
    /// Open a plaintext TCP connection.
    pub async fn connect(host: &str, port: u16) -> Result<Self, ProtocolError> {
        let stream = TcpStream::connect((host, port)).await?;
        if let Err(e) = stream.set_nodelay(true) {
            debug!(error = %e, "failed to set TCP_NODELAY");
        }
        let (read, write) = stream.into_split();
        Ok(Self::from_halves(Box::new(read), Box::new(write)))
    }

    /// Wrap an already open stream, e.g. a TLS session or an in-memory pipe.
    pub fn from_stream<S>(stream: S) -> Self
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        let (read, write) = tokio::io::split(stream);
        Self::from_halves(Box::new(read), Box::new(write))
    }

    fn from_halves(read: BoxedRead, write: BoxedWrite) -> Self {
        Transport {
            reader: LineReader {
                framed: FramedRead::new(read, LineCodec::new()),
            },
            writer: LineWriter {
                framed: FramedWrite::new(write, LineCodec::new()),
            },
        }
    }

    /// Separate the read and write halves.
    pub fn into_split(self) -> (LineReader, LineWriter) {
        (self.reader, self.writer)
    }
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport").finish_non_exhaustive()
    }
}

/// Read half of a [`Transport`].
pub struct LineReader {
    framed: FramedRead<BoxedRead, LineCodec>,
}

impl LineReader {
    /// The next line without terminator, or `None` at end of stream.
    ///
    /// Errors for which [`ProtocolError::is_line_fault`] holds cover a
    /// single dropped line; reading may continue after them.
    pub async fn read_line(&mut self) -> Result<Option<String>, ProtocolError> {
        match self.framed.next().await {
            Some(frame) => frame?.map(Some),
            None => Ok(None),
        }
    }
}

/// Write half of a [`Transport`].
pub struct LineWriter {
    framed: FramedWrite<BoxedWrite, LineCodec>,
}

impl LineWriter {
    /// Write one line; the terminator is appended.
    pub async fn write_line(&mut self, line: &str) -> Result<(), ProtocolError> {
        self.framed.send(line.to_owned()).await
    }

    /// Flush and shut down the write side.
    pub async fn close(&mut self) -> Result<(), ProtocolError> {
        SinkExt::<String>::close(&mut self.framed).await
    }
}
