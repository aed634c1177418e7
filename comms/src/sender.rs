//! The sending end of the transport, every frame is preceded by it's length.

use std::io;

use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::LenType;

/// The sending end handle of the communication.
pub struct OnoSender<W>
where
    W: AsyncWrite + Unpin,
{
    tx: W,
}

impl<W: AsyncWrite + Unpin> OnoSender<W> {
    /// Creates a new `OnoSender` instance.
    ///
    /// # Arguments
    /// * `tx` - The underlying writer.
    pub(super) fn new(tx: W) -> Self {
        Self { tx }
    }

    /// Sends a whole frame through the inner writer.
    ///
    /// # Arguments
    /// * `frame` - The encoded frame.
    ///
    /// # Returns
    /// A result object that returns `io::Error` on failure.
    pub async fn send(&mut self, frame: &[u8]) -> io::Result<()> {
        let header = (frame.len() as LenType).to_be_bytes();

        self.tx.write_all(&header).await?;
        self.tx.write_all(frame).await?;
        self.tx.flush().await
    }
}
