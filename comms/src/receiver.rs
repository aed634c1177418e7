use std::io;

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::{LEN_TYPE_SIZE, LenType, MAX_FRAME_LEN};

/// The receiving end handle of the communication.
pub struct OnoReceiver<R: AsyncRead + Unpin> {
    rx: R,
}

impl<R: AsyncRead + Unpin> OnoReceiver<R> {
    /// Creates a new `OnoReceiver` instance.
    ///
    /// # Arguments
    /// * `rx` - The underlying reader.
    pub(super) fn new(rx: R) -> Self {
        Self { rx }
    }

    /// Waits to receive a whole frame from the inner reader.
    ///
    /// # Arguments
    /// * `buf` - Where the frame will be written to, it's resized to fit it exactly.
    ///
    /// # Returns
    /// A result object that returns `io::Error` on failure. `UnexpectedEof` means the
    /// peer went away between frames, `InvalidData` that it went away halfway through
    /// one or sent a frame over the size limit.
    pub async fn recv_into(&mut self, buf: &mut Vec<u8>) -> io::Result<()> {
        let mut size_buf = [0; LEN_TYPE_SIZE];

        let n = self.rx.read(&mut size_buf).await?;
        if n == 0 {
            return Err(io::ErrorKind::UnexpectedEof.into());
        }

        self.rx
            .read_exact(&mut size_buf[n..])
            .await
            .map_err(truncated)?;

        let len = LenType::from_be_bytes(size_buf);

        if len > MAX_FRAME_LEN {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("frame of {len} bytes exceeds the limit of {MAX_FRAME_LEN} bytes"),
            ));
        }

        buf.clear();
        buf.resize(len as usize, 0);
        self.rx.read_exact(buf).await.map_err(truncated)?;
        Ok(())
    }
}

fn truncated(e: io::Error) -> io::Error {
    if e.kind() != io::ErrorKind::UnexpectedEof {
        return e;
    }

    io::Error::new(io::ErrorKind::InvalidData, "peer disconnected mid frame")
}
