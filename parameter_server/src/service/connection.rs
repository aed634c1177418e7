use std::{io, mem};

use comms::{OnoReceiver, OnoSender};
use log::{debug, warn};
use tokio::{
    io::{AsyncRead, AsyncWrite},
    sync::{mpsc, oneshot},
};

/// A request frame on it's way to the serving loop, together with the way back for it's reply.
#[derive(Debug)]
pub struct Exchange {
    pub frame: Vec<u8>,
    pub reply: oneshot::Sender<Vec<u8>>,
}

/// Serves a single worker connection with strict request-reply alternation.
///
/// Every received frame is forwarded to the serving loop and the next one isn't read
/// until it's reply has been sent back.
///
/// # Arguments
/// * `rx` - The receiving end of the communication.
/// * `tx` - The sending end of the communication.
/// * `exchanges` - The serving loop's queue.
///
/// # Returns
/// `Ok` once the worker disconnects between requests, `io::Error` on any other failure,
/// a disconnect halfway through a request included.
pub async fn serve_connection<R, W>(
    mut rx: OnoReceiver<R>,
    mut tx: OnoSender<W>,
    exchanges: mpsc::Sender<Exchange>,
) -> io::Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut frame = Vec::new();

    loop {
        match rx.recv_into(&mut frame).await {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                debug!("worker disconnected");
                return Ok(());
            }
            Err(e) => {
                warn!("failed to receive request: {e}");
                return Err(e);
            }
        }

        let (reply_tx, reply_rx) = oneshot::channel();
        let exchange = Exchange {
            frame: mem::take(&mut frame),
            reply: reply_tx,
        };

        exchanges.send(exchange).await.map_err(|_| server_stopped())?;
        let reply = reply_rx.await.map_err(|_| server_stopped())?;
        tx.send(&reply).await?;
    }
}

fn server_stopped() -> io::Error {
    io::Error::new(
        io::ErrorKind::BrokenPipe,
        "the parameter server stopped serving requests",
    )
}
