use std::{io, net::SocketAddr};

use log::{debug, info, warn};
use tokio::{net::TcpListener, sync::mpsc, task::JoinSet};

use super::{ParameterServer, serve_connection};
use crate::{
    config::ServerConfig,
    error::Result,
    optimization::{Accumulate, Optimizer},
};

/// How many requests may wait for the serving loop at once.
const QUEUE_SIZE: usize = 64;

/// A parameter server bound to it's endpoint, ready to accept workers.
pub struct Service<O: Optimizer> {
    listener: TcpListener,
    server: ParameterServer<O>,
}

impl Service<Accumulate> {
    /// Binds the endpoint in `cfg` and builds the parameter store it describes.
    ///
    /// # Returns
    /// A `ServerErr::Transport` if the endpoint can't be bound.
    pub async fn bind(cfg: &ServerConfig) -> Result<Self> {
        let listener = TcpListener::bind(cfg.endpoint.bind_addr()).await?;
        info!("parameter server is up now at {}", cfg.endpoint);

        Ok(Self::new(listener, ParameterServer::new(cfg.store())))
    }
}

impl<O: Optimizer> Service<O> {
    /// Creates a new `Service` out of an already bound listener.
    pub fn new(listener: TcpListener, server: ParameterServer<O>) -> Self {
        Self { listener, server }
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts workers for as long as the serving loop runs.
    ///
    /// Each worker gets it's own connection task, while every request is handled by a
    /// single serving loop that owns the parameter store. Failing to accept a connection
    /// is logged and doesn't stop the service.
    pub async fn run(self) -> io::Result<()> {
        let Self { listener, server } = self;
        let (exchanges, queue) = mpsc::channel(QUEUE_SIZE);
        let mut connections = JoinSet::new();

        let serving = server.run(queue);
        tokio::pin!(serving);

        loop {
            tokio::select! {
                accepted = listener.accept() => {
                    if let Some((stream, addr)) = connected(accepted) {
                        let (rx, tx) = stream.into_split();
                        let (rx, tx) = comms::channel(rx, tx);
                        let exchanges = exchanges.clone();

                        connections.spawn(async move {
                            (addr, serve_connection(rx, tx, exchanges).await)
                        });
                    }
                }
                Some(joined) = connections.join_next() => match joined {
                    Ok((addr, Ok(()))) => debug!("connection from {addr} closed"),
                    Ok((addr, Err(e))) => debug!("connection from {addr} dropped: {e}"),
                    Err(e) => warn!("connection task failed: {e}"),
                },
                // Only ends once every sender is gone, which can't happen while `exchanges` lives.
                _ = &mut serving => return Ok(()),
            }
        }
    }
}

/// Unwraps the outcome of an `accept`, logging it either way.
///
/// # Returns
/// The new stream and it's peer address, `None` if the accept failed.
fn connected<S>(accepted: io::Result<(S, SocketAddr)>) -> Option<(S, SocketAddr)> {
    match accepted {
        Ok((stream, addr)) => {
            info!("worker connected from {addr}");
            Some((stream, addr))
        }
        Err(e) => {
            warn!("failed to accept connection: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_accept_is_skipped() {
        let accepted: io::Result<((), SocketAddr)> =
            Err(io::Error::other("too many open files"));

        assert!(connected(accepted).is_none());
    }

    #[test]
    fn test_successful_accept_is_kept() {
        let addr: SocketAddr = ([127, 0, 0, 1], 8888).into();

        assert_eq!(connected(Ok(((), addr))), Some(((), addr)));
    }
}
