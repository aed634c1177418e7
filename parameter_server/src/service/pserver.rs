use comms::msg::{Command, GradientMsg, Request, Response};
use log::{debug, info, warn};
use tokio::sync::mpsc;

use super::Exchange;
use crate::{error::Result, optimization::Optimizer, storage::ParameterStore};

/// How many leading and trailing elements of a vector get logged.
const PREVIEW_LEN: usize = 3;

/// The central server structure, it owns the parameter store and answers every request.
///
/// Requests are handled one at a time, to completion, which is what serializes every
/// mutation of the weights. No locking is involved.
pub struct ParameterServer<O: Optimizer> {
    store: ParameterStore<O>,
}

impl<O: Optimizer> ParameterServer<O> {
    /// Creates a new `ParameterServer`.
    ///
    /// # Arguments
    /// * `store` - The parameter store to serve.
    pub fn new(store: ParameterStore<O>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &ParameterStore<O> {
        &self.store
    }

    /// Handles a single request frame.
    ///
    /// Malformed frames and rejected gradients don't fail, they're answered with
    /// `Response::Err` so the caller can keep on serving.
    ///
    /// # Arguments
    /// * `frame` - The raw request frame.
    ///
    /// # Returns
    /// The response to send back to the worker.
    pub fn handle(&mut self, frame: &[u8]) -> Response {
        self.try_handle(frame).unwrap_or_else(|e| {
            warn!(len = frame.len(); "failed to handle request: {e}");
            Response::Err(e.to_string())
        })
    }

    fn try_handle(&mut self, frame: &[u8]) -> Result<Response> {
        let req = Request::decode(frame)?;

        info!(
            worker_id = req.worker_id(),
            msgtype = req.msgtype(),
            len = frame.len();
            "got msg"
        );

        match req {
            Request::Gradients(msg) => self.apply(msg),
            Request::Other { .. } => Ok(Response::Ack),
        }
    }

    fn apply(&mut self, msg: GradientMsg) -> Result<Response> {
        let GradientMsg {
            worker_id,
            epoch,
            gradient,
        } = msg;

        debug!(
            worker_id = worker_id.as_str(),
            epoch = epoch;
            "got grads[{}] {}", gradient.len(), preview(&gradient)
        );

        self.store.apply_gradient(&gradient)?;

        let command = if self.store.decide_stop(epoch) {
            Command::Stop
        } else {
            Command::Continue
        };

        let weights = self.store.snapshot().to_vec();

        debug!(
            worker_id = worker_id.as_str(),
            epoch = epoch;
            "sent {command} wgts[{}] {}", weights.len(), preview(&weights)
        );

        Ok(Response::Weights { command, weights })
    }

    /// Runs the serving loop, handling the exchanges in the order they're received.
    ///
    /// # Arguments
    /// * `exchanges` - The queue every connection forwards it's requests to.
    ///
    /// # Returns
    /// The parameter store, once every sending end of `exchanges` is gone.
    pub async fn run(mut self, mut exchanges: mpsc::Receiver<Exchange>) -> ParameterStore<O> {
        while let Some(Exchange { frame, reply }) = exchanges.recv().await {
            let res = self.handle(&frame);

            let mut buf = Vec::new();
            res.encode(&mut buf);

            if reply.send(buf).is_err() {
                debug!("connection dropped before receiving it's reply");
            }
        }

        info!("every connection is gone, stopping");
        self.store
    }
}

/// Renders the first and last few elements of `nums`.
fn preview(nums: &[f32]) -> String {
    let head = &nums[..nums.len().min(PREVIEW_LEN)];
    let tail = &nums[nums.len().saturating_sub(PREVIEW_LEN)..];
    format!("{head:?} ... {tail:?}")
}

#[cfg(test)]
mod tests {
    use comms::{
        DecodeError,
        frame::{self, Value},
        msg::GRADIENTS,
    };

    use super::*;
    use crate::{error::ServerErr, optimization::Accumulate, storage::StoreErr};

    const EPSILON: f32 = 1e-5;

    fn create_test_server() -> ParameterServer<Accumulate> {
        ParameterServer::new(ParameterStore::new(Accumulate::default(), 10))
    }

    fn gradients(epoch: u64, gradient: &[f32]) -> Vec<u8> {
        let req = Request::Gradients(GradientMsg {
            worker_id: "strongman".into(),
            epoch,
            gradient: gradient.to_vec(),
        });

        let mut buf = Vec::new();
        req.encode(&mut buf);
        buf
    }

    fn other(msgtype: &str) -> Vec<u8> {
        let req = Request::Other {
            worker_id: "strongman".into(),
            msgtype: msgtype.into(),
        };

        let mut buf = Vec::new();
        req.encode(&mut buf);
        buf
    }

    fn assert_weights(res: Response, command: Command, expected: &[f32]) {
        let Response::Weights { command: got, weights } = res else {
            panic!("unexpected response: {res:?}");
        };

        assert_eq!(got, command);
        assert_eq!(weights.len(), expected.len());

        for (w, e) in weights.iter().zip(expected) {
            assert!((w - e).abs() < EPSILON, "{w} != {e}");
        }
    }

    #[test]
    fn test_first_gradient_continues() {
        let mut server = create_test_server();

        let res = server.handle(&gradients(1, &[1.0, 1.0, 1.0]));
        assert_weights(res, Command::Continue, &[1.01, 1.01, 1.01]);
    }

    #[test]
    fn test_max_epoch_stops() {
        let mut server = create_test_server();
        server.handle(&gradients(1, &[1.0, 1.0, 1.0]));

        let res = server.handle(&gradients(10, &[0.0, 0.0, 0.0]));
        assert_weights(res, Command::Stop, &[1.02, 1.02, 1.02]);
    }

    #[test]
    fn test_other_message_types_are_acknowledged() {
        let mut server = create_test_server();
        server.handle(&gradients(1, &[1.0, 1.0, 1.0]));
        let before = server.store().snapshot().to_vec();

        assert_eq!(server.handle(&other("PING")), Response::Ack);
        assert_eq!(server.handle(&other("gradients")), Response::Ack);
        assert_eq!(server.store().snapshot(), before);
    }

    #[test]
    fn test_other_message_before_any_gradient_leaves_store_uninitialized() {
        let mut server = create_test_server();

        assert_eq!(server.handle(&other("HELLO")), Response::Ack);
        assert!(!server.store().is_initialized());
    }

    #[test]
    fn test_dimension_mismatch_is_answered_with_error() {
        let mut server = create_test_server();
        server.handle(&gradients(1, &[1.0, 1.0, 1.0]));

        let res = server.handle(&gradients(2, &[1.0, 1.0]));
        let err = ServerErr::Store(StoreErr::DimensionMismatch { expected: 3, got: 2 });
        assert_eq!(res, Response::Err(err.to_string()));

        let res = server.handle(&gradients(2, &[0.0, 0.0, 0.0]));
        assert_weights(res, Command::Continue, &[1.02, 1.02, 1.02]);
    }

    #[test]
    fn test_malformed_frame_is_answered_with_error() {
        let mut server = create_test_server();

        let truncated = frame::encode(&[Value::from("w"), Value::from(GRADIENTS), Value::Int(1)]);
        let res = server.handle(&truncated);
        let err = ServerErr::Decode(DecodeError::Exhausted { index: 3 });
        assert_eq!(res, Response::Err(err.to_string()));

        assert!(matches!(server.handle(&[0xc1]), Response::Err(_)));
        assert!(matches!(server.handle(&[]), Response::Err(_)));
        assert!(!server.store().is_initialized());
    }

    #[test]
    fn test_preview_truncates_long_vectors() {
        assert_eq!(preview(&[1.0, 2.0]), "[1.0, 2.0] ... [1.0, 2.0]");
        assert_eq!(
            preview(&[1.0, 2.0, 3.0, 4.0, 5.0]),
            "[1.0, 2.0, 3.0] ... [3.0, 4.0, 5.0]"
        );
        assert_eq!(preview(&[]), "[] ... []");
    }
}
