use std::fmt::{self, Display};

use crate::{
    error::{DecodeError, Result},
    frame::{self, Value},
};

/// The message type tag of a gradient update.
pub const GRADIENTS: &str = "GRADIENTS";

/// The literal payload used to acknowledge any non gradient request.
pub const ACK: &[u8] = b"ACK";

const ERROR: &str = "ERROR";

/// A gradient update sent by a worker.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientMsg {
    pub worker_id: String,
    pub epoch: u64,
    pub gradient: Vec<f32>,
}

/// An inbound request, decoded following the schema of it's message type.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Gradients(GradientMsg),
    Other { worker_id: String, msgtype: String },
}

impl Request {
    /// Decodes a request frame.
    ///
    /// `GRADIENTS` frames must hold exactly `(worker_id, msgtype, epoch, gradient)`,
    /// every other message type only needs `(worker_id, msgtype)` and the rest is ignored.
    /// Both `worker_id` and `msgtype` may come as strings or as UTF-8 blobs.
    ///
    /// # Arguments
    /// * `buf` - The whole request frame.
    ///
    /// # Returns
    /// The decoded request or the `DecodeError` found on the first bad field.
    pub fn decode(buf: &[u8]) -> Result<Self> {
        let mut cursor = frame::decode(buf);
        let worker_id = cursor.next_text("worker_id")?;
        let msgtype = cursor.next_text("msgtype")?;

        if msgtype != GRADIENTS {
            return Ok(Self::Other { worker_id, msgtype });
        }

        let epoch = cursor.next_int("epoch")?;
        let epoch = u64::try_from(epoch).map_err(|_| DecodeError::InvalidField {
            field: "epoch",
            reason: format!("{epoch} is negative"),
        })?;

        let gradient = cursor.next_f32s("gradient")?;
        cursor.finish()?;

        Ok(Self::Gradients(GradientMsg {
            worker_id,
            epoch,
            gradient,
        }))
    }

    /// Encodes this request, appending it to `buf`.
    pub fn encode(&self, buf: &mut Vec<u8>) {
        let values = match self {
            Request::Gradients(msg) => vec![
                Value::from(msg.worker_id.as_str()),
                Value::from(GRADIENTS),
                // Epochs past `i64::MAX` are not representable on the wire.
                Value::Int(msg.epoch.min(i64::MAX as u64) as i64),
                Value::from_f32s(&msg.gradient),
            ],
            Request::Other { worker_id, msgtype } => {
                vec![Value::from(worker_id.as_str()), Value::from(msgtype.as_str())]
            }
        };

        frame::encode_into(&values, buf);
    }

    /// The id of the worker that sent this request.
    pub fn worker_id(&self) -> &str {
        match self {
            Request::Gradients(msg) => &msg.worker_id,
            Request::Other { worker_id, .. } => worker_id,
        }
    }

    /// The message type tag of this request.
    pub fn msgtype(&self) -> &str {
        match self {
            Request::Gradients(_) => GRADIENTS,
            Request::Other { msgtype, .. } => msgtype,
        }
    }
}

/// Tells a worker whether it should keep on training.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Continue,
    Stop,
}

impl Command {
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Continue => "CONTINUE",
            Command::Stop => "STOP",
        }
    }
}

impl Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The reply to a single request.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Weights { command: Command, weights: Vec<f32> },
    Ack,
    Err(String),
}

impl Response {
    /// Encodes this response, appending it to `buf`.
    ///
    /// `Ack` is written as the raw `ACK` bytes, not as a frame value.
    pub fn encode(&self, buf: &mut Vec<u8>) {
        match self {
            Response::Weights { command, weights } => {
                let values = [Value::from(command.as_str()), Value::from_f32s(weights)];
                frame::encode_into(&values, buf);
            }
            Response::Ack => buf.extend_from_slice(ACK),
            Response::Err(detail) => {
                let values = [Value::from(ERROR), Value::from(detail.as_str())];
                frame::encode_into(&values, buf);
            }
        }
    }

    /// Decodes a response frame.
    ///
    /// # Arguments
    /// * `buf` - The whole response frame.
    pub fn decode(buf: &[u8]) -> Result<Self> {
        if buf == ACK {
            return Ok(Self::Ack);
        }

        let mut cursor = frame::decode(buf);
        let command = match cursor.next_str("command")?.as_str() {
            "CONTINUE" => Command::Continue,
            "STOP" => Command::Stop,
            ERROR => {
                let detail = cursor.next_str("detail")?;
                cursor.finish()?;
                return Ok(Self::Err(detail));
            }
            other => {
                return Err(DecodeError::InvalidField {
                    field: "command",
                    reason: format!("unknown command {other:?}"),
                });
            }
        };

        let weights = cursor.next_f32s("weights")?;
        cursor.finish()?;

        Ok(Self::Weights { command, weights })
    }
}
