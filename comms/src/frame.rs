//! Frame codec: an ordered sequence of typed values, each one serialized on it's own as a
//! MessagePack object and concatenated into a single buffer with no outer envelope.

use std::fmt;

use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{self, Visitor},
};

use crate::error::{DecodeError, Result};

/// Size in bytes of every element of a float blob.
const F32_SIZE: usize = size_of::<f32>();

/// A single value inside a frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Nil,
    Bool(bool),
    Int(i64),
    F32(f32),
    F64(f64),
    Str(String),
    Bin(Vec<u8>),
}

impl Value {
    /// Builds a binary blob holding `nums` as little-endian `f32`s.
    pub fn from_f32s(nums: &[f32]) -> Self {
        Self::Bin(f32s_to_bytes(nums))
    }

    /// The name of this value's kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::F32(_) => "f32",
            Value::F64(_) => "f64",
            Value::Str(_) => "str",
            Value::Bin(_) => "bin",
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Nil => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::F32(x) => serializer.serialize_f32(*x),
            Value::F64(x) => serializer.serialize_f64(*x),
            Value::Str(s) => serializer.serialize_str(s),
            Value::Bin(bytes) => serializer.serialize_bytes(bytes),
        }
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a nil, bool, integer, float, string or binary value")
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<Value, E> {
        Ok(Value::Nil)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Value, E> {
        Ok(Value::Int(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Value, E> {
        i64::try_from(v)
            .map(Value::Int)
            .map_err(|_| E::invalid_value(de::Unexpected::Unsigned(v), &"an integer below 2^63"))
    }

    fn visit_f32<E: de::Error>(self, v: f32) -> std::result::Result<Value, E> {
        Ok(Value::F32(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Value, E> {
        Ok(Value::F64(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Value, E> {
        Ok(Value::Str(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<Value, E> {
        Ok(Value::Str(v))
    }

    fn visit_bytes<E: de::Error>(self, v: &[u8]) -> std::result::Result<Value, E> {
        Ok(Value::Bin(v.to_vec()))
    }

    fn visit_byte_buf<E: de::Error>(self, v: Vec<u8>) -> std::result::Result<Value, E> {
        Ok(Value::Bin(v))
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

/// Serializes every value in order into a new buffer.
pub fn encode(values: &[Value]) -> Vec<u8> {
    let mut buf = Vec::new();
    encode_into(values, &mut buf);
    buf
}

/// Serializes every value in order, appending them to `buf`.
pub fn encode_into(values: &[Value], buf: &mut Vec<u8>) {
    for value in values {
        // SAFETY: Writing into a `Vec` can't fail and every `Value`
        //         variant maps onto a plain MessagePack type.
        rmp_serde::encode::write(buf, value).unwrap();
    }
}

/// Creates a forward-only cursor over the values of `buf`.
pub fn decode(buf: &[u8]) -> Cursor<'_> {
    Cursor { rest: buf, index: 0 }
}

/// Reads the values of a frame one at a time, in the order they were written.
#[derive(Debug)]
pub struct Cursor<'a> {
    rest: &'a [u8],
    index: usize,
}

impl Cursor<'_> {
    /// Pulls the next value out of the frame.
    ///
    /// # Returns
    /// The value, `DecodeError::Exhausted` past the end of the frame or
    /// `DecodeError::Malformed` if the bytes don't form a value.
    pub fn next(&mut self) -> Result<Value> {
        let index = self.index;

        if self.rest.is_empty() {
            return Err(DecodeError::Exhausted { index });
        }

        let mut de = rmp_serde::Deserializer::new(&mut self.rest);
        let value = Value::deserialize(&mut de).map_err(|e| DecodeError::Malformed {
            index,
            reason: e.to_string(),
        })?;

        self.index += 1;
        Ok(value)
    }

    /// Pulls the next value and expects it to be a string.
    ///
    /// # Arguments
    /// * `field` - The name of the field being read, for error reporting.
    pub fn next_str(&mut self, field: &'static str) -> Result<String> {
        match self.next()? {
            Value::Str(s) => Ok(s),
            other => Self::unexpected(field, "str", &other),
        }
    }

    /// Pulls the next value as text, accepting either a string or a UTF-8 binary blob.
    ///
    /// # Arguments
    /// * `field` - The name of the field being read, for error reporting.
    pub fn next_text(&mut self, field: &'static str) -> Result<String> {
        match self.next()? {
            Value::Str(s) => Ok(s),
            Value::Bin(bytes) => {
                String::from_utf8(bytes).map_err(|e| DecodeError::InvalidField {
                    field,
                    reason: e.to_string(),
                })
            }
            other => Self::unexpected(field, "str", &other),
        }
    }

    /// Pulls the next value and expects it to be an integer.
    ///
    /// # Arguments
    /// * `field` - The name of the field being read, for error reporting.
    pub fn next_int(&mut self, field: &'static str) -> Result<i64> {
        match self.next()? {
            Value::Int(i) => Ok(i),
            other => Self::unexpected(field, "int", &other),
        }
    }

    /// Pulls the next value and expects it to be a binary blob.
    ///
    /// # Arguments
    /// * `field` - The name of the field being read, for error reporting.
    pub fn next_bin(&mut self, field: &'static str) -> Result<Vec<u8>> {
        match self.next()? {
            Value::Bin(bytes) => Ok(bytes),
            other => Self::unexpected(field, "bin", &other),
        }
    }

    /// Pulls the next value and expects it to be a blob of little-endian `f32`s.
    ///
    /// # Arguments
    /// * `field` - The name of the field being read, for error reporting.
    pub fn next_f32s(&mut self, field: &'static str) -> Result<Vec<f32>> {
        let bytes = self.next_bin(field)?;
        bytes_to_f32s(&bytes).ok_or_else(|| DecodeError::InvalidField {
            field,
            reason: format!("blob of {} bytes is not a multiple of {F32_SIZE}", bytes.len()),
        })
    }

    /// Whether every value of the frame has been read.
    pub fn is_empty(&self) -> bool {
        self.rest.is_empty()
    }

    /// Asserts that the whole frame was consumed.
    pub fn finish(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(DecodeError::TrailingValues {
                expected: self.index,
            })
        }
    }

    fn unexpected<T>(field: &'static str, expected: &'static str, got: &Value) -> Result<T> {
        Err(DecodeError::UnexpectedType {
            field,
            expected,
            got: got.kind(),
        })
    }
}

/// Lays `nums` out as little-endian bytes.
pub fn f32s_to_bytes(nums: &[f32]) -> Vec<u8> {
    nums.iter().flat_map(|x| x.to_le_bytes()).collect()
}

/// Reads little-endian `f32`s out of `bytes`, `None` if the length isn't a multiple of 4.
pub fn bytes_to_f32s(bytes: &[u8]) -> Option<Vec<f32>> {
    if bytes.len() % F32_SIZE != 0 {
        return None;
    }

    let nums = bytes
        .chunks_exact(F32_SIZE)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect();

    Some(nums)
}
