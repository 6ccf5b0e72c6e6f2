//! Core domain types
//!
//! Pure types shared by the modulator and the PDU converter. Nothing in here
//! touches a clock, a thread or the filesystem.

use num_complex::Complex32;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Complex baseband sample (f32 I, f32 Q)
pub type IqSample = Complex32;

/// Byte written to the converter output while no PDU data is available.
/// Downstream framers rely on this exact value.
pub const PADDING_BYTE: u8 = 1;

/// Typed value carried by a stream tag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TagValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
}

impl TagValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            TagValue::Int(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagValue::Int(v) => write!(f, "{v}"),
            TagValue::Float(v) => write!(f, "{v:.6}"),
            TagValue::Bool(v) => write!(f, "{v}"),
            TagValue::Str(v) => write!(f, "\"{v}\""),
        }
    }
}

/// Out-of-band annotation attached to an absolute item offset of a stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamTag {
    /// Absolute item offset (counted from the first item the block ever wrote)
    pub offset: u64,
    pub key: String,
    pub value: TagValue,
}

impl StreamTag {
    pub fn new(offset: u64, key: impl Into<String>, value: TagValue) -> Self {
        Self {
            offset,
            key: key.into(),
            value,
        }
    }
}

/// A received PDU payload. Immutable once queued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pdu {
    data: Vec<u8>,
}

impl Pdu {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Outcome of one `general_work` call: items taken from the input and items
/// written to the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WorkStatus {
    pub consumed: usize,
    pub produced: usize,
}

impl WorkStatus {
    pub fn new(consumed: usize, produced: usize) -> Self {
        Self { consumed, produced }
    }
}
