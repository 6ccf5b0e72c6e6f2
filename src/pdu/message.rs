//! Polymorphic message values
//!
//! Messages arrive on a block's message port as a small tree of values. A PDU
//! is the pair `(metadata, payload)`, where metadata is a dict (or nil) and the
//! payload is a byte vector.

use serde::{Deserialize, Serialize};

use crate::domain::{OqpskError, OqpskResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Pmt {
    Nil,
    Bool(bool),
    Int(i64),
    Symbol(String),
    U8Vector(Vec<u8>),
    F32Vector(Vec<f32>),
    Dict(Vec<(String, Pmt)>),
    Pair(Box<Pmt>, Box<Pmt>),
}

impl Pmt {
    /// Build a PDU message from metadata and payload
    pub fn pdu(metadata: Pmt, payload: Vec<u8>) -> Self {
        Pmt::Pair(Box::new(metadata), Box::new(Pmt::U8Vector(payload)))
    }

    /// PDU with no metadata
    pub fn blob(payload: Vec<u8>) -> Self {
        Self::pdu(Pmt::Nil, payload)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Pmt::Nil => "nil",
            Pmt::Bool(_) => "bool",
            Pmt::Int(_) => "int",
            Pmt::Symbol(_) => "symbol",
            Pmt::U8Vector(_) => "u8vector",
            Pmt::F32Vector(_) => "f32vector",
            Pmt::Dict(_) => "dict",
            Pmt::Pair(..) => "pair",
        }
    }

    /// Look up `key` in a dict
    pub fn dict_get(&self, key: &str) -> Option<&Pmt> {
        match self {
            Pmt::Dict(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Split a PDU message into its payload bytes, checking its shape
    pub fn into_pdu_payload(self) -> OqpskResult<Vec<u8>> {
        let (metadata, payload) = match self {
            Pmt::Pair(metadata, payload) => (metadata, payload),
            other => {
                return Err(OqpskError::Message(format!(
                    "expected a (metadata, payload) pair, got {}",
                    other.kind()
                )))
            }
        };
        if !matches!(*metadata, Pmt::Nil | Pmt::Dict(_)) {
            return Err(OqpskError::Message(format!(
                "PDU metadata must be a dict or nil, got {}",
                metadata.kind()
            )));
        }
        match *payload {
            Pmt::U8Vector(bytes) => Ok(bytes),
            other => Err(OqpskError::Message(format!(
                "PDU payload must be a u8vector, got {}",
                other.kind()
            ))),
        }
    }
}
