//! Simple OQPSK transmit blocks
//!
//! Two streaming transforms for a software-defined-radio TX chain:
//!
//! - `OqpskModulator`: bytes → RRC-shaped offset-QPSK complex baseband
//! - `PduToConStream`: asynchronous PDU messages → continuous, wall-clock
//!   paced byte stream with a length tag on the first byte of every PDU
//!
//! ## Architecture (Hexagonal / Ports & Adapters)
//!
//! - `domain/` - Parameters, errors, samples, PDUs and tags (no I/O)
//! - `ports/` - Traits the host runtime plugs into (work calls, tags, time)
//! - `dsp/` - Signal processing (pure functions, no I/O)
//! - `modem/` - Symbol mapping, modulator, payload extractor
//! - `pdu/` - Message values, PDU queue, pacing, converter
//! - `adapters/` - Clocks, tag collector, ring feed, message pump, config files

// Core (pure, no I/O)
pub mod domain;
pub mod dsp;
pub mod modem;
pub mod pdu;
pub mod ports;

// Adapters (threads, time, filesystem)
pub mod adapters;

pub use domain::{Configuration, ConverterConfig, ModulatorConfig, OqpskError, OqpskResult};
pub use modem::OqpskModulator;
pub use pdu::{PduToConStream, Pmt};
