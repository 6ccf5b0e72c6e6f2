//! PDU handling
//!
//! Message values, the ingest queue, output pacing and the PDU-to-stream
//! converter that ties them together. Also the CRC outcome counter that sits
//! at the end of a receive chain's message path.

pub mod converter;
pub mod crc_counter;
pub mod message;
pub mod pacing;
pub mod queue;

pub use converter::PduToConStream;
pub use crc_counter::CrcErrorCounter;
pub use message::Pmt;
