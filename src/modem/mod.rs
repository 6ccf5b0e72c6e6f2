//! OQPSK Modem
//!
//! Symbol mapping and the streaming modulator for TX, plus the payload
//! extractor that turns a sliced bit stream back into PDUs.

pub mod deframer;
pub mod mapper;
pub mod modulator;

pub use deframer::PayloadExtractor;
pub use mapper::Symbol;
pub use modulator::OqpskModulator;
