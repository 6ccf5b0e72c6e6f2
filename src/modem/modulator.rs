//! OQPSK Modulator: converts a byte stream to complex baseband samples
//!
//! Pipeline: bytes → 2-bit symbols (MSB pair first) → Gray mapping
//!           → per-sample RRC gain with a half-symbol Q offset → samples
//!
//! Each symbol produces exactly `samples_per_symbol` samples. Sample `k` of a
//! symbol is `(I * tap[k], Q * tap[k + sps/2])`: the taps are read as direct
//! per-sample gains, there is no convolution across symbol boundaries. The
//! half-symbol shift on the Q rail is what makes this "offset" QPSK.
//!
//! Think of the two rails as two people walking in step, one half a stride
//! behind the other: they never both change direction at the same instant,
//! so the combined signal never swings through zero.
//!
//! All state lives in the modulator, so the host may hand it any amount of
//! input and output space per call. A symbol cut short by a full output
//! buffer is finished at the start of the next call.

use num_complex::Complex32;

use crate::domain::{IqSample, ModulatorConfig, OqpskResult, WorkStatus};
use crate::dsp::RrcTaps;
use crate::modem::mapper::Symbol;
use crate::ports::{Block, TagSink};

/// Symbols carried by one input byte
const SYMBOLS_PER_BYTE: usize = 4;

pub struct OqpskModulator {
    taps: RrcTaps,
    samples_per_symbol: usize,
    debug: bool,

    /// Byte currently being unpacked
    current_byte: u8,
    /// Bits of `current_byte` not yet mapped (0, 2, 4, 6 or 8)
    bit_count: u8,
    /// Symbol whose samples were cut short, and the next sample index in it
    pending: Option<(Symbol, usize)>,
    /// Symbols mapped since construction
    symbol_count: u64,
}

impl OqpskModulator {
    pub fn new(config: &ModulatorConfig) -> OqpskResult<Self> {
        config.validate()?;
        let taps = RrcTaps::new(config.samples_per_symbol, config.rolloff)?;

        if config.debug {
            log::debug!(
                "OQPSK modulator initialized: sps={}, rolloff={}, ntaps={}",
                config.samples_per_symbol,
                config.rolloff,
                taps.len()
            );
        }

        Ok(Self {
            taps,
            samples_per_symbol: config.samples_per_symbol,
            debug: config.debug,
            current_byte: 0,
            bit_count: 0,
            pending: None,
            symbol_count: 0,
        })
    }

    /// Modulate a whole buffer in one go.
    ///
    /// Equivalent to calling `general_work` with unbounded output space.
    pub fn modulate(&mut self, bytes: &[u8]) -> Vec<IqSample> {
        let total = self.buffered_samples() + bytes.len() * SYMBOLS_PER_BYTE * self.samples_per_symbol;
        let mut out = vec![IqSample::new(0.0, 0.0); total];
        let status = self.work(bytes, &mut out);
        out.truncate(status.produced);
        out
    }

    /// Run the modulator over `input`, filling at most `output.len()` samples
    pub fn work(&mut self, input: &[u8], output: &mut [IqSample]) -> WorkStatus {
        let sps = self.samples_per_symbol;
        let mut consumed = 0;
        let mut produced = 0;

        while produced < output.len() {
            let (symbol, start) = match self.pending.take() {
                Some(in_progress) => in_progress,
                None => {
                    if self.bit_count == 0 {
                        match input.get(consumed) {
                            Some(&byte) => {
                                self.current_byte = byte;
                                self.bit_count = 8;
                                consumed += 1;
                            }
                            None => break,
                        }
                    }
                    let bits = (self.current_byte >> (self.bit_count - 2)) & 0x03;
                    self.bit_count -= 2;
                    self.symbol_count += 1;
                    (Symbol::from_bits(bits), 0)
                }
            };

            let n = (sps - start).min(output.len() - produced);
            for (slot, k) in output[produced..produced + n].iter_mut().zip(start..) {
                *slot = self.shape(symbol, k);
            }
            produced += n;

            if start + n < sps {
                self.pending = Some((symbol, start + n));
            }
        }

        if self.debug {
            log::debug!("Processed {consumed} input bytes, produced {produced} output samples");
        }

        WorkStatus::new(consumed, produced)
    }

    /// Sample `k` of `symbol`, with the Q rail read half a symbol later
    fn shape(&self, symbol: Symbol, k: usize) -> IqSample {
        let i_gain = self.taps.get(k).unwrap_or(0.0);
        let q_gain = self.taps.get(k + self.samples_per_symbol / 2).unwrap_or(0.0);
        Complex32::new(symbol.i * i_gain, symbol.q * q_gain)
    }

    /// Samples that can be produced without any more input
    fn buffered_samples(&self) -> usize {
        let pending = self
            .pending
            .map(|(_, k)| self.samples_per_symbol - k)
            .unwrap_or(0);
        pending + usize::from(self.bit_count / 2) * self.samples_per_symbol
    }

    pub fn taps(&self) -> &RrcTaps {
        &self.taps
    }

    pub fn samples_per_symbol(&self) -> usize {
        self.samples_per_symbol
    }

    pub fn symbol_count(&self) -> u64 {
        self.symbol_count
    }
}

impl Block for OqpskModulator {
    type Input = u8;
    type Output = IqSample;

    fn forecast(&self, noutput_items: usize) -> usize {
        let per_byte = SYMBOLS_PER_BYTE * self.samples_per_symbol;
        noutput_items
            .saturating_sub(self.buffered_samples())
            .div_ceil(per_byte)
    }

    fn general_work(
        &mut self,
        input: &[u8],
        output: &mut [IqSample],
        _tags: &mut dyn TagSink,
    ) -> WorkStatus {
        self.work(input, output)
    }
}
