//! Payload extractor: recovers PDUs from a sliced bit stream
//!
//! Input is one bit per byte (LSB), as produced by a binary slicer. An upstream
//! correlator marks the end of each access code with a `header_tag` stream
//! tag. From there the frame is:
//!
//! ```text
//! | length (u16, MSB first) | length again | payload (length bytes) |
//! ```
//!
//! The two length copies must agree, otherwise the frame is abandoned and the
//! extractor goes back to waiting for the next tag. Complete payloads are
//! published as `(nil, u8vector)` PDUs on a crossbeam channel.
//!
//! With `verify_access_code` set, the tag is instead taken to mark the start
//! of the 64-bit access code, which is checked before the length field.

use crossbeam_channel::Sender;

use crate::domain::StreamTag;
use crate::pdu::Pmt;

/// Tag key placed by the upstream access-code correlator
pub const HEADER_TAG: &str = "header_tag";

/// 64-bit sync word preceding every frame
pub const ACCESS_CODE: [u8; 8] = [0xac, 0xdd, 0xa4, 0xe2, 0xf2, 0x8c, 0x20, 0xfc];

const ACCESS_CODE_BITS: usize = 64;
/// Two 16-bit copies of the payload length
const LENGTH_BITS: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeframerState {
    Searching,
    AccessCode,
    Length,
    Payload { expected_bits: usize },
}

pub struct PayloadExtractor {
    state: DeframerState,
    buffer: Vec<u8>,
    /// Absolute offset of the first bit of the next `work` call
    nitems_read: u64,
    verify_access_code: bool,
    debug: bool,
    pdu_out: Sender<Pmt>,
}

impl PayloadExtractor {
    pub fn new(pdu_out: Sender<Pmt>, debug: bool) -> Self {
        if debug {
            log::debug!("Payload extractor initialized");
        }
        Self {
            state: DeframerState::Searching,
            buffer: Vec::new(),
            nitems_read: 0,
            verify_access_code: false,
            debug,
            pdu_out,
        }
    }

    /// Expect the tag at the start of the access code and check it
    pub fn with_access_code_check(mut self) -> Self {
        self.verify_access_code = true;
        self
    }

    pub fn state(&self) -> DeframerState {
        self.state
    }

    /// Consume `bits` (all of them), using `tags` to find frame starts.
    /// Tag offsets are absolute stream positions.
    pub fn work(&mut self, bits: &[u8], tags: &[StreamTag]) -> usize {
        let ninput = bits.len();
        let mut consumed = 0;

        while consumed < ninput {
            match self.state {
                DeframerState::Searching => {
                    let from = self.nitems_read + consumed as u64;
                    let to = self.nitems_read + ninput as u64;
                    let tag_pos = tags
                        .iter()
                        .filter(|t| t.key == HEADER_TAG && (from..to).contains(&t.offset))
                        .map(|t| t.offset)
                        .min();

                    match tag_pos {
                        Some(offset) => {
                            consumed = (offset - self.nitems_read) as usize;
                            self.buffer.clear();
                            self.state = if self.verify_access_code {
                                DeframerState::AccessCode
                            } else {
                                DeframerState::Length
                            };
                            if self.debug {
                                log::debug!("Found {HEADER_TAG} at item {offset}");
                            }
                        }
                        None => consumed = ninput,
                    }
                }
                DeframerState::AccessCode => {
                    consumed += self.fill_buffer(&bits[consumed..], ACCESS_CODE_BITS);
                    if self.buffer.len() == ACCESS_CODE_BITS {
                        let received = pack_bits(&self.buffer);
                        self.buffer.clear();
                        if received == ACCESS_CODE {
                            self.state = DeframerState::Length;
                        } else {
                            if self.debug {
                                log::debug!("Access code mismatch: {received:02x?}");
                            }
                            self.state = DeframerState::Searching;
                        }
                    }
                }
                DeframerState::Length => {
                    consumed += self.fill_buffer(&bits[consumed..], LENGTH_BITS);
                    if self.buffer.len() == LENGTH_BITS {
                        let first = bits_to_u16(&self.buffer[..16]);
                        let second = bits_to_u16(&self.buffer[16..]);
                        self.buffer.clear();
                        self.state = if first != second {
                            if self.debug {
                                log::debug!("Length mismatch: {first} vs {second}");
                            }
                            DeframerState::Searching
                        } else if first == 0 {
                            DeframerState::Searching
                        } else {
                            DeframerState::Payload {
                                expected_bits: usize::from(first) * 8,
                            }
                        };
                    }
                }
                DeframerState::Payload { expected_bits } => {
                    consumed += self.fill_buffer(&bits[consumed..], expected_bits);
                    if self.buffer.len() == expected_bits {
                        let payload = pack_bits(&self.buffer);
                        self.buffer.clear();
                        self.state = DeframerState::Searching;
                        if self.debug {
                            log::debug!("Payload complete, sending {} bytes", payload.len());
                        }
                        if self.pdu_out.send(Pmt::blob(payload)).is_err() {
                            log::warn!("PDU receiver gone, dropping payload");
                        }
                    }
                }
            }
        }

        self.nitems_read += ninput as u64;
        ninput
    }

    /// Move bits into the buffer until it holds `target`; returns bits taken
    fn fill_buffer(&mut self, bits: &[u8], target: usize) -> usize {
        let take = target.saturating_sub(self.buffer.len()).min(bits.len());
        self.buffer.extend(bits[..take].iter().map(|b| b & 1));
        take
    }
}

/// Pack bits MSB first; a trailing partial byte is zero-filled
fn pack_bits(bits: &[u8]) -> Vec<u8> {
    bits.chunks(8)
        .map(|chunk| {
            chunk
                .iter()
                .enumerate()
                .fold(0u8, |byte, (j, &bit)| byte | ((bit & 1) << (7 - j)))
        })
        .collect()
}

fn bits_to_u16(bits: &[u8]) -> u16 {
    bits.iter().fold(0u16, |acc, &bit| (acc << 1) | u16::from(bit & 1))
}

/// Unpack bytes into one bit per byte, MSB first
pub fn unpack_bits(bytes: &[u8]) -> Vec<u8> {
    bytes
        .iter()
        .flat_map(|&byte| (0..8).rev().map(move |i| (byte >> i) & 1))
        .collect()
}
