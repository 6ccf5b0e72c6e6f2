//! PDU to continuous stream converter
//!
//! Turns PDUs arriving on a message port into an unbroken, wall-clock-paced
//! byte stream:
//!
//! - `handle_message` (any thread): validate the `(metadata, u8vector)` pair
//!   and queue a copy of the payload
//! - `work` (scheduler thread): emit as many bytes as the elapsed time allows,
//!   draining queued PDUs in order and filling gaps with `PADDING_BYTE`
//!
//! The first byte of every PDU carries a `tag_name` tag whose value is the
//! PDU length, so a downstream framer can find packet boundaries.
//!
//! It works like a conveyor belt that moves at a fixed speed whether or not
//! there is anything to carry. Packets are placed on it in arrival order and
//! the empty stretches between them are filled with `PADDING_BYTE`.
//!
//! Pacing is per call: `round(elapsed × sample_rate)` items, none at all below
//! one whole period. The rounding error is carried into the next call, so the
//! long-run output rate matches `sample_rate`.
//!
//! One mutex guards the queue, the current-PDU cursor and the pacing clock.
//! Both paths hold it for their whole critical section; neither blocks while
//! holding it.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::adapters::SystemClock;
use crate::domain::{
    ConverterConfig, OqpskResult, Pdu, StreamTag, TagValue, WorkStatus, PADDING_BYTE,
};
use crate::pdu::message::Pmt;
use crate::pdu::pacing::PacingClock;
use crate::pdu::queue::PduQueue;
use crate::ports::{Block, Clock, TagSink};

struct ConverterState {
    queue: PduQueue,
    pacing: PacingClock,
    /// Items written since construction; absolute offset of the next item
    items_written: u64,
}

pub struct PduToConStream {
    tag_name: String,
    sample_rate: f64,
    debug: bool,
    clock: Arc<dyn Clock>,
    state: Mutex<ConverterState>,
}

impl PduToConStream {
    /// Converter paced by the system monotonic clock
    pub fn new(config: &ConverterConfig) -> OqpskResult<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: &ConverterConfig, clock: Arc<dyn Clock>) -> OqpskResult<Self> {
        config.validate()?;
        let pacing = PacingClock::new(config.sample_rate, clock.now());

        if config.debug {
            log::debug!(
                "PDU stream converter initialized: tag={}, rate={} items/s",
                config.tag_name,
                config.sample_rate
            );
        }

        Ok(Self {
            tag_name: config.tag_name.clone(),
            sample_rate: config.sample_rate,
            debug: config.debug,
            clock,
            state: Mutex::new(ConverterState {
                queue: PduQueue::new(),
                pacing,
                items_written: 0,
            }),
        })
    }

    fn lock(&self) -> MutexGuard<'_, ConverterState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Message-port handler. Malformed messages are logged and dropped.
    pub fn handle_message(&self, msg: Pmt) {
        let mut state = self.lock();

        let payload = match msg.into_pdu_payload() {
            Ok(payload) => payload,
            Err(e) => {
                log::warn!("Dropping message: {e}");
                return;
            }
        };
        if payload.is_empty() {
            log::warn!("Dropping empty PDU");
            return;
        }

        if self.debug {
            log::debug!(
                "Queued PDU of {} bytes ({} waiting)",
                payload.len(),
                state.queue.len() + 1
            );
        }
        state.queue.push(Pdu::new(payload));
    }

    /// Produce up to `output.len()` paced bytes; returns the count written
    pub fn work(&self, output: &mut [u8], tags: &mut dyn TagSink) -> usize {
        let mut guard = self.lock();
        let state = &mut *guard;

        let now = self.clock.now();
        let budget = state.pacing.budget(now, output.len());
        if budget == 0 {
            return 0;
        }

        let mut produced = 0;
        let mut padded = 0;
        while produced < budget {
            state.queue.clear_exhausted();
            if let Some(len) = state.queue.promote(produced) {
                if self.debug {
                    log::debug!(
                        "Starting PDU of {len} bytes at item {}",
                        state.items_written + produced as u64
                    );
                }
            }

            match state.queue.current_mut() {
                Some(current) if current.remaining() > 0 => {
                    let first_chunk = current.is_fresh();
                    let n = current.copy_into(&mut output[produced..budget]);
                    if first_chunk {
                        tags.add_item_tag(StreamTag::new(
                            state.items_written + current.tag_offset() as u64,
                            self.tag_name.clone(),
                            TagValue::Int(current.len() as i64),
                        ));
                    }
                    produced += n;
                }
                _ => {
                    output[produced..budget].fill(PADDING_BYTE);
                    padded += budget - produced;
                    produced = budget;
                }
            }
        }

        state.items_written += produced as u64;
        state.pacing.mark(now, produced);

        if self.debug {
            log::debug!("Produced {produced} items ({padded} padding)");
        }
        produced
    }

    /// PDUs waiting behind the one being drained
    pub fn queued(&self) -> usize {
        self.lock().queue.len()
    }

    /// Bytes of the PDU being drained that have not been emitted yet
    pub fn current_remaining(&self) -> Option<usize> {
        self.lock().queue.current().map(|c| c.remaining())
    }

    pub fn items_written(&self) -> u64 {
        self.lock().items_written
    }

    pub fn tag_name(&self) -> &str {
        &self.tag_name
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }
}

impl Block for PduToConStream {
    type Input = ();
    type Output = u8;

    /// Driven by the clock and the message port, never by stream input
    fn forecast(&self, _noutput_items: usize) -> usize {
        0
    }

    fn general_work(
        &mut self,
        _input: &[()],
        output: &mut [u8],
        tags: &mut dyn TagSink,
    ) -> WorkStatus {
        WorkStatus::new(0, self.work(output, tags))
    }
}
