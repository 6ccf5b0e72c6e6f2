//! Ring-buffered input feed for a byte-consuming block
//!
//! Splits the host's "push bytes in" and "pull items out" sides. The
//! `FeedHandle` may live on another thread (it owns the producer half of a
//! lock-free SPSC ring); `RingFeed` owns the block and the consumer half and
//! hands the block whatever is buffered on each pull. Bytes the block does not
//! consume stay in the ring for the next pull.

use ringbuf::traits::{Consumer, Observer, Producer, Split};
use ringbuf::{HeapCons, HeapProd, HeapRb};

use crate::domain::{OqpskError, OqpskResult, WorkStatus};
use crate::ports::{Block, TagSink};

pub struct RingFeed<B> {
    block: B,
    consumer: HeapCons<u8>,
}

/// Producer side of a `RingFeed`
pub struct FeedHandle {
    producer: HeapProd<u8>,
}

impl FeedHandle {
    /// Queue as many of `bytes` as fit; returns how many were accepted
    pub fn feed(&mut self, bytes: &[u8]) -> usize {
        self.producer.push_slice(bytes)
    }

    /// Free space in the ring
    pub fn vacant(&self) -> usize {
        self.producer.vacant_len()
    }
}

impl<B: Block<Input = u8>> RingFeed<B> {
    pub fn new(block: B, capacity: usize) -> OqpskResult<(Self, FeedHandle)> {
        if capacity == 0 {
            return Err(OqpskError::InvalidParameter(
                "ring feed capacity must be greater than zero".into(),
            ));
        }
        let (producer, consumer) = HeapRb::<u8>::new(capacity).split();
        Ok((Self { block, consumer }, FeedHandle { producer }))
    }

    /// Run the block over everything buffered, filling at most `output`
    pub fn pull(&mut self, output: &mut [B::Output], tags: &mut dyn TagSink) -> WorkStatus {
        let (head, tail) = self.consumer.as_slices();
        let mut status = self.block.general_work(head, output, tags);

        // The ring wrapped: continue with the second slice
        if status.consumed == head.len() && status.produced < output.len() && !tail.is_empty() {
            let rest = self
                .block
                .general_work(tail, &mut output[status.produced..], tags);
            status.consumed += rest.consumed;
            status.produced += rest.produced;
        }

        self.consumer.skip(status.consumed);
        status
    }

    /// Bytes still needed, beyond what is buffered, to produce `noutput_items`
    pub fn needed(&self, noutput_items: usize) -> usize {
        self.block
            .forecast(noutput_items)
            .saturating_sub(self.consumer.occupied_len())
    }

    pub fn buffered(&self) -> usize {
        self.consumer.occupied_len()
    }

    pub fn block(&self) -> &B {
        &self.block
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{IqSample, ModulatorConfig, StreamTag};
    use crate::modem::OqpskModulator;
    use std::thread;

    fn modulator() -> OqpskModulator {
        OqpskModulator::new(&ModulatorConfig::default()).unwrap()
    }

    fn zeros(n: usize) -> Vec<IqSample> {
        vec![IqSample::new(0.0, 0.0); n]
    }

    #[test]
    fn test_pull_matches_direct_modulation() {
        let data = [0x1B, 0xE4, 0x00, 0xFF];
        let expected = modulator().modulate(&data);

        let (mut feed, mut handle) = RingFeed::new(modulator(), 16).unwrap();
        assert_eq!(handle.feed(&data), 4);

        let mut tags: Vec<StreamTag> = Vec::new();
        let mut got = Vec::new();
        for chunk in [10usize, 3, 40, 100] {
            let mut out = zeros(chunk);
            let status = feed.pull(&mut out, &mut tags);
            got.extend_from_slice(&out[..status.produced]);
        }
        assert_eq!(got, expected);
        assert_eq!(feed.buffered(), 0);
        assert!(tags.is_empty());
    }

    #[test]
    fn test_wrapped_ring_is_drained_in_one_pull() {
        let (mut feed, mut handle) = RingFeed::new(modulator(), 4).unwrap();
        let mut tags: Vec<StreamTag> = Vec::new();

        handle.feed(&[1, 2, 3]);
        let mut out = zeros(48);
        assert_eq!(feed.pull(&mut out, &mut tags).consumed, 3);

        // Write index is now at 3: these bytes straddle the end of storage
        assert_eq!(handle.feed(&[4, 5, 6]), 3);
        let status = feed.pull(&mut out, &mut tags);
        assert_eq!(status, WorkStatus::new(3, 48));
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let result = RingFeed::new(modulator(), 0);
        assert!(matches!(result, Err(OqpskError::InvalidParameter(_))));
    }

    #[test]
    fn test_full_ring_rejects_overflow() {
        let (feed, mut handle) = RingFeed::new(modulator(), 2).unwrap();
        assert_eq!(handle.feed(&[1, 2, 3]), 2);
        assert_eq!(handle.vacant(), 0);
        assert_eq!(feed.needed(16 * 3), 1);
    }

    #[test]
    fn test_feed_from_another_thread() {
        let (mut feed, mut handle) = RingFeed::new(modulator(), 64).unwrap();
        let producer = thread::spawn(move || handle.feed(b"across threads"));
        assert_eq!(producer.join().unwrap(), 14);

        let mut out = zeros(14 * 16);
        let mut tags: Vec<StreamTag> = Vec::new();
        let status = feed.pull(&mut out, &mut tags);
        assert_eq!(status, WorkStatus::new(14, 14 * 16));
        assert_eq!(feed.block().symbol_count(), 56);
    }
}
