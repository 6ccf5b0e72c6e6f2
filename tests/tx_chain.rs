//! Integration tests: PDU converter → OQPSK modulator
//!
//! PDUs go in through the message pump, the converter is paced by a
//! hand-stepped clock, and its byte stream is fed to the modulator through
//! the ring feed. The tests check the tags, the padding and the sample count
//! at the end of the chain.

use crossbeam_channel::unbounded;
use std::sync::Arc;
use std::thread;

use simple_oqpsk_lib::adapters::{ManualClock, MessagePump, RingFeed, TagCollector};
use simple_oqpsk_lib::domain::{
    ConverterConfig, IqSample, ModulatorConfig, StreamTag, TagValue, PADDING_BYTE,
};
use simple_oqpsk_lib::{OqpskModulator, PduToConStream, Pmt};

const RATE: f64 = 8000.0;

fn converter(clock: Arc<ManualClock>) -> Arc<PduToConStream> {
    let config = ConverterConfig {
        debug: false,
        tag_name: "packet_len".into(),
        sample_rate: RATE,
    };
    Arc::new(PduToConStream::with_clock(&config, clock).unwrap())
}

fn modulator(sps: usize) -> OqpskModulator {
    OqpskModulator::new(&ModulatorConfig {
        debug: false,
        samples_per_symbol: sps,
        rolloff: 0.35,
    })
    .unwrap()
}

/// Deliver `pdus` through a message pump and wait until all are queued
fn deliver(conv: &Arc<PduToConStream>, pdus: &[Vec<u8>]) {
    let (tx, rx) = unbounded();
    let target = conv.clone();
    let pump = MessagePump::spawn(rx, move |msg| target.handle_message(msg)).unwrap();
    for pdu in pdus {
        tx.send(Pmt::blob(pdu.clone())).unwrap();
    }
    drop(tx);
    assert_eq!(pump.join().unwrap(), pdus.len());
}

#[test]
fn test_stream_carries_pdus_padding_and_tags() {
    let clock = Arc::new(ManualClock::new());
    let conv = converter(clock.clone());
    deliver(&conv, &[b"first".to_vec(), b"second!".to_vec()]);

    let mut tags = TagCollector::new();
    let mut stream = Vec::new();
    for _ in 0..4 {
        let mut out = [0u8; 6];
        clock.advance_items(6, RATE);
        let n = conv.work(&mut out, &mut tags);
        stream.extend_from_slice(&out[..n]);
    }

    assert_eq!(stream.len(), 24);
    assert_eq!(&stream[..12], b"firstsecond!");
    assert!(stream[12..].iter().all(|&b| b == PADDING_BYTE));
    assert_eq!(
        tags.tags(),
        &[
            StreamTag::new(0, "packet_len", TagValue::Int(5)),
            StreamTag::new(5, "packet_len", TagValue::Int(7)),
        ]
    );
}

#[test]
fn test_pdu_arriving_mid_stream_is_tagged_at_its_offset() {
    let clock = Arc::new(ManualClock::new());
    let conv = converter(clock.clone());
    let mut tags = TagCollector::new();
    let mut out = [0u8; 32];

    clock.advance_items(20, RATE);
    assert_eq!(conv.work(&mut out, &mut tags), 20);
    assert!(tags.is_empty());

    deliver(&conv, &[vec![0x55; 9]]);
    clock.advance_items(16, RATE);
    assert_eq!(conv.work(&mut out, &mut tags), 16);
    assert_eq!(&out[..9], &[0x55; 9]);
    assert_eq!(tags.range(20, 21).len(), 1);
    assert_eq!(tags.tags()[0].value.as_int(), Some(9));
    assert_eq!(conv.items_written(), 36);
}

#[test]
fn test_converter_output_modulates_to_expected_length() {
    let sps = 4;
    let clock = Arc::new(ManualClock::new());
    let conv = converter(clock.clone());
    deliver(&conv, &[(0u8..=255).collect()]);

    let (mut feed, mut handle) = RingFeed::new(modulator(sps), 128).unwrap();
    let mut conv_tags = TagCollector::new();
    let mut sample_tags = TagCollector::new();
    let mut samples: Vec<IqSample> = Vec::new();
    let mut stream = Vec::new();

    while conv.items_written() < 300 {
        let mut bytes = [0u8; 100];
        clock.advance_items(100, RATE);
        let n = conv.work(&mut bytes, &mut conv_tags);
        assert_eq!(handle.feed(&bytes[..n]), n);
        stream.extend_from_slice(&bytes[..n]);

        let mut out = vec![IqSample::new(0.0, 0.0); 100 * 4 * sps];
        let status = feed.pull(&mut out, &mut sample_tags);
        assert_eq!(status.consumed, n);
        samples.extend_from_slice(&out[..status.produced]);
    }

    assert_eq!(stream.len(), 300);
    assert_eq!(samples.len(), 300 * 4 * sps);
    assert_eq!(feed.block().symbol_count(), 1200);
    assert_eq!(conv_tags.len(), 1);

    // Chunked modulation matches one-shot modulation of the same stream
    let expected = modulator(sps).modulate(&stream);
    assert_eq!(samples, expected);
}

#[test]
fn test_padding_modulates_to_constant_symbol_pattern() {
    // 0x01 = 00 00 00 01: three (+,+) symbols then one (-,+)
    let sps = 2;
    let mut m = modulator(sps);
    let samples = m.modulate(&[PADDING_BYTE, PADDING_BYTE]);
    assert_eq!(samples.len(), 2 * 4 * sps);
    assert_eq!(&samples[..8], &samples[8..]);

    // Only the I sign differs between the first and last symbol
    for k in 0..sps {
        let first = samples[k];
        let last = samples[3 * sps + k];
        assert_eq!(last.re, -first.re);
        assert_eq!(last.im, first.im);
    }
}

#[test]
fn test_enqueue_while_draining_keeps_order_and_tags() {
    let clock = Arc::new(ManualClock::new());
    let conv = converter(clock.clone());

    // Lengths 1..=4 and byte values 2..=251 so no payload byte equals padding
    let pdus: Vec<Vec<u8>> = (0..200usize)
        .map(|i| vec![(i % 250) as u8 + 2; i % 4 + 1])
        .collect();

    let target = conv.clone();
    let to_send = pdus.clone();
    let producer = thread::spawn(move || {
        for pdu in to_send {
            target.handle_message(Pmt::blob(pdu));
            thread::yield_now();
        }
    });

    let mut tags = TagCollector::new();
    let mut stream = Vec::new();
    let mut drain = |calls: usize| {
        for _ in 0..calls {
            let mut out = [0u8; 3];
            clock.advance_items(3, RATE);
            let n = conv.work(&mut out, &mut tags);
            stream.extend_from_slice(&out[..n]);
        }
    };
    drain(2000);
    producer.join().unwrap();
    while conv.queued() > 0 || conv.current_remaining().is_some() {
        drain(1);
    }

    let payload: Vec<u8> = stream.iter().copied().filter(|&b| b != PADDING_BYTE).collect();
    assert_eq!(payload, pdus.concat());

    assert_eq!(tags.len(), pdus.len());
    for (tag, pdu) in tags.tags().iter().zip(&pdus) {
        let start = tag.offset as usize;
        assert_eq!(tag.value, TagValue::Int(pdu.len() as i64));
        assert_eq!(&stream[start..start + pdu.len()], pdu.as_slice());
    }
}
