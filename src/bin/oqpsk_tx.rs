//! oqpsk_tx: push a file through the PDU converter and the OQPSK modulator
//!
//! Usage:
//!   RUST_LOG=simple_oqpsk_lib=debug cargo run --bin oqpsk_tx -- \
//!       --input payload.bin --output tx.cf32 --pdu-size 64 --sps 8
//!
//! Output is interleaved little-endian f32 I/Q. Without `--realtime` the
//! converter is paced by a stepped clock, so the run is as fast as the CPU
//! allows and the output is deterministic.

use clap::Parser;
use crossbeam_channel::{unbounded, Sender};
use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use simple_oqpsk_lib::adapters::{ConfigStore, ManualClock, MessagePump, RingFeed, SystemClock, TagCollector};
use simple_oqpsk_lib::domain::{Configuration, IqSample};
use simple_oqpsk_lib::ports::Clock;
use simple_oqpsk_lib::{OqpskModulator, OqpskResult, PduToConStream, Pmt};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Payload file (stdin when omitted)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Sample output file (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Directory holding saved configuration profiles
    #[arg(long)]
    profile_dir: Option<PathBuf>,

    /// Profile to load from --profile-dir
    #[arg(long, default_value = "Default")]
    profile: String,

    /// Samples per symbol (overrides the profile)
    #[arg(long)]
    sps: Option<usize>,

    /// RRC roll-off (overrides the profile)
    #[arg(long)]
    rolloff: Option<f32>,

    /// Converter rate in bytes per second (overrides the profile)
    #[arg(long)]
    sample_rate: Option<f64>,

    /// Split the payload into PDUs of at most this many bytes
    #[arg(long, default_value = "256")]
    pdu_size: usize,

    /// Bytes requested from the converter per work call
    #[arg(long, default_value = "512")]
    chunk: usize,

    /// Extra padding bytes to emit after the last PDU
    #[arg(long, default_value = "0")]
    tail: usize,

    /// Pace with the system clock instead of a stepped clock
    #[arg(long)]
    realtime: bool,

    /// Enable block diagnostics
    #[arg(short, long)]
    debug: bool,
}

fn load_configuration(args: &Args) -> OqpskResult<Configuration> {
    let mut config = match &args.profile_dir {
        Some(dir) => ConfigStore::open(dir)?.load(&args.profile)?,
        None => Configuration::default(),
    };
    if let Some(sps) = args.sps {
        config.modulator.samples_per_symbol = sps;
    }
    if let Some(rolloff) = args.rolloff {
        config.modulator.rolloff = rolloff;
    }
    if let Some(rate) = args.sample_rate {
        config.converter.sample_rate = rate;
    }
    if args.debug {
        config.modulator.debug = true;
        config.converter.debug = true;
    }
    config.validate()?;
    Ok(config)
}

fn read_payload(input: &Option<PathBuf>) -> OqpskResult<Vec<u8>> {
    let mut payload = Vec::new();
    match input {
        Some(path) => File::open(path)?.read_to_end(&mut payload)?,
        None => io::stdin().read_to_end(&mut payload)?,
    };
    Ok(payload)
}

/// Send `payload` as PDUs of at most `pdu_size` bytes; returns how many were sent
fn submit_pdus(inbox: &Sender<Pmt>, payload: &[u8], pdu_size: usize) -> usize {
    let mut sent = 0;
    for pdu in payload.chunks(pdu_size.max(1)) {
        if inbox.send(Pmt::blob(pdu.to_vec())).is_err() {
            log::warn!(
                "Message pump stopped early, {} of {} bytes not queued",
                payload.len() - sent * pdu_size.max(1),
                payload.len()
            );
            break;
        }
        sent += 1;
    }
    sent
}

fn write_samples(out: &mut dyn Write, samples: &[IqSample]) -> io::Result<()> {
    for s in samples {
        out.write_all(&s.re.to_le_bytes())?;
        out.write_all(&s.im.to_le_bytes())?;
    }
    Ok(())
}

fn main() -> OqpskResult<()> {
    env_logger::init();
    let args = Args::parse();
    let config = load_configuration(&args)?;
    let payload = read_payload(&args.input)?;
    let chunk = args.chunk.max(1);

    let stepped = Arc::new(ManualClock::new());
    let clock: Arc<dyn Clock> = if args.realtime {
        Arc::new(SystemClock)
    } else {
        stepped.clone()
    };
    let converter = Arc::new(PduToConStream::with_clock(&config.converter, clock)?);

    // Deliver the PDUs through the asynchronous message path
    let (inbox, rx) = unbounded();
    let target = converter.clone();
    let pump = MessagePump::spawn(rx, move |msg| target.handle_message(msg))?;
    submit_pdus(&inbox, &payload, args.pdu_size);
    drop(inbox);
    let delivered = pump.join()?;
    log::info!("Queued {delivered} PDUs ({} bytes)", payload.len());

    let modulator = OqpskModulator::new(&config.modulator)?;
    let per_byte = 4 * modulator.samples_per_symbol();
    let (mut feed, mut feed_handle) = RingFeed::new(modulator, chunk)?;

    let mut sink: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(io::stdout().lock()),
    };
    let mut sink = BufWriter::new(&mut sink);

    let mut tags = TagCollector::new();
    let mut sample_tags = TagCollector::new();
    let mut bytes = vec![0u8; chunk];
    let mut samples = vec![IqSample::new(0.0, 0.0); (chunk + 1) * per_byte];
    let mut tail_left = args.tail;
    let period = Duration::from_secs_f64(chunk as f64 / config.converter.sample_rate);

    loop {
        let draining = converter.queued() > 0 || converter.current_remaining().is_some();
        if !draining && tail_left == 0 {
            break;
        }

        if args.realtime {
            thread::sleep(period);
        } else {
            stepped.advance_items(chunk as u64, config.converter.sample_rate);
        }

        let want = if draining { chunk } else { tail_left.min(chunk) };
        let produced = converter.work(&mut bytes[..want], &mut tags);
        if !draining {
            tail_left -= produced.min(tail_left);
        }
        feed_handle.feed(&bytes[..produced]);

        loop {
            let status = feed.pull(&mut samples, &mut sample_tags);
            if status.produced == 0 {
                break;
            }
            write_samples(&mut sink, &samples[..status.produced])?;
        }
    }
    sink.flush()?;

    for tag in tags.tags() {
        log::info!("tag @{} {}={}", tag.offset, tag.key, tag.value);
    }
    log::info!(
        "Emitted {} bytes, {} symbols",
        converter.items_written(),
        feed.block().symbol_count()
    );
    Ok(())
}
