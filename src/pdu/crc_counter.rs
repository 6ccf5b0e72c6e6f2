//! CRC outcome counter
//!
//! Two message handlers, one fed by the "CRC ok" port of a checker and one by
//! its "CRC fail" port. Message contents are ignored; only arrivals count.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::pdu::message::Pmt;

#[derive(Debug, Default)]
pub struct CrcErrorCounter {
    ok: AtomicU64,
    fail: AtomicU64,
}

impl CrcErrorCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_ok(&self, _msg: &Pmt) {
        self.ok.fetch_add(1, Ordering::Relaxed);
        self.report();
    }

    pub fn handle_fail(&self, _msg: &Pmt) {
        self.fail.fetch_add(1, Ordering::Relaxed);
        self.report();
    }

    pub fn ok_count(&self) -> u64 {
        self.ok.load(Ordering::Relaxed)
    }

    pub fn fail_count(&self) -> u64 {
        self.fail.load(Ordering::Relaxed)
    }

    /// Failed share of all checked messages, in percent
    pub fn error_rate(&self) -> Option<f64> {
        let ok = self.ok_count();
        let fail = self.fail_count();
        let total = ok + fail;
        (total > 0).then(|| fail as f64 / total as f64 * 100.0)
    }

    fn report(&self) {
        if let Some(rate) = self.error_rate() {
            log::info!(
                "CRC Stats: OK={}, Fail={}, Error Rate={rate:.2}%",
                self.ok_count(),
                self.fail_count()
            );
        }
    }
}
