//! PDU ingest queue
//!
//! FIFO of PDUs waiting for transmission plus the one PDU currently being
//! drained into the output stream. Not synchronized on its own: the converter
//! keeps it behind the same lock as the pacing clock.

use std::collections::VecDeque;

use crate::domain::Pdu;

/// The PDU being drained and how far into it the stream has got
#[derive(Debug)]
pub struct CurrentPdu {
    pdu: Pdu,
    read_pos: usize,
    /// Offset, relative to the start of the work call that promoted this PDU,
    /// where its first byte lands
    tag_offset: usize,
}

impl CurrentPdu {
    pub fn len(&self) -> usize {
        self.pdu.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pdu.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.pdu.len() - self.read_pos
    }

    /// True until the first chunk has been copied out
    pub fn is_fresh(&self) -> bool {
        self.read_pos == 0
    }

    pub fn tag_offset(&self) -> usize {
        self.tag_offset
    }

    /// Copy as many unread bytes as fit into `out`; returns the count
    pub fn copy_into(&mut self, out: &mut [u8]) -> usize {
        let n = out.len().min(self.remaining());
        out[..n].copy_from_slice(&self.pdu.as_bytes()[self.read_pos..self.read_pos + n]);
        self.read_pos += n;
        n
    }
}

#[derive(Debug, Default)]
pub struct PduQueue {
    pending: VecDeque<Pdu>,
    current: Option<CurrentPdu>,
}

impl PduQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a PDU behind everything already waiting
    pub fn push(&mut self, pdu: Pdu) {
        self.pending.push_back(pdu);
    }

    /// PDUs waiting behind the current one
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drop the current PDU once every byte of it has been emitted
    pub fn clear_exhausted(&mut self) {
        if self.current.as_ref().is_some_and(|c| c.remaining() == 0) {
            self.current = None;
        }
    }

    /// With no current PDU, pop the next one and remember that its first
    /// byte will land at `offset`. Returns the promoted PDU's length.
    pub fn promote(&mut self, offset: usize) -> Option<usize> {
        if self.current.is_some() {
            return None;
        }
        let pdu = self.pending.pop_front()?;
        let len = pdu.len();
        self.current = Some(CurrentPdu {
            pdu,
            read_pos: 0,
            tag_offset: offset,
        });
        Some(len)
    }

    pub fn current(&self) -> Option<&CurrentPdu> {
        self.current.as_ref()
    }

    pub fn current_mut(&mut self) -> Option<&mut CurrentPdu> {
        self.current.as_mut()
    }
}
