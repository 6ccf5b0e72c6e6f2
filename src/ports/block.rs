//! Streaming block trait
//!
//! A host scheduler asks a block how much input it needs (`forecast`) and then
//! repeatedly hands it whatever input and output space is available
//! (`general_work`). Blocks keep all cross-call state in `self`, so a call may
//! stop anywhere and the next call picks up where it left off.

use crate::domain::WorkStatus;
use crate::ports::TagSink;

pub trait Block {
    /// Input item type. `()` for blocks with no stream input.
    type Input;
    /// Output item type
    type Output;

    /// Number of input items needed to produce `noutput_items`
    fn forecast(&self, noutput_items: usize) -> usize;

    /// Process available input into at most `output.len()` items.
    ///
    /// Producing fewer items than requested is legal and means "call again
    /// once more input (or time) is available".
    fn general_work(
        &mut self,
        input: &[Self::Input],
        output: &mut [Self::Output],
        tags: &mut dyn TagSink,
    ) -> WorkStatus;
}
