//! Tag sink port trait

use crate::domain::StreamTag;

/// Receives tags a block attaches to its output stream
pub trait TagSink {
    fn add_item_tag(&mut self, tag: StreamTag);
}

impl TagSink for Vec<StreamTag> {
    fn add_item_tag(&mut self, tag: StreamTag) {
        self.push(tag);
    }
}
