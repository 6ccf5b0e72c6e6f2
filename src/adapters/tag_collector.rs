//! Tag sink that records every tag it is handed

use crate::domain::StreamTag;
use crate::ports::TagSink;

#[derive(Debug, Default)]
pub struct TagCollector {
    tags: Vec<StreamTag>,
}

impl TagCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tags(&self) -> &[StreamTag] {
        &self.tags
    }

    /// Tags with `start <= offset < end`
    pub fn range(&self, start: u64, end: u64) -> Vec<&StreamTag> {
        self.tags
            .iter()
            .filter(|t| (start..end).contains(&t.offset))
            .collect()
    }

    /// Remove and return everything collected so far
    pub fn drain(&mut self) -> Vec<StreamTag> {
        std::mem::take(&mut self.tags)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl TagSink for TagCollector {
    fn add_item_tag(&mut self, tag: StreamTag) {
        log::trace!("tag @{} {}={}", tag.offset, tag.key, tag.value);
        self.tags.push(tag);
    }
}
