//! Adapters: implementations of the port traits and host-side plumbing
//!
//! - `SystemClock` / `ManualClock`: real and hand-stepped time for pacing
//! - `TagCollector`: records emitted stream tags
//! - `RingFeed`: lock-free byte feed in front of a stream block
//! - `MessagePump`: delivers channel messages to a block's message handler
//! - `ConfigStore`: JSON configuration profiles on disk

pub mod config_store;
pub mod manual_clock;
pub mod message_pump;
pub mod ring_feed;
pub mod system_clock;
pub mod tag_collector;

pub use config_store::ConfigStore;
pub use manual_clock::ManualClock;
pub use message_pump::MessagePump;
pub use ring_feed::RingFeed;
pub use system_clock::SystemClock;
pub use tag_collector::TagCollector;
