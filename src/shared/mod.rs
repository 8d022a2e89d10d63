//! Shared state and messaging between frame analysis and enrichment
//!
//! Frame analysis runs on the camera pipeline's thread; enrichment runs on
//! the async runtime. The only path between them is the frame mailbox.

pub mod mailbox;
pub mod messages;
pub mod state;

pub use mailbox::{frame_mailbox, FrameReceiver, FrameSender, MailboxClosed};
pub use messages::{DetectionBatch, PublishedDetections};
pub use state::{CoordinatorStats, CoordinatorStatsSnapshot};
