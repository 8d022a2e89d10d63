//! Batch types passed from frame analysis to enrichment and on to consumers

use crate::vision::{DetectedNumber, FrameSize};

/// Detections from one analyzed frame
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionBatch {
    /// Monotonic per-mailbox sequence, starting at 1
    pub sequence: u64,
    /// Landscape frame size every detection's corners are relative to
    pub frame_size: FrameSize,
    pub detections: Vec<DetectedNumber>,
}

/// Resolved detections currently on display.
///
/// Frame size travels with the detections so a consumer can never pair one
/// batch's corners with another batch's frame geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishedDetections {
    /// Sequence of the batch these detections came from, 0 before any publish
    pub sequence: u64,
    pub frame_size: FrameSize,
    /// Only detections with resolved team info
    pub detections: Vec<DetectedNumber>,
}

impl PublishedDetections {
    /// State before the first batch has been published
    pub fn empty() -> Self {
        Self {
            sequence: 0,
            frame_size: FrameSize::new(0.0, 0.0),
            detections: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }
}

impl Default for PublishedDetections {
    fn default() -> Self {
        Self::empty()
    }
}
