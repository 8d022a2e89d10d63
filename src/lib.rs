//! TeamLens - team number detection and directory enrichment
//!
//! Finds team numbers in on-device OCR output, resolves them against a
//! public team directory with a persistent cache, and lays out labels over
//! a rotated, center-cropped camera preview.

pub mod config;
pub mod directory;
pub mod enrichment;
pub mod overlay;
pub mod shared;
pub mod storage;
pub mod vision;
