//! Team number extraction from recognizer output
//!
//! Finds 3-5 digit runs inside recognized words and rebuilds a quad for each
//! run from per-character geometry, so "#254A" or "254/1678" still yield
//! tight boxes around each number.

use anyhow::{bail, Context, Result};
use regex::Regex;
use tracing::{debug, trace};

use super::recognition::{RecognitionResult, TextElement};
use super::{DetectedNumber, Quad};
use crate::config::DetectionSettings;

/// Extracts numeric tokens from recognition results
#[derive(Debug, Clone)]
pub struct NumberExtractor {
    /// Unanchored run pattern, used with per-character geometry
    run: Regex,
    /// Anchored pattern, used for the whole-word fallback
    whole: Regex,
}

impl NumberExtractor {
    /// Create an extractor matching runs of `min_digits..=max_digits` ASCII digits
    pub fn new(min_digits: usize, max_digits: usize) -> Result<Self> {
        if min_digits == 0 || min_digits > max_digits {
            bail!(
                "Invalid digit bounds: min {} max {} (need 1 <= min <= max)",
                min_digits,
                max_digits
            );
        }

        let run = Regex::new(&format!("[0-9]{{{},{}}}", min_digits, max_digits))
            .context("Failed to compile digit run pattern")?;
        let whole = Regex::new(&format!("^[0-9]{{{},{}}}$", min_digits, max_digits))
            .context("Failed to compile whole-word pattern")?;

        Ok(Self { run, whole })
    }

    /// Create an extractor from detection settings
    pub fn from_settings(settings: &DetectionSettings) -> Result<Self> {
        Self::new(settings.min_digits, settings.max_digits)
    }

    /// Extract every numeric token from one frame, in scan order
    pub fn extract(&self, result: &RecognitionResult) -> Vec<DetectedNumber> {
        let mut detections = Vec::new();
        for element in result.elements() {
            self.extract_element(element, &mut detections);
        }

        debug!("Extracted {} numeric tokens", detections.len());
        detections
    }

    /// Extract numeric tokens from a single word
    pub fn extract_element(&self, element: &TextElement, out: &mut Vec<DetectedNumber>) {
        match element.symbol_quads() {
            Some(quads) => {
                for run in self.run.find_iter(&element.text) {
                    let first = element.text[..run.start()].chars().count();
                    // Digits are ASCII, so byte length equals char count
                    let last = first + run.as_str().len() - 1;

                    match (quads.get(first), quads.get(last)) {
                        (Some(a), Some(b)) => {
                            trace!("Token '{}' from symbols {}..={}", run.as_str(), first, last);
                            out.push(DetectedNumber::new(run.as_str(), Quad::spanning(a, b)));
                        }
                        _ => trace!("Symbol index out of range for '{}'", element.text),
                    }
                }
            }
            None => {
                let trimmed = element
                    .text
                    .trim_matches(|c: char| !c.is_alphanumeric());
                if !self.whole.is_match(trimmed) {
                    return;
                }

                match element.quad() {
                    Some(quad) => {
                        trace!("Token '{}' from word geometry", trimmed);
                        out.push(DetectedNumber::new(trimmed, quad));
                    }
                    None => trace!("Skipping '{}': malformed word geometry", element.text),
                }
            }
        }
    }
}
