//! Recognizer output structures
//!
//! Mirrors the block -> line -> element tree produced by the on-device text
//! recognizer. Geometry fields are optional because recognizers drop them
//! for low-confidence words.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{Point, Quad};

/// Full recognition result for one frame
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecognitionResult {
    #[serde(default)]
    pub blocks: Vec<TextBlock>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextBlock {
    #[serde(default)]
    pub lines: Vec<TextLine>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextLine {
    #[serde(default)]
    pub elements: Vec<TextElement>,
}

/// A recognized word
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextElement {
    pub text: String,
    #[serde(default)]
    pub corner_points: Option<Vec<Point>>,
    /// Per-character geometry, one entry per character of `text`
    #[serde(default)]
    pub symbols: Option<Vec<TextSymbol>>,
}

/// A single recognized glyph
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextSymbol {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub corner_points: Option<Vec<Point>>,
}

impl TextElement {
    /// Whole-word quad, if the recognizer supplied four corners
    pub fn quad(&self) -> Option<Quad> {
        self.corner_points.as_deref().and_then(Quad::from_points)
    }

    /// Per-character quads, indexable by character position in `text`.
    ///
    /// `None` when symbols are missing, when their count does not match the
    /// character count, or when any symbol lacks a four-point quad.
    pub fn symbol_quads(&self) -> Option<Vec<Quad>> {
        let symbols = self.symbols.as_ref()?;
        if symbols.is_empty() || symbols.len() != self.text.chars().count() {
            return None;
        }

        symbols
            .iter()
            .map(|s| s.corner_points.as_deref().and_then(Quad::from_points))
            .collect()
    }
}

impl RecognitionResult {
    /// Parse a recognition result from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse recognition result")
    }

    /// Load a recognition result from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read recognition result: {:?}", path))?;
        Self::from_json(&content)
    }

    /// Iterate over every element in scan order (block, line, element)
    pub fn elements(&self) -> impl Iterator<Item = &TextElement> {
        self.blocks
            .iter()
            .flat_map(|b| b.lines.iter())
            .flat_map(|l| l.elements.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_recognizer_json() {
        let json = r#"{
            "blocks": [{
                "lines": [{
                    "elements": [{
                        "text": "254",
                        "cornerPoints": [
                            {"x": 0, "y": 0}, {"x": 30, "y": 0},
                            {"x": 30, "y": 10}, {"x": 0, "y": 10}
                        ],
                        "symbols": [
                            {"cornerPoints": [{"x": 0, "y": 0}, {"x": 10, "y": 0}, {"x": 10, "y": 10}, {"x": 0, "y": 10}]},
                            {"cornerPoints": [{"x": 10, "y": 0}, {"x": 20, "y": 0}, {"x": 20, "y": 10}, {"x": 10, "y": 10}]},
                            {"cornerPoints": [{"x": 20, "y": 0}, {"x": 30, "y": 0}, {"x": 30, "y": 10}, {"x": 20, "y": 10}]}
                        ]
                    }]
                }]
            }]
        }"#;

        let result = RecognitionResult::from_json(json).unwrap();
        let element = result.elements().next().unwrap();
        assert_eq!(element.text, "254");
        assert!(element.quad().is_some());
        assert_eq!(element.symbol_quads().unwrap().len(), 3);
    }

    #[test]
    fn test_missing_fields_default() {
        let result = RecognitionResult::from_json(r#"{"blocks": [{"lines": [{"elements": [{"text": "x"}]}]}]}"#).unwrap();
        let element = result.elements().next().unwrap();
        assert!(element.quad().is_none());
        assert!(element.symbol_quads().is_none());

        let empty = RecognitionResult::from_json("{}").unwrap();
        assert_eq!(empty.elements().count(), 0);
    }

    #[test]
    fn test_symbol_quads_rejects_mismatched_count() {
        let square = vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
        ];
        let element = TextElement {
            text: "1234".to_string(),
            corner_points: None,
            symbols: Some(vec![
                TextSymbol { text: None, corner_points: Some(square.clone()) };
                3
            ]),
        };
        assert!(element.symbol_quads().is_none());
    }

    #[test]
    fn test_symbol_quads_rejects_short_symbol() {
        let square = vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
        ];
        let element = TextElement {
            text: "12".to_string(),
            corner_points: None,
            symbols: Some(vec![
                TextSymbol { text: None, corner_points: Some(square) },
                TextSymbol { text: None, corner_points: Some(vec![Point::default(); 2]) },
            ]),
        };
        assert!(element.symbol_quads().is_none());
    }

    #[test]
    fn test_load_missing_file() {
        assert!(RecognitionResult::load(Path::new("/nonexistent/frame.json")).is_err());
    }
}
