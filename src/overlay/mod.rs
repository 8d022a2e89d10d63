//! Overlay Presentation Layer
//!
//! Lays out published detections on the portrait preview: one rotated box
//! per team, a two-line label sized to fit it, and a link to the team page.
//! Drawing is left to whatever surface renders the preview.

use crate::config::OverlaySettings;
use crate::directory::team_page_url;
use crate::shared::PublishedDetections;
use crate::vision::{DisplayTransform, FrameSize, OverlayBox};

/// Width of an average glyph relative to the font size
const GLYPH_WIDTH_RATIO: f64 = 0.7;
/// Two lines plus leading
const LABEL_HEIGHT_RATIO: f64 = 2.2;

/// One team label ready to draw in display space
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayItem {
    /// Detected team number
    pub number: String,
    /// Number and team name, one per line
    pub label: String,
    pub rect: OverlayBox,
    pub font_size: f64,
    /// Where tapping the label should lead
    pub team_page: String,
}

/// Largest whole font size at which `text` fits a `width` x `height` box,
/// clamped to `[min_font_size, max_font_size]`
pub fn calculate_font_size(
    text: &str,
    width: f64,
    height: f64,
    max_font_size: f64,
    min_font_size: f64,
) -> f64 {
    let longest_line = text.lines().map(|l| l.chars().count()).max().unwrap_or(0);

    let by_height = height / LABEL_HEIGHT_RATIO;
    let fitted = if longest_line == 0 {
        by_height
    } else {
        by_height.min(width / (longest_line as f64 * GLYPH_WIDTH_RATIO))
    };

    if fitted.is_nan() {
        return min_font_size;
    }
    fitted.floor().min(max_font_size).max(min_font_size)
}

/// Lay out every published detection for a preview of `preview` size.
///
/// Returns nothing while the preview has no size yet.
pub fn layout(
    published: &PublishedDetections,
    preview: FrameSize,
    settings: &OverlaySettings,
) -> Vec<OverlayItem> {
    let Some(transform) = DisplayTransform::new(published.frame_size, preview) else {
        return Vec::new();
    };

    published
        .detections
        .iter()
        .filter_map(|detection| {
            let team = detection.team_info.as_ref()?;
            let rect = OverlayBox::from_quad(&transform.quad_to_display(&detection.corner_points));
            let label = format!("{}\n{}", detection.text, team.name);
            let font_size = calculate_font_size(
                &label,
                rect.width,
                rect.height,
                settings.max_font_size,
                settings.min_font_size,
            );

            Some(OverlayItem {
                number: detection.text.clone(),
                team_page: team_page_url(&settings.team_page_template, &detection.text),
                label,
                rect,
                font_size,
            })
        })
        .collect()
}
