use crate::verify::Verdict;
use egui::{Align2, Color32, FontId, Painter, Pos2, Rect};

pub const MATCH_LABEL: &str = "MATCH!";
pub const NO_MATCH_LABEL: &str = "NO MATCH!";

const MATCH_COLOR: Color32 = Color32::from_rgb(0, 255, 0);
const NO_MATCH_COLOR: Color32 = Color32::from_rgb(255, 0, 0);

// Fixed stamp position: a little in from the lower-left corner of the video.
const LABEL_MARGIN_X: f32 = 20.0;
const LABEL_MARGIN_Y: f32 = 24.0;
const LABEL_FONT_SIZE: f32 = 48.0;

pub struct Overlay {
    pub label: &'static str,
    pub color: Color32,
}

/// Selects the label and color for a verdict. A failed verification renders
/// the same as a confident no-match.
pub fn overlay_for(verdict: &Verdict) -> Overlay {
    if verdict.is_match() {
        Overlay {
            label: MATCH_LABEL,
            color: MATCH_COLOR,
        }
    } else {
        Overlay {
            label: NO_MATCH_LABEL,
            color: NO_MATCH_COLOR,
        }
    }
}

/// Stamps the verdict label onto the displayed video rect.
pub fn paint(painter: &Painter, video_rect: Rect, verdict: &Verdict) {
    let overlay = overlay_for(verdict);
    let anchor = Pos2::new(
        video_rect.left() + LABEL_MARGIN_X,
        video_rect.bottom() - LABEL_MARGIN_Y,
    );
    painter.text(
        anchor,
        Align2::LEFT_BOTTOM,
        overlay.label,
        FontId::proportional(LABEL_FONT_SIZE),
        overlay.color,
    );
}
