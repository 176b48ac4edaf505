//! Viewport-aware placement for word tooltips.
//!
//! Tooltips are assumed to be a fixed width; their height is measured when
//! available and estimated otherwise. Primary and secondary tooltips are
//! positioned independently and may overlap each other.

use serde::Serialize;
use std::fmt;

/// Assumed rendered width of every tooltip.
pub const TOOLTIP_WIDTH: f64 = 300.0;
/// Minimum distance kept between a tooltip and the viewport edges.
pub const EDGE_MARGIN: f64 = 10.0;
/// Vertical gap between the anchor word and the tooltip.
pub const ANCHOR_GAP: f64 = 10.0;
/// Height used before the tooltip has been laid out.
pub const ESTIMATED_HEIGHT: f64 = 120.0;
/// Arrow position from the tooltip's left edge when no offset is applied.
pub const DEFAULT_ARROW_OFFSET: f64 = 20.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn center_x(&self) -> f64 {
        self.left + self.width / 2.0
    }
}

/// Visible area plus the current scroll offset of the page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub scroll_x: f64,
    pub scroll_y: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            scroll_x: 0.0,
            scroll_y: 0.0,
        }
    }

    pub fn scrolled(mut self, scroll_x: f64, scroll_y: f64) -> Self {
        self.scroll_x = scroll_x;
        self.scroll_y = scroll_y;
        self
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 800.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    Above,
    Below,
}

impl Placement {
    pub fn css_class(&self) -> &'static str {
        match self {
            Placement::Above => "tooltip-above",
            Placement::Below => "tooltip-below",
        }
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Placement::Above => write!(f, "above"),
            Placement::Below => write!(f, "below"),
        }
    }
}

/// Page coordinates for a tooltip. `arrow_offset` is `None` when the arrow
/// stays at its default position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TooltipPosition {
    pub left: f64,
    pub top: f64,
    pub arrow_offset: Option<f64>,
}

/// Computes where a tooltip anchored to `anchor` (viewport coordinates)
/// should be drawn.
///
/// A missing or zero `tooltip_height` falls back to [`ESTIMATED_HEIGHT`].
/// An `Above` tooltip that would leave the top edge is pinned to the margin
/// and may cover its anchor; it is never flipped below.
pub fn position(
    anchor: Rect,
    tooltip_height: Option<f64>,
    viewport: Viewport,
    placement: Placement,
) -> TooltipPosition {
    let height = tooltip_height
        .filter(|h| *h > 0.0)
        .unwrap_or(ESTIMATED_HEIGHT);
    let anchor_mid = anchor.center_x() + viewport.scroll_x;

    let min_left = viewport.scroll_x + EDGE_MARGIN;
    let max_left = (viewport.scroll_x + viewport.width - TOOLTIP_WIDTH - EDGE_MARGIN).max(min_left);
    let left = (anchor_mid - TOOLTIP_WIDTH / 2.0).clamp(min_left, max_left);

    let top = match placement {
        Placement::Above => {
            let top = anchor.top + viewport.scroll_y - height - ANCHOR_GAP;
            top.max(viewport.scroll_y + EDGE_MARGIN)
        }
        Placement::Below => {
            let top = anchor.bottom() + viewport.scroll_y + ANCHOR_GAP;
            let limit = viewport.scroll_y + viewport.height - EDGE_MARGIN;
            if top + height > limit {
                limit - height
            } else {
                top
            }
        }
    };

    TooltipPosition {
        left,
        top,
        arrow_offset: arrow_offset(anchor_mid, left),
    }
}

fn arrow_offset(anchor_mid: f64, left: f64) -> Option<f64> {
    let offset = anchor_mid - left - DEFAULT_ARROW_OFFSET;
    (offset > EDGE_MARGIN && offset < TOOLTIP_WIDTH - DEFAULT_ARROW_OFFSET).then_some(offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word_at(left: f64, top: f64) -> Rect {
        Rect::new(left, top, 0.0, 20.0)
    }

    #[test]
    fn clamps_to_left_edge() {
        let pos = position(
            word_at(5.0, 400.0),
            None,
            Viewport::new(800.0, 600.0),
            Placement::Above,
        );
        assert_eq!(pos.left, 10.0);
    }

    #[test]
    fn clamps_to_right_edge() {
        let pos = position(
            Rect::new(780.0, 400.0, 10.0, 20.0),
            None,
            Viewport::new(800.0, 600.0),
            Placement::Above,
        );
        assert_eq!(pos.left, 800.0 - TOOLTIP_WIDTH - 10.0);
    }

    #[test]
    fn centers_over_anchor_when_room() {
        let pos = position(
            Rect::new(380.0, 400.0, 40.0, 20.0),
            Some(80.0),
            Viewport::new(800.0, 600.0),
            Placement::Above,
        );
        assert_eq!(pos.left, 250.0);
        assert_eq!(pos.top, 400.0 - 80.0 - 10.0);
        assert_eq!(pos.arrow_offset, Some(130.0));
    }

    #[test]
    fn narrow_viewport_never_goes_negative() {
        let pos = position(
            word_at(100.0, 400.0),
            None,
            Viewport::new(200.0, 600.0),
            Placement::Above,
        );
        assert_eq!(pos.left, 10.0);
    }

    #[test]
    fn above_pins_to_top_margin() {
        let pos = position(
            word_at(400.0, 30.0),
            None,
            Viewport::new(800.0, 600.0),
            Placement::Above,
        );
        assert_eq!(pos.top, 10.0);
    }

    #[test]
    fn below_sits_under_anchor() {
        let pos = position(
            Rect::new(400.0, 100.0, 40.0, 20.0),
            Some(50.0),
            Viewport::new(800.0, 600.0),
            Placement::Below,
        );
        assert_eq!(pos.top, 130.0);
    }

    #[test]
    fn below_clamps_to_viewport_bottom() {
        let pos = position(
            Rect::new(400.0, 560.0, 40.0, 20.0),
            None,
            Viewport::new(800.0, 600.0),
            Placement::Below,
        );
        assert_eq!(pos.top, 600.0 - ESTIMATED_HEIGHT - 10.0);
    }

    #[test]
    fn zero_height_uses_estimate() {
        let measured = position(word_at(400.0, 300.0), Some(0.0), Viewport::new(800.0, 600.0), Placement::Above);
        let estimated = position(word_at(400.0, 300.0), None, Viewport::new(800.0, 600.0), Placement::Above);
        assert_eq!(measured, estimated);
        assert_eq!(estimated.top, 300.0 - ESTIMATED_HEIGHT - 10.0);
    }

    #[test]
    fn scroll_offsets_shift_page_coordinates() {
        let viewport = Viewport::new(800.0, 600.0).scrolled(0.0, 1000.0);
        let pos = position(Rect::new(400.0, 30.0, 40.0, 20.0), None, viewport, Placement::Above);
        assert_eq!(pos.top, 1010.0);
        let pos = position(Rect::new(400.0, 300.0, 40.0, 20.0), None, viewport, Placement::Below);
        assert_eq!(pos.top, 1330.0);
    }

    #[test]
    fn arrow_stays_default_near_edges() {
        // Anchor hard against the left edge: offset would be negative.
        let pos = position(word_at(5.0, 400.0), None, Viewport::new(800.0, 600.0), Placement::Above);
        assert_eq!(pos.arrow_offset, None);
        // Anchor far right of a clamped tooltip: offset beyond the band.
        let pos = position(word_at(798.0, 400.0), None, Viewport::new(800.0, 600.0), Placement::Above);
        assert_eq!(pos.arrow_offset, None);
    }

    #[test]
    fn arrow_follows_anchor_inside_band() {
        let pos = position(word_at(60.0, 400.0), None, Viewport::new(800.0, 600.0), Placement::Below);
        assert_eq!(pos.left, 10.0);
        assert_eq!(pos.arrow_offset, Some(30.0));
    }
}
