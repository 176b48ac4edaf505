use crate::geometry::{Rect, Viewport};
use crate::surface::{Surface, TooltipNode};

/// Measurements the annotator needs from whatever actually draws the page.
pub trait Layout {
    fn viewport(&self) -> Viewport;

    /// Bounding box of the clue word at `position`, in viewport coordinates.
    fn token_rect(&self, surface: &Surface, position: usize) -> Option<Rect>;

    /// Measured tooltip height, if it has been laid out.
    fn tooltip_height(&self, _tooltip: &TooltipNode) -> Option<f64> {
        None
    }
}

/// Monospace flow layout for environments without a real renderer.
///
/// Words are laid out left to right from `origin`, separated by one cell,
/// and wrap once a line would exceed `wrap_width`.
#[derive(Debug, Clone, Copy)]
pub struct GridLayout {
    pub cell_width: f64,
    pub line_height: f64,
    pub origin: (f64, f64),
    pub wrap_width: f64,
    pub viewport: Viewport,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            cell_width: 8.0,
            line_height: 16.0,
            origin: (40.0, 320.0),
            wrap_width: 720.0,
            viewport: Viewport::default(),
        }
    }
}

impl GridLayout {
    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    pub fn with_origin(mut self, left: f64, top: f64) -> Self {
        self.origin = (left, top);
        self
    }

    fn word_width(&self, word: &str) -> f64 {
        word.chars().count() as f64 * self.cell_width
    }
}

impl Layout for GridLayout {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn token_rect(&self, surface: &Surface, position: usize) -> Option<Rect> {
        let (origin_x, origin_y) = self.origin;
        let mut x = origin_x;
        let mut y = origin_y;
        for token in surface.tokens() {
            let width = self.word_width(&token.text);
            if x > origin_x && x + width > origin_x + self.wrap_width {
                x = origin_x;
                y += self.line_height;
            }
            if token.position == Some(position) {
                return Some(Rect::new(x, y, width, self.line_height));
            }
            x += width + self.cell_width;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{Element, RegionId};

    fn surface_with(words: &[&str]) -> Surface {
        let mut surface = Surface::new();
        for (index, word) in words.iter().enumerate() {
            surface.append(
                RegionId::InteractiveClue,
                Element::inline("clue-word").with_text(*word).with_position(index),
            );
        }
        surface
    }

    #[test]
    fn lays_words_left_to_right() {
        let surface = surface_with(&["Fast", "runner"]);
        let layout = GridLayout::default().with_origin(0.0, 100.0);
        assert_eq!(
            layout.token_rect(&surface, 0),
            Some(Rect::new(0.0, 100.0, 32.0, 16.0))
        );
        assert_eq!(
            layout.token_rect(&surface, 1),
            Some(Rect::new(40.0, 100.0, 48.0, 16.0))
        );
        assert_eq!(layout.token_rect(&surface, 2), None);
    }

    #[test]
    fn wraps_long_lines() {
        let surface = surface_with(&["abcdefghij", "abcdefghij"]);
        let layout = GridLayout {
            wrap_width: 100.0,
            ..GridLayout::default()
        }
        .with_origin(0.0, 0.0);
        assert_eq!(
            layout.token_rect(&surface, 1),
            Some(Rect::new(0.0, 16.0, 80.0, 16.0))
        );
    }
}
