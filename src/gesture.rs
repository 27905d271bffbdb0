//! Touch gesture classification for the card grid.
//!
//! The grid scrolls horizontally; the kiosk page itself must not scroll
//! vertically under a finger. Each gesture is classified once: as soon as a
//! move shows more horizontal than vertical travel from the touch origin, the
//! gesture is horizontal until the finger lifts and the browser keeps its
//! default scrolling. Until then every move suppresses the default.
//!
//! The page script in `static/kiosk.js` applies the same rule in the browser.

/// Result of feeding one move event to the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    pub horizontal: bool,
    /// Whether the host should cancel the event's default scrolling.
    pub suppress_default: bool,
}

#[derive(Debug, Clone, Default)]
pub struct GestureTracker {
    origin: Option<(f64, f64)>,
    horizontal: bool,
}

impl GestureTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begins a gesture, discarding any previous classification.
    pub fn touch_start(&mut self, x: f64, y: f64) {
        self.origin = Some((x, y));
        self.horizontal = false;
    }

    pub fn touch_move(&mut self, x: f64, y: f64) -> MoveOutcome {
        let Some((x0, y0)) = self.origin else {
            return MoveOutcome {
                horizontal: false,
                suppress_default: false,
            };
        };

        if !self.horizontal && (x - x0).abs() > (y - y0).abs() {
            self.horizontal = true;
        }
        MoveOutcome {
            horizontal: self.horizontal,
            suppress_default: !self.horizontal,
        }
    }

    pub fn touch_end(&mut self) {
        self.origin = None;
    }

    pub fn is_horizontal(&self) -> bool {
        self.horizontal
    }
}
