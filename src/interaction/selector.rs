//! Two-click bounding-box selection.

use std::time::Duration;

use tracing::debug;

use super::ClickTarget;
use super::debounce::ClickDebouncer;
use crate::geo::{GeoBox, GeoPoint};

/// Selector state between clicks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectorState {
    /// No corner pending.
    Idle,
    /// One corner recorded and shown as a temporary marker.
    FirstCornerPlaced(GeoPoint),
}

/// Outcome of feeding one click to the selector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectorEvent {
    /// Click landed on an overlay element; the selector did not look at it.
    Ignored,
    /// Click arrived inside the debounce window and was dropped.
    Debounced,
    /// First corner recorded.
    CornerPlaced(GeoPoint),
    /// Pending marker clicked; selection abandoned.
    Cancelled,
    /// Second corner closed the box.
    Completed(GeoBox),
}

/// Turns map clicks into at most one confirmed [`GeoBox`] at a time.
///
/// A completed box replaces any previously confirmed one. The confirmed box
/// is drawn as an overlay; clicks on it are the overlay's own business (it
/// deletes itself via [`AreaSelector::clear_selection`]).
#[derive(Debug, Clone)]
pub struct AreaSelector {
    state: SelectorState,
    debouncer: ClickDebouncer,
    selection: Option<GeoBox>,
}

impl AreaSelector {
    pub fn new(debounce_window: Duration) -> Self {
        Self {
            state: SelectorState::Idle,
            debouncer: ClickDebouncer::new(debounce_window),
            selection: None,
        }
    }

    pub fn debounce_window(&self) -> Duration {
        self.debouncer.window()
    }

    pub fn state(&self) -> SelectorState {
        self.state
    }

    /// Position of the temporary first-corner marker, if any.
    pub fn pending_corner(&self) -> Option<GeoPoint> {
        match self.state {
            SelectorState::Idle => None,
            SelectorState::FirstCornerPlaced(corner) => Some(corner),
        }
    }

    /// The currently confirmed area.
    pub fn selection(&self) -> Option<GeoBox> {
        self.selection
    }

    /// Feeds one click at `now` to the selector.
    pub fn click(&mut self, target: ClickTarget, point: GeoPoint, now: Duration) -> SelectorEvent {
        if target == ClickTarget::Overlay {
            return SelectorEvent::Ignored;
        }
        if !self.debouncer.admit(now) {
            debug!(?point, "area click debounced");
            return SelectorEvent::Debounced;
        }

        match (self.state, target) {
            (SelectorState::FirstCornerPlaced(_), ClickTarget::PendingMarker) => {
                self.state = SelectorState::Idle;
                SelectorEvent::Cancelled
            }
            // No marker is rendered while idle, so a marker hit is stale.
            (SelectorState::Idle, ClickTarget::PendingMarker) => SelectorEvent::Ignored,
            (SelectorState::Idle, _) => {
                self.state = SelectorState::FirstCornerPlaced(point);
                SelectorEvent::CornerPlaced(point)
            }
            (SelectorState::FirstCornerPlaced(first), _) => {
                let area = GeoBox::from_corners(first, point);
                self.state = SelectorState::Idle;
                self.selection = Some(area);
                SelectorEvent::Completed(area)
            }
        }
    }

    /// Deletes the confirmed area, returning it.
    pub fn clear_selection(&mut self) -> Option<GeoBox> {
        self.selection.take()
    }
}
