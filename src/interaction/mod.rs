//! Map interaction handling: click debouncing and two-click area selection.

pub mod debounce;
pub mod selector;

/// What a click landed on, as determined by the map widget's hit-testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// The base map (tiles), not any rendered element.
    BaseMap,
    /// The temporary marker shown for a pending first corner.
    PendingMarker,
    /// An already-rendered interactive overlay such as the confirmed area.
    Overlay,
}
