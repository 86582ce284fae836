//! Results presentation state derived from the placement store.
//!
//! Nothing here owns placement data. [`ResultsView`] only remembers which
//! tab is selected, whether the comparison view is shown, and the pending
//! failure notifications; content is recomputed from the placements on each
//! [`ResultsView::render`].

use std::collections::{BTreeMap, VecDeque};

use serde::Serialize;

use crate::placement::{Placement, PlacementId};
use crate::sim::aggregate::{ResultAggregator, SeriesPoint, Summary};
use crate::sim::orchestrator::RunObserver;

/// Notifications kept before the oldest is dropped.
pub const MAX_NOTIFICATIONS: usize = 8;

/// Bounded FIFO of transient user-facing messages.
#[derive(Debug, Clone)]
pub struct Notifications {
    queue: VecDeque<String>,
    capacity: usize,
}

impl Default for Notifications {
    fn default() -> Self {
        Self::with_capacity(MAX_NOTIFICATIONS)
    }
}

impl Notifications {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            queue: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    /// Appends `message`, evicting the oldest entry when full.
    pub fn push(&mut self, message: impl Into<String>) {
        if self.queue.len() == self.capacity {
            self.queue.pop_front();
        }
        self.queue.push_back(message.into());
    }

    /// Removes and returns the oldest message.
    pub fn dismiss(&mut self) -> Option<String> {
        self.queue.pop_front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.queue.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// Horizontal wind-speed markers drawn on a placement's chart (m/s).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReferenceLines {
    pub cut_in: f64,
    pub rated: f64,
    pub cut_out: f64,
}

/// Detail for the selected placement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndividualView {
    pub id: PlacementId,
    /// One-based tab label position.
    pub tab: usize,
    pub turbine_type: Option<String>,
    /// `None` unless the placement's last run succeeded.
    pub summary: Option<Summary>,
    /// Failure message of the placement's last run.
    pub error: Option<String>,
    /// Total over every placement.
    pub aggregate: Summary,
    pub series: Vec<SeriesPoint>,
    pub reference_lines: Option<ReferenceLines>,
}

/// All successful series on a shared time axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonView {
    pub aggregate: Summary,
    pub series: BTreeMap<PlacementId, Vec<SeriesPoint>>,
}

/// What the results dialog currently shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum ViewContent {
    Individual(IndividualView),
    Comparison(ComparisonView),
}

/// Results dialog state.
#[derive(Debug, Clone, Default)]
pub struct ResultsView {
    open: bool,
    active_tab: usize,
    comparison: bool,
    notifications: Notifications,
}

impl ResultsView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn active_tab(&self) -> usize {
        self.active_tab
    }

    /// Selects tab `index`, clamped to the last placement.
    pub fn select_tab(&mut self, index: usize, placements: &[Placement]) -> usize {
        self.active_tab = index.min(placements.len().saturating_sub(1));
        self.active_tab
    }

    pub fn is_comparison(&self) -> bool {
        self.comparison
    }

    /// Flips between individual and comparison view, returning the new mode.
    pub fn toggle_comparison(&mut self) -> bool {
        self.comparison = !self.comparison;
        self.comparison
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    pub fn notifications_mut(&mut self) -> &mut Notifications {
        &mut self.notifications
    }

    /// Content for the current mode, or `None` while the dialog is closed
    /// or there is nothing to show.
    pub fn render(
        &self,
        placements: &[Placement],
        aggregator: &ResultAggregator,
    ) -> Option<ViewContent> {
        if !self.open {
            return None;
        }
        let aggregate = aggregator.aggregate_summary(placements);

        if self.comparison {
            return Some(ViewContent::Comparison(ComparisonView {
                aggregate,
                series: ResultAggregator::comparison_series(placements),
            }));
        }

        let tab = self.active_tab.min(placements.len().checked_sub(1)?);
        let placement = &placements[tab];
        let result = placement.result.as_ref();
        let reference_lines = result.and_then(|r| r.as_success()).map(|output| ReferenceLines {
            cut_in: output.model.cut_in,
            rated: output.model.rated,
            cut_out: output.model.cut_out,
        });

        Some(ViewContent::Individual(IndividualView {
            id: placement.id,
            tab: tab + 1,
            turbine_type: placement.turbine_type.clone(),
            summary: aggregator.summary(placement),
            error: result.and_then(|r| r.error()).map(str::to_string),
            aggregate,
            series: ResultAggregator::hourly_series(placement),
            reference_lines,
        }))
    }
}

impl RunObserver for ResultsView {
    fn placement_failed(&mut self, _id: PlacementId, message: &str) {
        self.notifications.push(format!("Simulation API error: {message}"));
    }

    fn run_completed(&mut self, placements: &[Placement], present_results: bool) {
        if present_results {
            self.open = true;
        }
        self.active_tab = self.active_tab.min(placements.len().saturating_sub(1));
    }
}
