/// Summaries, revenue, and hourly series derived from placement results.
pub mod aggregate;
pub mod orchestrator;
/// Simulated date range.
pub mod period;
pub mod types;
