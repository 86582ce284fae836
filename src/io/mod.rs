/// CSV export of hourly yield series.
pub mod export;
