//! CSV export for hourly yield series.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::placement::PlacementId;
use crate::sim::aggregate::SeriesPoint;

/// Column header for series export.
const HEADER: [&str; 4] = ["placement_id", "timestamp", "energy_mwh", "wind_speed_ms"];

/// Timestamp layout used in the `timestamp` column.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Exports series to a CSV file at the given path.
///
/// Writes a header row followed by one row per hour, placements in id order.
/// Produces deterministic output for identical inputs.
///
/// # Arguments
///
/// * `series` - Hourly series keyed by placement id
/// * `path` - Output file path
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_series_csv(
    series: &BTreeMap<PlacementId, Vec<SeriesPoint>>,
    path: &Path,
) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_series_csv(series, buf)
}

/// Writes series as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_series_csv(
    series: &BTreeMap<PlacementId, Vec<SeriesPoint>>,
    writer: impl Write,
) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(HEADER)?;

    for (id, points) in series {
        for p in points {
            wtr.write_record(&[
                id.get().to_string(),
                p.timestamp.format(TIMESTAMP_FORMAT).to_string(),
                format!("{:.4}", p.energy_mwh),
                format!("{:.2}", p.wind_speed_ms),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
