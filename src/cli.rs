//! Command-line arguments for the `windlytics` binary.

use std::path::PathBuf;

use chrono::{Days, NaiveDate};
use clap::{Args, Parser};

use crate::error::{Error, Result};
use crate::geo::{GeoBox, GeoPoint};
use crate::sim::period::SimulationPeriod;

/// Days after today covered when no period is given.
pub const DEFAULT_PERIOD_DAYS: u64 = 7;

#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Offshore wind placement yield and revenue estimator",
    long_about = None
)]
pub struct Cli {
    #[command(flatten)]
    pub source: ConfigSource,

    /// TOML file of recorded placement clicks (`[[sites]]` with lat, lng, model).
    #[arg(long)]
    pub sites: PathBuf,

    #[command(flatten)]
    pub period: PeriodArgs,

    /// Area as `sw_lat,sw_lng,ne_lat,ne_lng` (corners in any order).
    #[arg(long, value_parser = parse_area, allow_hyphen_values = true)]
    pub area: Option<GeoBox>,

    /// Ask the generation service for this many placements inside `--area`.
    #[arg(long, requires = "area")]
    pub generate: Option<u32>,

    /// Catalog key assigned to every generated placement.
    #[arg(long, requires = "generate")]
    pub generate_model: Option<String>,

    /// JSON list of named places; those inside `--area` are printed.
    #[arg(long, requires = "area")]
    pub places: Option<PathBuf>,

    /// Write the hourly series of every successful placement to CSV.
    #[arg(long)]
    pub series_out: Option<PathBuf>,

    /// Serve the read-only results API after the run.
    #[cfg(feature = "api")]
    #[arg(long, default_value_t = false)]
    pub serve: bool,

    /// API server port.
    #[cfg(feature = "api")]
    #[arg(long, default_value_t = 3000)]
    pub port: u16,
}

#[derive(Args, Debug, Clone, Default)]
#[group(required = false, multiple = false)]
pub struct ConfigSource {
    /// Load configuration from a TOML file.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Use a built-in preset (nova_scotia, unbounded).
    #[arg(long)]
    pub preset: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct PeriodArgs {
    /// First simulated day, YYYY-MM-DD.
    #[arg(long, requires = "end", conflicts_with = "days")]
    pub start: Option<NaiveDate>,
    /// Last simulated day (inclusive), YYYY-MM-DD.
    #[arg(long, requires = "start", conflicts_with = "days")]
    pub end: Option<NaiveDate>,
    /// Number of days to simulate, starting today.
    #[arg(long)]
    pub days: Option<u32>,
}

impl PeriodArgs {
    /// The requested period, or `today ..= today + 7` when none is given.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the period is invalid.
    pub fn period(&self, today: NaiveDate) -> Result<SimulationPeriod> {
        let period = match (self.start, self.end, self.days) {
            (Some(start), Some(end), _) => SimulationPeriod::DateRange { start, end },
            (_, _, Some(days)) => SimulationPeriod::Days(days),
            _ => SimulationPeriod::DateRange {
                start: today,
                end: today
                    .checked_add_days(Days::new(DEFAULT_PERIOD_DAYS))
                    .ok_or_else(|| Error::Validation(format!("date overflow after {today}")))?,
            },
        };
        period.validate()?;
        Ok(period)
    }
}

fn parse_area(s: &str) -> std::result::Result<GeoBox, String> {
    let values = s
        .split(',')
        .map(|v| v.trim().parse::<f64>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid coordinate in \"{s}\": {e}"))?;
    match values[..] {
        [a_lat, a_lng, b_lat, b_lng] => Ok(GeoBox::from_corners(
            GeoPoint::new(a_lat, a_lng),
            GeoPoint::new(b_lat, b_lng),
        )),
        _ => Err(format!(
            "expected 4 comma-separated numbers, got {}",
            values.len()
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> std::result::Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("windlytics").chain(args.iter().copied()))
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
    }

    #[test]
    fn minimal_invocation_uses_default_period() {
        let cli = parse(&["--sites", "sites.toml"]).unwrap();
        assert_eq!(cli.sites, PathBuf::from("sites.toml"));
        assert!(cli.source.config.is_none());
        assert_eq!(
            cli.period.period(date(2025, 3, 1)).ok(),
            Some(SimulationPeriod::DateRange {
                start: date(2025, 3, 1),
                end: date(2025, 3, 8),
            })
        );
    }

    #[test]
    fn sites_is_required() {
        assert!(parse(&["--preset", "nova_scotia"]).is_err());
    }

    #[test]
    fn config_and_preset_conflict() {
        let args = ["--sites", "s.toml", "--config", "a.toml", "--preset", "unbounded"];
        assert!(parse(&args).is_err());
    }

    #[test]
    fn date_range_is_parsed_and_validated() {
        let args = ["--sites", "s.toml", "--start", "2025-03-01", "--end", "2025-03-07"];
        let cli = parse(&args).unwrap();
        assert_eq!(
            cli.period.period(date(2000, 1, 1)).map(|p| p.num_days()).ok(),
            Some(7)
        );

        let args = ["--sites", "s.toml", "--start", "2025-03-07", "--end", "2025-03-01"];
        let reversed = parse(&args).unwrap();
        assert!(matches!(
            reversed.period.period(date(2000, 1, 1)),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn start_requires_end_and_days_conflicts() {
        let args = ["--sites", "s.toml", "--start", "2025-03-01"];
        assert!(parse(&args).is_err());
        let args = [
            "--sites",
            "s.toml",
            "--start",
            "2025-03-01",
            "--end",
            "2025-03-02",
            "--days",
            "3",
        ];
        assert!(parse(&args).is_err());
    }

    #[test]
    fn zero_days_is_rejected() {
        let cli = parse(&["--sites", "s.toml", "--days", "0"]).unwrap();
        assert!(cli.period.period(date(2025, 1, 1)).is_err());
    }

    #[test]
    fn area_is_normalized_and_generate_requires_it() {
        let args = ["--sites", "s.toml", "--area", "44.5,-62.0,44.0,-63.0", "--generate", "5"];
        let cli = parse(&args).unwrap();
        let area = cli.area.unwrap();
        assert_eq!(area.sw(), GeoPoint::new(44.0, -63.0));
        assert_eq!(cli.generate, Some(5));

        assert!(parse(&["--sites", "s.toml", "--generate", "5"]).is_err());
        let args = ["--sites", "s.toml", "--area", "44.5,-62.0"];
        assert!(parse(&args).is_err());
    }

    #[test]
    fn generate_model_requires_generate() {
        let args = [
            "--sites",
            "s.toml",
            "--area",
            "44.0,-63.0,44.5,-62.0",
            "--generate",
            "3",
            "--generate-model",
            "SWT-7.0-154",
        ];
        let cli = parse(&args).unwrap();
        assert_eq!(cli.generate_model.as_deref(), Some("SWT-7.0-154"));

        let args = [
            "--sites",
            "s.toml",
            "--area",
            "44.0,-63.0,44.5,-62.0",
            "--generate-model",
            "x",
        ];
        assert!(parse(&args).is_err());
    }
}
