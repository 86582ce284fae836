//! Simulated date range, in either of the two forms the yield service accepts.

use chrono::NaiveDate;

use crate::error::{Error, Result};

/// The period a yield simulation covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationPeriod {
    /// Inclusive calendar range.
    DateRange { start: NaiveDate, end: NaiveDate },
    /// Number of days starting today, as chosen by the service.
    Days(u32),
}

impl SimulationPeriod {
    /// Checks the period before any service call is made.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the end date precedes the start date
    /// or the day count is zero.
    pub fn validate(&self) -> Result<()> {
        match *self {
            Self::DateRange { start, end } if end < start => Err(Error::Validation(format!(
                "end date {end} cannot be before start date {start}"
            ))),
            Self::Days(0) => Err(Error::Validation("days must be > 0".to_string())),
            _ => Ok(()),
        }
    }

    /// Number of simulated days.
    pub fn num_days(&self) -> u32 {
        match *self {
            Self::DateRange { start, end } => {
                u32::try_from((end - start).num_days() + 1).unwrap_or(0)
            }
            Self::Days(days) => days,
        }
    }
}
