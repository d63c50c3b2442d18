//! Reiwa era date normalization.

use chrono::NaiveDate;

/// Gregorian year = Reiwa year + offset (令和1年 = 2019).
pub const REIWA_OFFSET: u32 = 2018;

/// Convert a Reiwa year to its Gregorian year.
pub fn reiwa_to_gregorian(era_year: u32) -> u32 {
    REIWA_OFFSET.saturating_add(era_year)
}

/// A date as written on the certificate: Reiwa year, month, day.
///
/// No calendar validation is performed; `month = 13` is carried through
/// unchanged. [`EraDate::to_naive_date`] reports whether the date exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EraDate {
    pub era_year: u32,
    pub month: u32,
    pub day: u32,
}

impl EraDate {
    pub fn new(era_year: u32, month: u32, day: u32) -> Self {
        Self {
            era_year,
            month,
            day,
        }
    }

    pub fn gregorian_year(&self) -> u32 {
        reiwa_to_gregorian(self.era_year)
    }

    /// Ordering key by month and day only: `100 * month + day`.
    pub fn sort_key(&self) -> u32 {
        self.month.saturating_mul(100).saturating_add(self.day)
    }

    /// `YYYY/MM/DD`.
    pub fn format(&self) -> String {
        format!(
            "{:04}/{:02}/{:02}",
            self.gregorian_year(),
            self.month,
            self.day
        )
    }

    /// The Gregorian calendar date, if it exists.
    pub fn to_naive_date(&self) -> Option<NaiveDate> {
        let year = i32::try_from(self.gregorian_year()).ok()?;
        NaiveDate::from_ymd_opt(year, self.month, self.day)
    }
}
