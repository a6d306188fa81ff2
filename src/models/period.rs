use chrono::{Datelike, Local, NaiveDate};

use crate::error::{LedgerError, LedgerResult};

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

/// A calendar month in `YYYY-MM` form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct Month(String);

impl Month {
    pub(crate) fn parse(s: &str) -> LedgerResult<Self> {
        let s = s.trim();
        let invalid = || LedgerError::InvalidMonth(s.to_string());

        let (year, month) = s.split_once('-').ok_or_else(invalid)?;
        if s.len() != 7
            || year.len() != 4
            || !year.bytes().all(|b| b.is_ascii_digit())
            || !month.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }
        let mm: u32 = month.parse().map_err(|_| invalid())?;
        if !(1..=12).contains(&mm) {
            return Err(invalid());
        }
        Ok(Self(s.to_string()))
    }

    pub(crate) fn of(date: NaiveDate) -> Self {
        Self(format!("{:04}-{:02}", date.year(), date.month()))
    }

    pub(crate) fn current() -> Self {
        Self::of(Local::now().date_naive())
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }

    /// `LIKE` pattern matching every ISO date inside this month.
    pub(crate) fn date_pattern(&self) -> String {
        format!("{}-%", self.0)
    }
}

impl std::fmt::Display for Month {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parse `YYYY-MM-DD` or the word `today`.
pub(crate) fn parse_date(s: &str) -> LedgerResult<NaiveDate> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("today") {
        return Ok(Local::now().date_naive());
    }
    NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|_| LedgerError::InvalidDate(s.to_string()))
}
