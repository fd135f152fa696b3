//! Reporting windows and the policies that turn loose query input into one.

use chrono::{Datelike, Duration, Local, NaiveDate};

use crate::form_utils::{parse_iso_date, parse_leading_int};

/// A half-open date interval `[start, end)` over which transactions are
/// aggregated.
///
/// `Month` keeps the requested numbers as given. A month outside `1..=12`
/// has no bounds and every aggregation over it is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportWindow {
    Month { year: i32, month: i32 },
    Range { start: NaiveDate, end: NaiveDate },
}

impl ReportWindow {
    pub fn month(year: i32, month: i32) -> Self {
        Self::Month { year, month }
    }

    pub fn month_of(date: NaiveDate) -> Self {
        Self::Month {
            year: date.year(),
            month: date.month() as i32,
        }
    }

    /// `start` inclusive, `end` exclusive. `None` when `start > end`.
    pub fn range(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (start <= end).then_some(Self::Range { start, end })
    }

    /// Inclusive calendar range `from..=to`.
    pub fn from_dates(from: NaiveDate, to: NaiveDate) -> Option<Self> {
        Self::range(from, to.succ_opt()?)
    }

    pub fn single_day(date: NaiveDate) -> Self {
        Self::Range {
            start: date,
            end: date.succ_opt().unwrap_or(date),
        }
    }

    /// The `days` calendar days before `today`, plus `today` itself.
    pub fn rolling_days(days: i64, today: NaiveDate) -> Self {
        let start = Duration::try_days(days.max(0))
            .and_then(|span| today.checked_sub_signed(span))
            .unwrap_or(NaiveDate::MIN);
        Self::Range {
            start,
            end: today.succ_opt().unwrap_or(today),
        }
    }

    /// Concrete `[start, end)` bounds, or `None` when the window cannot
    /// contain any date.
    pub fn bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        match *self {
            Self::Month { year, month } => {
                let month = u32::try_from(month).ok().filter(|m| (1..=12).contains(m))?;
                let start = NaiveDate::from_ymd_opt(year, month, 1)?;
                let end = shift_months(start, 1)?;
                Some((start, end))
            }
            Self::Range { start, end } => Some((start, end)),
        }
    }

    #[cfg(test)]
    pub(crate) fn contains(&self, date: NaiveDate) -> bool {
        self.bounds()
            .is_some_and(|(start, end)| start <= date && date < end)
    }

    /// The adjacent window of the same granularity that ends where this one
    /// starts. Windows without bounds have no predecessor and return
    /// themselves.
    pub fn previous(&self) -> Self {
        let Some((start, end)) = self.bounds() else {
            return *self;
        };
        match *self {
            Self::Month { .. } => shift_months(start, -1)
                .map(Self::month_of)
                .unwrap_or(*self),
            Self::Range { .. } => start
                .checked_sub_signed(end - start)
                .map(|prev_start| Self::Range {
                    start: prev_start,
                    end: start,
                })
                .unwrap_or(*self),
        }
    }

    /// First and last calendar day covered, for display.
    pub fn inclusive_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let (start, end) = self.bounds()?;
        if start == end {
            return None;
        }
        Some((start, end.pred_opt()?))
    }
}

/// How a window is chosen when the caller names no period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowPolicy {
    /// Report views: the current calendar month.
    CurrentMonth,
    /// Dashboard views: the last `n` days up to and including today.
    RollingDays(i64),
}

/// Raw window selection as it arrives on a query string. Nothing here is
/// ever rejected; unusable values read as absent.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WindowRequest {
    pub year: Option<i32>,
    pub month: Option<i32>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
}

impl WindowRequest {
    /// Reads the window keys out of raw query pairs. A key given more than
    /// once reads as its values joined with commas, so `month=abc&month=1`
    /// is unusable while `month=1&month=abc` still reads as 1.
    pub fn from_query(pairs: &[(String, String)]) -> Self {
        let value = |key: &str| {
            let values: Vec<&str> = pairs
                .iter()
                .filter(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
                .collect();
            (!values.is_empty()).then(|| values.join(","))
        };

        Self {
            year: value("year").as_deref().and_then(parse_leading_int),
            month: value("month").as_deref().and_then(parse_leading_int),
            from_date: value("from_date").as_deref().and_then(parse_iso_date),
            to_date: value("to_date").as_deref().and_then(parse_iso_date),
        }
    }

    pub fn resolve(&self, policy: WindowPolicy, today: NaiveDate) -> ReportWindow {
        if let (Some(from), Some(to)) = (self.from_date, self.to_date) {
            if let Some(window) = ReportWindow::from_dates(from, to) {
                return window;
            }
            tracing::debug!(%from, %to, "Ignoring inverted date range");
        }
        resolve_window(policy, self.year, self.month, today)
    }
}

/// Resolves a (year, month) pair. A missing part is taken from `today`; if
/// both are missing the policy decides.
pub fn resolve_window(
    policy: WindowPolicy,
    year: Option<i32>,
    month: Option<i32>,
    today: NaiveDate,
) -> ReportWindow {
    match (year, month, policy) {
        (None, None, WindowPolicy::CurrentMonth) => ReportWindow::month_of(today),
        (None, None, WindowPolicy::RollingDays(days)) => ReportWindow::rolling_days(days, today),
        (year, month, _) => ReportWindow::month(
            year.unwrap_or(today.year()),
            month.unwrap_or(today.month() as i32),
        ),
    }
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn shift_months(date: NaiveDate, months: i32) -> Option<NaiveDate> {
    let total_months = date.year() * 12 + date.month() as i32 - 1 + months;
    let new_year = total_months.div_euclid(12);
    let new_month = (total_months.rem_euclid(12) + 1) as u32;
    NaiveDate::from_ymd_opt(new_year, new_month, 1)
}
