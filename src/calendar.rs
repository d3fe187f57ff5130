//! Calendar
//!
//! Month grids for the appointment calendar. A grid is always made of whole weeks, padded
//! with days from the neighbouring months.

use std::collections::BTreeMap;

use jiff::{
    Span,
    civil::{Date, Weekday},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Calendar errors.
#[derive(Debug, Error)]
pub enum CalendarError {
    /// Year or month out of range.
    #[error("invalid month {year}-{month:02}")]
    InvalidMonth {
        /// Requested year.
        year: i16,

        /// Requested month.
        month: i8,
    },

    /// Date arithmetic left the supported range.
    #[error(transparent)]
    Date(#[from] jiff::Error),
}

/// First column of the grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekStart {
    /// Weeks run Monday to Sunday.
    #[default]
    Monday,

    /// Weeks run Sunday to Saturday.
    Sunday,
}

impl From<WeekStart> for Weekday {
    fn from(start: WeekStart) -> Self {
        match start {
            WeekStart::Monday => Weekday::Monday,
            WeekStart::Sunday => Weekday::Sunday,
        }
    }
}

/// A single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDay {
    /// Civil date.
    pub date: Date,

    /// Whether the date falls in the grid's month.
    pub in_month: bool,
}

/// A month laid out in weeks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthGrid {
    /// Year shown.
    pub year: i16,

    /// Month shown, 1-based.
    pub month: i8,

    /// Weeks, each seven days starting on the configured week start.
    pub weeks: Vec<[CalendarDay; 7]>,
}

impl MonthGrid {
    /// First date in the grid.
    #[must_use]
    pub fn first_day(&self) -> Option<Date> {
        self.weeks.first().map(|week| week[0].date)
    }

    /// Last date in the grid.
    #[must_use]
    pub fn last_day(&self) -> Option<Date> {
        self.weeks.last().map(|week| week[6].date)
    }

    /// Whether `date` is shown on the grid.
    #[must_use]
    pub fn contains(&self, date: Date) -> bool {
        match (self.first_day(), self.last_day()) {
            (Some(first), Some(last)) => first <= date && date <= last,
            _ => false,
        }
    }

    /// Group items by the grid day they fall on, dropping items outside the grid.
    ///
    /// Items keep their input order within a day.
    pub fn bucket_by_day<T>(
        &self,
        items: impl IntoIterator<Item = T>,
        day_of: impl Fn(&T) -> Date,
    ) -> BTreeMap<Date, Vec<T>> {
        let mut buckets: BTreeMap<Date, Vec<T>> = BTreeMap::new();

        for item in items {
            let date = day_of(&item);

            if self.contains(date) {
                buckets.entry(date).or_default().push(item);
            }
        }

        buckets
    }
}

/// Lay out a month as whole weeks.
///
/// # Errors
///
/// Returns [`CalendarError::InvalidMonth`] when the year or month is out of range.
pub fn month_grid(year: i16, month: i8, week_start: WeekStart) -> Result<MonthGrid, CalendarError> {
    let first = Date::new(year, month, 1).map_err(|_err| CalendarError::InvalidMonth { year, month })?;

    let leading = first.weekday().since(Weekday::from(week_start));
    let start = first.checked_sub(Span::new().days(leading))?;

    let visible = usize::try_from(leading + first.days_in_month()).unwrap_or_default();
    let week_count = visible.div_ceil(7);

    let days: Vec<CalendarDay> = start
        .series(Span::new().days(1))
        .take(week_count * 7)
        .map(|date| CalendarDay {
            date,
            in_month: date.year() == year && date.month() == month,
        })
        .collect();

    let weeks = days
        .chunks_exact(7)
        .filter_map(|week| <[CalendarDay; 7]>::try_from(week).ok())
        .collect();

    Ok(MonthGrid { year, month, weeks })
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn grid_starts_on_configured_weekday() -> TestResult {
        // June 2024 starts on a Saturday.
        let monday = month_grid(2024, 6, WeekStart::Monday)?;
        let sunday = month_grid(2024, 6, WeekStart::Sunday)?;

        assert_eq!(monday.first_day(), Some(date(2024, 5, 27)));
        assert_eq!(sunday.first_day(), Some(date(2024, 5, 26)));

        Ok(())
    }

    #[test]
    fn grid_is_made_of_whole_weeks() -> TestResult {
        for month in 1..=12 {
            let grid = month_grid(2025, month, WeekStart::Monday)?;

            assert!(
                (4..=6).contains(&grid.weeks.len()),
                "month {month} has {} weeks",
                grid.weeks.len()
            );
            assert!(
                grid.weeks
                    .iter()
                    .all(|week| week[0].date.weekday() == Weekday::Monday),
                "every week should start on Monday"
            );
        }

        Ok(())
    }

    #[test]
    fn february_starting_on_week_start_fits_four_weeks() -> TestResult {
        // February 2021 starts on a Monday and has 28 days.
        let grid = month_grid(2021, 2, WeekStart::Monday)?;

        assert_eq!(grid.weeks.len(), 4);
        assert!(
            grid.weeks.iter().flatten().all(|day| day.in_month),
            "no padding expected"
        );

        Ok(())
    }

    #[test]
    fn padding_days_are_marked_outside_month() -> TestResult {
        let grid = month_grid(2024, 6, WeekStart::Monday)?;
        let days: Vec<_> = grid.weeks.iter().flatten().collect();

        assert_eq!(days.iter().filter(|day| day.in_month).count(), 30);
        assert_eq!(days.len(), 42);
        assert_eq!(grid.last_day(), Some(date(2024, 7, 7)));

        Ok(())
    }

    #[test]
    fn invalid_month_is_rejected() {
        assert!(matches!(
            month_grid(2024, 13, WeekStart::Monday),
            Err(CalendarError::InvalidMonth { month: 13, .. })
        ));
    }

    #[test]
    fn items_are_bucketed_by_day_within_grid() -> TestResult {
        let grid = month_grid(2024, 6, WeekStart::Monday)?;
        let items = vec![
            ("padding", date(2024, 5, 27)),
            ("first", date(2024, 6, 3)),
            ("second", date(2024, 6, 3)),
            ("outside", date(2024, 8, 1)),
        ];

        let buckets = grid.bucket_by_day(items, |(_, day)| *day);

        assert_eq!(buckets.len(), 2);
        assert_eq!(
            buckets.get(&date(2024, 6, 3)).map(Vec::len),
            Some(2),
            "both items on the 3rd"
        );
        assert!(buckets.contains_key(&date(2024, 5, 27)));

        Ok(())
    }
}
