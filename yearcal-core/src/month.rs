//! Gregorian month arithmetic and the month day-grid.

use chrono::{Datelike, NaiveDate, Weekday};

/// Proleptic Gregorian leap year rule.
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in `month` (1..=12) of `year`, or `None` for an invalid month.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let days = match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => return None,
    };
    Some(days)
}

/// One Monday-first row of a month grid. `None` pads days outside the month.
pub type Week = [Option<NaiveDate>; 7];

/// A month laid out as week rows, the way a wall calendar prints it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    month: u32,
    weeks: Vec<Week>,
}

impl MonthGrid {
    /// Lay out `month` of `year`. Returns `None` if the month is not 1..=12 or
    /// the year is outside chrono's representable range.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;

        let mut weeks = Vec::with_capacity(6);
        let mut week: Week = [None; 7];

        for date in first.iter_days().take_while(|d| d.month() == month) {
            let slot = date.weekday().num_days_from_monday() as usize;
            week[slot] = Some(date);
            if slot == 6 {
                weeks.push(week);
                week = [None; 7];
            }
        }
        if week.iter().any(Option::is_some) {
            weeks.push(week);
        }

        Some(MonthGrid { month, weeks })
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn weeks(&self) -> &[Week] {
        &self.weeks
    }

    /// Dates of the month in order, skipping padding.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.weeks.iter().flatten().flatten().copied()
    }

    /// The `n`-th occurrence (1-based) of `weekday` in the month.
    ///
    /// Counting starts in the first row if that row already contains the
    /// weekday, otherwise in the second row.
    pub fn nth_weekday(&self, n: u32, weekday: Weekday) -> Option<NaiveDate> {
        let column = weekday.num_days_from_monday() as usize;
        let first_row = match self.weeks.first()?[column] {
            Some(_) => 0,
            None => 1,
        };
        let row = first_row + n.checked_sub(1)? as usize;
        self.weeks.get(row)?[column]
    }

    /// The last occurrence of `weekday` in the month.
    pub fn last_weekday(&self, weekday: Weekday) -> Option<NaiveDate> {
        let column = weekday.num_days_from_monday() as usize;
        let (last, rest) = self.weeks.split_last()?;
        match last[column] {
            Some(date) => Some(date),
            // The trailing row stops before this weekday; the row above is full.
            None => rest.last()?[column],
        }
    }
}
