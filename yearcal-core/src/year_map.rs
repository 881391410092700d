//! Per-day label accumulator for one calendar year.

use crate::error::{YearCalError, YearCalResult};
use crate::month::MonthGrid;

/// Labels for every day of a year, grouped by month.
///
/// Every day of every month has an entry from construction on, so resolving
/// events only ever appends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearMap {
    year: i32,
    months: Vec<MonthLabels>,
}

/// One month of a [`YearMap`]: its grid and the labels of each day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthLabels {
    grid: MonthGrid,
    days: Vec<Vec<String>>,
}

impl MonthLabels {
    pub fn month(&self) -> u32 {
        self.grid.month()
    }

    pub fn grid(&self) -> &MonthGrid {
        &self.grid
    }

    /// Number of days in the month.
    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Labels of `day` (1-based), or `None` if the month has no such day.
    pub fn labels(&self, day: u32) -> Option<&[String]> {
        let index = usize::try_from(day).ok()?.checked_sub(1)?;
        self.days.get(index).map(Vec::as_slice)
    }
}

impl YearMap {
    /// Empty map for `year`: twelve months, each day with no labels.
    pub fn new(year: i32) -> YearCalResult<Self> {
        let months = (1..=12)
            .map(|month| {
                let grid = MonthGrid::new(year, month).ok_or(YearCalError::InvalidYear(year))?;
                let days = vec![Vec::new(); grid.dates().count()];
                Ok(MonthLabels { grid, days })
            })
            .collect::<YearCalResult<Vec<_>>>()?;

        Ok(YearMap { year, months })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Month `month` (1..=12).
    pub fn month(&self, month: u32) -> Option<&MonthLabels> {
        let index = usize::try_from(month).ok()?.checked_sub(1)?;
        self.months.get(index)
    }

    /// All twelve months in calendar order.
    pub fn months(&self) -> impl Iterator<Item = &MonthLabels> {
        self.months.iter()
    }

    pub fn labels(&self, month: u32, day: u32) -> Option<&[String]> {
        self.month(month)?.labels(day)
    }

    /// Append `label` to the day. Returns `false` and leaves the map untouched
    /// if the day does not exist in this year.
    pub fn push(&mut self, month: u32, day: u32, label: String) -> bool {
        let Some(labels) = self.day_mut(month, day) else {
            return false;
        };
        labels.push(label);
        true
    }

    /// Total number of labels placed.
    pub fn label_count(&self) -> usize {
        self.months
            .iter()
            .flat_map(|m| m.days.iter())
            .map(Vec::len)
            .sum()
    }

    fn day_mut(&mut self, month: u32, day: u32) -> Option<&mut Vec<String>> {
        let month_index = usize::try_from(month).ok()?.checked_sub(1)?;
        let day_index = usize::try_from(day).ok()?.checked_sub(1)?;
        self.months.get_mut(month_index)?.days.get_mut(day_index)
    }
}
