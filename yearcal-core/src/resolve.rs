//! Resolving event definitions to days of a target year.

use chrono::Datelike;
use serde::Deserialize;
use tracing::{debug, info, trace, warn};

use crate::category::CategoryFilter;
use crate::error::{YearCalError, YearCalResult};
use crate::event::{EventDefinition, EventKind};
use crate::month::{MonthGrid, days_in_month};
use crate::year_map::YearMap;

/// What to do when a single event record is invalid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Stop at the first invalid event.
    #[default]
    Abort,
    /// Log the invalid event, leave it out, and carry on.
    Skip,
}

impl ErrorPolicy {
    /// Apply the policy to `err`. Errors that are not about one event record
    /// are always returned.
    pub fn handle(self, err: YearCalError, skipped: &mut Vec<YearCalError>) -> YearCalResult<()> {
        if self == ErrorPolicy::Skip && err.is_per_event() {
            warn!("Skipping invalid event: {err}");
            skipped.push(err);
            Ok(())
        } else {
            Err(err)
        }
    }
}

/// Where an event lands and what it shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub month: u32,
    pub day: u32,
    pub label: String,
}

/// Outcome of resolving a list of events.
#[derive(Debug)]
pub struct Resolution {
    pub year_map: YearMap,
    /// Events left out under [`ErrorPolicy::Skip`].
    pub skipped: Vec<YearCalError>,
}

/// Resolves events against a category filter for one year.
pub struct Resolver<'a> {
    year: i32,
    filter: &'a CategoryFilter,
    policy: ErrorPolicy,
}

impl<'a> Resolver<'a> {
    pub fn new(year: i32, filter: &'a CategoryFilter) -> Self {
        Resolver {
            year,
            filter,
            policy: ErrorPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Build a fresh [`YearMap`] and append the label of every accepted event,
    /// in the order given.
    pub fn resolve(&self, events: &[EventDefinition]) -> YearCalResult<Resolution> {
        if self.filter.is_empty() {
            return Err(YearCalError::Lookup("No categories selected".to_string()));
        }

        let mut year_map = YearMap::new(self.year)?;
        let mut skipped = Vec::new();
        let mut placed = 0usize;

        for event in events {
            if !self.filter.accepts(&event.category) {
                trace!(label = %event.label, category = %event.category, "Category not selected");
                continue;
            }

            match place(self.year, event) {
                Ok(Placement { month, day, label }) => {
                    debug!(label = %label, month, day, "Placed event");
                    let pushed = year_map.push(month, day, label);
                    debug_assert!(pushed, "placement was validated against the year");
                    placed += 1;
                }
                Err(err) => self.policy.handle(err, &mut skipped)?,
            }
        }

        info!(
            year = self.year,
            placed,
            skipped = skipped.len(),
            "Resolved events"
        );

        Ok(Resolution { year_map, skipped })
    }
}

/// Resolve `events` for `year`, stopping at the first invalid event.
pub fn resolve(
    year: i32,
    events: &[EventDefinition],
    filter: &CategoryFilter,
) -> YearCalResult<YearMap> {
    Resolver::new(year, filter)
        .resolve(events)
        .map(|resolution| resolution.year_map)
}

/// Find the day `event` falls on in `year`, and the label it shows there.
pub fn place(year: i32, event: &EventDefinition) -> YearCalResult<Placement> {
    let out_of_range = |reason: String| YearCalError::Range {
        event: event.context(),
        reason,
    };

    let month = event.month;
    let days = days_in_month(year, month)
        .ok_or_else(|| out_of_range(format!("Month {month} does not exist")))?;
    let grid = || MonthGrid::new(year, month).ok_or(YearCalError::InvalidYear(year));

    let (day, label) = match event.kind {
        EventKind::Birthday { day, year: origin } => {
            let label = match origin {
                Some(origin) => {
                    let age = year.checked_sub(origin).ok_or_else(|| {
                        out_of_range(format!("Birth year {origin} is too far from {year}"))
                    })?;
                    format!("{} ({age})", event.label)
                }
                None => event.label.clone(),
            };
            (day, label)
        }
        EventKind::FixedDay { day } => (day, event.label.clone()),
        EventKind::NthWeekdayInMonth { n, weekday } => {
            let date = grid()?.nth_weekday(n, weekday).ok_or_else(|| {
                out_of_range(format!(
                    "There is no occurrence {n} of {weekday:?} in {year}-{month:02}"
                ))
            })?;
            (date.day(), event.label.clone())
        }
        EventKind::LastWeekdayInMonth { weekday } => {
            let date = grid()?.last_weekday(weekday).ok_or_else(|| {
                out_of_range(format!("There is no {weekday:?} in {year}-{month:02}"))
            })?;
            (date.day(), event.label.clone())
        }
    };

    if day == 0 || day > days {
        return Err(out_of_range(format!(
            "Day {day} does not exist in {year}-{month:02}"
        )));
    }

    Ok(Placement { month, day, label })
}
