//! Event definitions.
//!
//! An event is a label that lands on one day of the target year. How that day
//! is found depends on its [`EventKind`].

use std::fmt;
use std::path::PathBuf;

use chrono::Weekday;

/// A typed event, ready to be placed on a calendar day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDefinition {
    pub label: String,
    pub category: String,
    /// Month of the year, 1..=12.
    pub month: u32,
    pub kind: EventKind,
    /// File the record was read from, if any.
    pub source: Option<PathBuf>,
}

/// How an event's day of month is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Same day every year. With an origin `year` the label gets the age appended.
    Birthday { day: u32, year: Option<i32> },
    FixedDay { day: u32 },
    /// The `n`-th (1-based) occurrence of `weekday` in the month.
    NthWeekdayInMonth { n: u32, weekday: Weekday },
    LastWeekdayInMonth { weekday: Weekday },
}

/// The named groups event files use to list events of one kind.
///
/// The order of [`EventGroup::ALL`] is the order in which groups are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventGroup {
    Birthdays,
    FixedDay,
    NthWeekdayInMonth,
    LastWeekdayInMonth,
}

impl EventGroup {
    pub const ALL: [EventGroup; 4] = [
        EventGroup::Birthdays,
        EventGroup::FixedDay,
        EventGroup::NthWeekdayInMonth,
        EventGroup::LastWeekdayInMonth,
    ];

    /// Key used for this group in event files.
    pub fn key(self) -> &'static str {
        match self {
            EventGroup::Birthdays => "birthdays",
            EventGroup::FixedDay => "fixed_day_events",
            EventGroup::NthWeekdayInMonth => "nth_weekday_in_month_events",
            EventGroup::LastWeekdayInMonth => "last_week_in_month_events",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|group| group.key() == key)
    }
}

impl fmt::Display for EventGroup {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl EventKind {
    pub fn group(&self) -> EventGroup {
        match self {
            EventKind::Birthday { .. } => EventGroup::Birthdays,
            EventKind::FixedDay { .. } => EventGroup::FixedDay,
            EventKind::NthWeekdayInMonth { .. } => EventGroup::NthWeekdayInMonth,
            EventKind::LastWeekdayInMonth { .. } => EventGroup::LastWeekdayInMonth,
        }
    }
}

impl EventDefinition {
    pub fn new(label: &str, category: &str, month: u32, kind: EventKind) -> Self {
        EventDefinition {
            label: label.to_string(),
            category: category.to_string(),
            month,
            kind,
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<PathBuf>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Identifies this event in error messages.
    pub fn context(&self) -> EventContext {
        EventContext {
            label: self.label.clone(),
            kind: self.kind.group().key(),
            source: self.source.clone(),
        }
    }
}

/// Enough information to find an offending event record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventContext {
    pub label: String,
    pub kind: &'static str,
    pub source: Option<PathBuf>,
}

impl fmt::Display for EventContext {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} event '{}'", self.kind, self.label)?;
        if let Some(source) = &self.source {
            write!(f, " ({})", source.display())?;
        }
        Ok(())
    }
}

/// Weekday from its file representation, 0 = Monday .. 6 = Sunday.
pub fn weekday_from_index(index: u32) -> Option<Weekday> {
    match index {
        0 => Some(Weekday::Mon),
        1 => Some(Weekday::Tue),
        2 => Some(Weekday::Wed),
        3 => Some(Weekday::Thu),
        4 => Some(Weekday::Fri),
        5 => Some(Weekday::Sat),
        6 => Some(Weekday::Sun),
        _ => None,
    }
}
