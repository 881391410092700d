//! Loading event definitions from a directory of YAML files.
//!
//! Each file lists its events under `calendar_entries`, grouped by kind:
//!
//! ```yaml
//! calendar_entries:
//!   birthdays:
//!     - { label: Alice, category: family, month: 3, day: 5, year: 1990 }
//!   fixed_day_events:
//!     - { label: New Year, category: holidays, month: 1, day: 1 }
//!   nth_weekday_in_month_events:
//!     - { label: Mother's Day, category: holidays, month: 5, n: 2, weekday: 6 }
//!   last_week_in_month_events:
//!     - { label: Memorial Day, category: holidays, month: 5, weekday: 0 }
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info, trace};

use crate::category::CategoryFilter;
use crate::error::{YearCalError, YearCalResult};
use crate::event::{EventContext, EventDefinition, EventGroup, EventKind, weekday_from_index};
use crate::resolve::ErrorPolicy;

const EVENT_FILE_EXTENSIONS: [&str; 2] = ["yml", "yaml"];

#[derive(Deserialize)]
struct EventFileContents {
    calendar_entries: BTreeMap<String, Option<Vec<RawEvent>>>,
}

/// An event record as written in a file, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEvent {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub category: String,
    pub month: Option<RawValue>,
    pub day: Option<RawValue>,
    pub year: Option<RawValue>,
    pub n: Option<RawValue>,
    pub weekday: Option<RawValue>,
}

/// A numeric field as found in YAML: a number or a string holding one.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl RawValue {
    fn as_integer(&self) -> Option<i64> {
        match self {
            RawValue::Integer(n) => Some(*n),
            RawValue::Float(f) if f.fract() == 0.0 && f.is_finite() => Some(*f as i64),
            RawValue::Float(_) => None,
            RawValue::Text(s) => s.trim().parse().ok(),
        }
    }

    fn is_blank(&self) -> bool {
        matches!(self, RawValue::Text(s) if s.trim().is_empty())
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RawValue::Integer(n) => write!(f, "{n}"),
            RawValue::Float(x) => write!(f, "{x}"),
            RawValue::Text(s) => f.write_str(s),
        }
    }
}

/// Reads numeric fields of one record, reporting errors against it.
struct Fields<'a> {
    context: &'a EventContext,
}

impl Fields<'_> {
    fn integer(&self, value: Option<&RawValue>, field: &'static str) -> YearCalResult<i64> {
        value
            .and_then(RawValue::as_integer)
            .ok_or_else(|| YearCalError::Validation {
                event: self.context.clone(),
                field,
                value: value.map(ToString::to_string).unwrap_or_default(),
            })
    }

    fn unsigned(&self, value: Option<&RawValue>, field: &'static str) -> YearCalResult<u32> {
        let n = self.integer(value, field)?;
        u32::try_from(n).map_err(|_| YearCalError::Range {
            event: self.context.clone(),
            reason: format!("Field {field} value {n} is out of range"),
        })
    }

    fn optional_year(&self, value: Option<&RawValue>) -> YearCalResult<Option<i32>> {
        let Some(value) = value.filter(|v| !v.is_blank()) else {
            return Ok(None);
        };
        let n = self.integer(Some(value), "year")?;
        i32::try_from(n)
            .map(Some)
            .map_err(|_| YearCalError::Range {
                event: self.context.clone(),
                reason: format!("Field year value {n} is out of range"),
            })
    }

    fn weekday(&self, value: Option<&RawValue>) -> YearCalResult<chrono::Weekday> {
        let index = self.unsigned(value, "weekday")?;
        weekday_from_index(index).ok_or_else(|| YearCalError::Range {
            event: self.context.clone(),
            reason: format!("Weekday {index} is not between 0 (Monday) and 6 (Sunday)"),
        })
    }
}

impl RawEvent {
    /// Validate the record as an event of `group`.
    pub fn to_definition(&self, group: EventGroup, source: &Path) -> YearCalResult<EventDefinition> {
        let context = EventContext {
            label: self.label.clone(),
            kind: group.key(),
            source: Some(source.to_path_buf()),
        };
        let fields = Fields { context: &context };

        let month = fields.unsigned(self.month.as_ref(), "month")?;
        let kind = match group {
            EventGroup::Birthdays => EventKind::Birthday {
                day: fields.unsigned(self.day.as_ref(), "day")?,
                year: fields.optional_year(self.year.as_ref())?,
            },
            EventGroup::FixedDay => EventKind::FixedDay {
                day: fields.unsigned(self.day.as_ref(), "day")?,
            },
            EventGroup::NthWeekdayInMonth => EventKind::NthWeekdayInMonth {
                n: fields.unsigned(self.n.as_ref(), "n")?,
                weekday: fields.weekday(self.weekday.as_ref())?,
            },
            EventGroup::LastWeekdayInMonth => EventKind::LastWeekdayInMonth {
                weekday: fields.weekday(self.weekday.as_ref())?,
            },
        };

        Ok(EventDefinition {
            label: self.label.clone(),
            category: self.category.clone(),
            month,
            kind,
            source: Some(source.to_path_buf()),
        })
    }
}

/// The events of one file, grouped by kind.
#[derive(Debug, Clone)]
pub struct EventFile {
    pub path: PathBuf,
    pub groups: BTreeMap<EventGroup, Vec<RawEvent>>,
}

impl EventFile {
    pub fn load(path: &Path) -> YearCalResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(path, &contents)
    }

    /// Parse file contents. `path` is only used for error messages and sources.
    pub fn from_yaml(path: &Path, contents: &str) -> YearCalResult<Self> {
        let parsed: EventFileContents =
            serde_yaml::from_str(contents).map_err(|e| YearCalError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        let mut groups = BTreeMap::new();
        for (key, records) in parsed.calendar_entries {
            let group = EventGroup::from_key(&key).ok_or_else(|| {
                YearCalError::Lookup(format!(
                    "Unknown event group '{key}' in {}",
                    path.display()
                ))
            })?;
            groups.insert(group, records.unwrap_or_default());
        }

        Ok(EventFile {
            path: path.to_path_buf(),
            groups,
        })
    }

    fn records(&self, group: EventGroup) -> &[RawEvent] {
        self.groups.get(&group).map(Vec::as_slice).unwrap_or_default()
    }
}

/// All event files of an input directory.
#[derive(Debug, Clone, Default)]
pub struct EventSet {
    files: Vec<EventFile>,
}

impl EventSet {
    pub fn new(files: Vec<EventFile>) -> Self {
        EventSet { files }
    }

    /// Load every `.yml`/`.yaml` file directly inside `dir`, in file name order.
    pub fn load_dir(dir: &Path) -> YearCalResult<Self> {
        let entries = std::fs::read_dir(dir).map_err(|e| {
            YearCalError::Config(format!(
                "Could not read events directory {}: {e}",
                dir.display()
            ))
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry?.path();
            let is_event_file = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| EVENT_FILE_EXTENSIONS.contains(&e));
            if is_event_file && path.is_file() {
                paths.push(path);
            }
        }
        paths.sort();

        let files = paths
            .iter()
            .map(|path| {
                info!("Importing {}", path.display());
                EventFile::load(path)
            })
            .collect::<YearCalResult<Vec<_>>>()?;

        Ok(EventSet { files })
    }

    pub fn files(&self) -> &[EventFile] {
        &self.files
    }

    /// Number of event records across all files.
    pub fn len(&self) -> usize {
        self.files
            .iter()
            .flat_map(|file| file.groups.values())
            .map(Vec::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Distinct non-empty categories, sorted.
    pub fn categories(&self) -> Vec<String> {
        let categories: BTreeSet<&str> = self
            .files
            .iter()
            .flat_map(|file| file.groups.values().flatten())
            .map(|event| event.category.as_str())
            .filter(|category| !category.is_empty())
            .collect();
        categories.into_iter().map(str::to_string).collect()
    }

    /// Validate every record accepted by `filter`, ordered by kind, then file,
    /// then position in the file.
    ///
    /// Records of other categories are passed over without being validated.
    /// Invalid records are handled according to `policy`; skipped ones are
    /// appended to `skipped`.
    pub fn definitions(
        &self,
        filter: &CategoryFilter,
        policy: ErrorPolicy,
        skipped: &mut Vec<YearCalError>,
    ) -> YearCalResult<Vec<EventDefinition>> {
        let mut definitions = Vec::with_capacity(self.len());

        for group in EventGroup::ALL {
            for file in &self.files {
                for raw in file.records(group) {
                    if !filter.accepts(&raw.category) {
                        trace!(label = %raw.label, category = %raw.category, "Category not selected");
                        continue;
                    }
                    match raw.to_definition(group, &file.path) {
                        Ok(definition) => definitions.push(definition),
                        Err(err) => policy.handle(err, skipped)?,
                    }
                }
            }
        }

        debug!(count = definitions.len(), "Validated event records");
        Ok(definitions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn parse(contents: &str) -> YearCalResult<EventFile> {
        EventFile::from_yaml(Path::new("family.yml"), contents)
    }

    fn all(set: &EventSet) -> CategoryFilter {
        set.categories().into_iter().collect()
    }

    fn single(contents: &str) -> YearCalResult<EventDefinition> {
        let set = EventSet::new(vec![parse(contents)?]);
        let mut skipped = Vec::new();
        let mut definitions = set.definitions(&all(&set), ErrorPolicy::Abort, &mut skipped)?;
        assert_eq!(definitions.len(), 1);
        Ok(definitions.remove(0))
    }

    #[test]
    fn parses_every_group() {
        let file = parse(
            r#"
calendar_entries:
  birthdays:
    - { label: Alice, category: family, month: 3, day: 5, year: 1990 }
  fixed_day_events:
    - { label: New Year, category: holidays, month: 1, day: 1 }
  nth_weekday_in_month_events:
    - { label: Mother's Day, category: holidays, month: 5, n: 2, weekday: 6 }
  last_week_in_month_events:
    - { label: Memorial Day, category: holidays, month: 5, weekday: 0 }
"#,
        )
        .unwrap();
        let set = EventSet::new(vec![file]);
        assert_eq!(set.len(), 4);
        assert_eq!(set.categories(), vec!["family", "holidays"]);

        let mut skipped = Vec::new();
        let definitions = set
            .definitions(&all(&set), ErrorPolicy::Abort, &mut skipped)
            .unwrap();
        let kinds: Vec<EventKind> = definitions.iter().map(|d| d.kind).collect();
        assert_eq!(
            kinds,
            vec![
                EventKind::Birthday {
                    day: 5,
                    year: Some(1990)
                },
                EventKind::FixedDay { day: 1 },
                EventKind::NthWeekdayInMonth {
                    n: 2,
                    weekday: Weekday::Sun
                },
                EventKind::LastWeekdayInMonth {
                    weekday: Weekday::Mon
                },
            ]
        );
        assert_eq!(
            definitions[0].source.as_deref(),
            Some(Path::new("family.yml"))
        );
    }

    #[test]
    fn numeric_strings_are_accepted() {
        let definition = single(
            r#"
calendar_entries:
  birthdays:
    - { label: Alice, category: family, month: "3", day: "5", year: "1990" }
"#,
        )
        .unwrap();
        assert_eq!(definition.month, 3);
        assert_eq!(
            definition.kind,
            EventKind::Birthday {
                day: 5,
                year: Some(1990)
            }
        );
    }

    #[test]
    fn blank_birth_year_means_no_age() {
        let definition = single(
            r#"
calendar_entries:
  birthdays:
    - { label: Alice, category: family, month: 3, day: 5, year: "" }
"#,
        )
        .unwrap();
        assert_eq!(definition.kind, EventKind::Birthday { day: 5, year: None });
    }

    #[test]
    fn malformed_day_is_a_validation_error() {
        let err = single(
            r#"
calendar_entries:
  fixed_day_events:
    - { label: Party, category: family, month: 3, day: fifth }
"#,
        )
        .unwrap_err();
        match err {
            YearCalError::Validation {
                event,
                field,
                value,
            } => {
                assert_eq!(event.label, "Party");
                assert_eq!(event.kind, "fixed_day_events");
                assert_eq!(field, "day");
                assert_eq!(value, "fifth");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn missing_month_is_a_validation_error() {
        let err = single(
            r#"
calendar_entries:
  fixed_day_events:
    - { label: Party, category: family, day: 4 }
"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            YearCalError::Validation { field: "month", .. }
        ));
    }

    #[test]
    fn fractional_numbers_are_rejected() {
        let err = single(
            r#"
calendar_entries:
  nth_weekday_in_month_events:
    - { label: X, category: c, month: 5, n: 1.5, weekday: 0 }
"#,
        )
        .unwrap_err();
        assert!(matches!(err, YearCalError::Validation { field: "n", .. }));
    }

    #[test]
    fn weekday_out_of_range_is_a_range_error() {
        let err = single(
            r#"
calendar_entries:
  last_week_in_month_events:
    - { label: X, category: c, month: 5, weekday: 7 }
"#,
        )
        .unwrap_err();
        assert!(matches!(err, YearCalError::Range { .. }));
    }

    #[test]
    fn negative_day_is_a_range_error() {
        let err = single(
            r#"
calendar_entries:
  fixed_day_events:
    - { label: X, category: c, month: 5, day: -1 }
"#,
        )
        .unwrap_err();
        assert!(matches!(err, YearCalError::Range { .. }));
    }

    #[test]
    fn unknown_group_is_a_lookup_error() {
        let err = parse(
            r#"
calendar_entries:
  holidays:
    - { label: X, category: c, month: 5, day: 1 }
"#,
        )
        .unwrap_err();
        assert!(matches!(err, YearCalError::Lookup(_)));
    }

    #[test]
    fn empty_group_is_allowed() {
        let file = parse("calendar_entries:\n  birthdays:\n").unwrap();
        assert!(EventSet::new(vec![file]).is_empty());
    }

    #[test]
    fn broken_yaml_is_a_parse_error_naming_the_file() {
        let err = parse("calendar_entries: [").unwrap_err();
        assert!(matches!(err, YearCalError::Parse { .. }));
        assert!(err.to_string().contains("family.yml"));
    }

    #[test]
    fn skip_policy_drops_only_invalid_records() {
        let file = parse(
            r#"
calendar_entries:
  fixed_day_events:
    - { label: Bad, category: c, month: 5, day: x }
    - { label: Good, category: c, month: 5, day: 2 }
"#,
        )
        .unwrap();
        let mut skipped = Vec::new();
        let definitions = EventSet::new(vec![file])
            .definitions(&CategoryFilter::new(["c"]), ErrorPolicy::Skip, &mut skipped)
            .unwrap();
        assert_eq!(definitions.len(), 1);
        assert_eq!(definitions[0].label, "Good");
        assert_eq!(skipped.len(), 1);
    }

    #[test]
    fn records_are_ordered_by_kind_then_file() {
        let first = EventFile::from_yaml(
            Path::new("a.yml"),
            r#"
calendar_entries:
  fixed_day_events:
    - { label: A fixed, category: c, month: 1, day: 1 }
  birthdays:
    - { label: A birthday, category: c, month: 1, day: 1 }
"#,
        )
        .unwrap();
        let second = EventFile::from_yaml(
            Path::new("b.yml"),
            r#"
calendar_entries:
  birthdays:
    - { label: B birthday, category: c, month: 1, day: 1 }
"#,
        )
        .unwrap();
        let mut skipped = Vec::new();
        let labels: Vec<String> = EventSet::new(vec![first, second])
            .definitions(&CategoryFilter::new(["c"]), ErrorPolicy::Abort, &mut skipped)
            .unwrap()
            .into_iter()
            .map(|d| d.label)
            .collect();
        assert_eq!(labels, vec!["A birthday", "B birthday", "A fixed"]);
    }

    #[test]
    fn unselected_records_are_not_validated() {
        let file = parse(
            r#"
calendar_entries:
  birthdays:
    - { label: Alice, category: family, month: 3, day: 5 }
  fixed_day_events:
    - { label: Office, category: work, month: 3, day: fifth }
"#,
        )
        .unwrap();
        let set = EventSet::new(vec![file]);

        let mut skipped = Vec::new();
        let definitions = set
            .definitions(&CategoryFilter::new(["family"]), ErrorPolicy::Abort, &mut skipped)
            .unwrap();
        assert_eq!(definitions.len(), 1);
        assert_eq!(definitions[0].label, "Alice");
        assert!(skipped.is_empty());

        let err = set
            .definitions(&all(&set), ErrorPolicy::Abort, &mut skipped)
            .unwrap_err();
        assert!(matches!(err, YearCalError::Validation { field: "day", .. }));
    }
}
