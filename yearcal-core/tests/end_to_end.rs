use std::fs;
use std::path::Path;

use yearcal_core::source::EventSet;
use yearcal_core::{
    AcceptAll, CategorySelector, ErrorPolicy, Preset, Resolver, YearCalError, render,
};

const FAMILY: &str = r#"
calendar_entries:
  birthdays:
    - label: Alice
      category: family
      month: 3
      day: 5
      year: 1990
    - label: Bob
      category: family
      month: 3
      day: 5
  fixed_day_events:
    - label: Wedding anniversary
      category: family
      month: 6
      day: 21
"#;

const HOLIDAYS: &str = r#"
calendar_entries:
  fixed_day_events:
    - { label: New Year, category: holidays, month: 1, day: 1 }
  nth_weekday_in_month_events:
    - { label: Thanksgiving, category: holidays, month: 11, n: 4, weekday: 3 }
  last_week_in_month_events:
    - { label: Last Sunday, category: holidays, month: 12, weekday: 6 }
"#;

fn write_events(dir: &Path) {
    fs::write(dir.join("family.yml"), FAMILY).unwrap();
    fs::write(dir.join("holidays.yaml"), HOLIDAYS).unwrap();
    fs::write(dir.join("notes.txt"), "not an event file").unwrap();
}

#[test]
fn directory_to_document() {
    let dir = tempfile::tempdir().expect("create temp dir");
    write_events(dir.path());

    let events = EventSet::load_dir(dir.path()).unwrap();
    assert_eq!(events.files().len(), 2);
    assert_eq!(events.len(), 6);

    let categories = events.categories();
    assert_eq!(categories, vec!["family", "holidays"]);

    let filter = AcceptAll.select(&categories).unwrap();
    let mut skipped = Vec::new();
    let definitions = events.definitions(&filter, ErrorPolicy::Abort, &mut skipped).unwrap();
    let resolution = Resolver::new(2018, &filter).resolve(&definitions).unwrap();
    assert!(resolution.skipped.is_empty());

    let map = &resolution.year_map;
    assert_eq!(
        map.labels(3, 5).unwrap(),
        &["Alice (28)".to_string(), "Bob".to_string()]
    );
    assert_eq!(map.labels(1, 1).unwrap(), &["New Year".to_string()]);
    assert_eq!(map.labels(11, 22).unwrap(), &["Thanksgiving".to_string()]);
    assert_eq!(map.labels(12, 30).unwrap(), &["Last Sunday".to_string()]);
    assert_eq!(map.label_count(), 6);

    let output = render(map);
    assert!(output.contains("\\tiny{Alice (28), Bob}"));
    assert!(output.contains("\\tiny{Wedding anniversary}"));
    assert_eq!(output.matches("\\end{document}").count(), 1);
}

#[test]
fn preset_selection_leaves_other_categories_out() {
    let dir = tempfile::tempdir().expect("create temp dir");
    write_events(dir.path());

    let events = EventSet::load_dir(dir.path()).unwrap();
    let filter = Preset::new(vec!["holidays".to_string()])
        .select(&events.categories())
        .unwrap();
    let mut skipped = Vec::new();
    let definitions = events.definitions(&filter, ErrorPolicy::Abort, &mut skipped).unwrap();
    let map = Resolver::new(2018, &filter)
        .resolve(&definitions)
        .unwrap()
        .year_map;

    assert!(map.labels(3, 5).unwrap().is_empty());
    assert_eq!(map.label_count(), 3);
}

#[test]
fn invalid_record_aborts_or_is_skipped() {
    let dir = tempfile::tempdir().expect("create temp dir");
    fs::write(
        dir.path().join("broken.yml"),
        r#"
calendar_entries:
  fixed_day_events:
    - { label: Impossible, category: c, month: 2, day: 30 }
    - { label: Fine, category: c, month: 2, day: 3 }
"#,
    )
    .unwrap();

    let events = EventSet::load_dir(dir.path()).unwrap();
    let filter = AcceptAll.select(&events.categories()).unwrap();
    let mut skipped = Vec::new();
    let definitions = events.definitions(&filter, ErrorPolicy::Abort, &mut skipped).unwrap();

    let err = Resolver::new(2018, &filter).resolve(&definitions).unwrap_err();
    assert!(matches!(err, YearCalError::Range { .. }));
    assert!(err.to_string().contains("broken.yml"));

    let resolution = Resolver::new(2018, &filter)
        .with_policy(ErrorPolicy::Skip)
        .resolve(&definitions)
        .unwrap();
    assert_eq!(resolution.skipped.len(), 1);
    assert_eq!(
        resolution.year_map.labels(2, 3).unwrap(),
        &["Fine".to_string()]
    );
}

#[test]
fn missing_directory_is_reported() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let err = EventSet::load_dir(&dir.path().join("absent")).unwrap_err();
    assert!(matches!(err, YearCalError::Config(_)));
}
