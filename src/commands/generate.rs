use std::fs::{self, File};
use std::io::{self, BufWriter, IsTerminal};
use std::path::Path;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use tracing::info;
use yearcal_core::config::YearCalConfig;
use yearcal_core::source::EventSet;
use yearcal_core::{
    AcceptAll, CategorySelector, ErrorPolicy, LatexCalendar, Preset, Resolver,
};

use crate::Cli;
use crate::utils::prompt::InteractiveSelector;

pub fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    let policy = if cli.skip_invalid {
        ErrorPolicy::Skip
    } else {
        config.on_error
    };

    let events_dir = config.events_path();
    let events = EventSet::load_dir(&events_dir)?;
    require_events(&events, &events_dir)?;

    let categories = events.categories();
    info!("Found categories: {}", categories.join(", "));

    let filter = selector(&cli, &config)
        .select(&categories)
        .context("Could not select categories")?;
    info!(
        "Including categories: {}",
        filter.iter().collect::<Vec<_>>().join(", ")
    );

    let mut skipped = Vec::new();
    let definitions = events.definitions(&filter, policy, &mut skipped)?;
    let resolution = Resolver::new(cli.year, &filter)
        .with_policy(policy)
        .resolve(&definitions)?;
    skipped.extend(resolution.skipped);

    let calendar = LatexCalendar::new(&resolution.year_map);

    if cli.stdout {
        calendar.write_to(&mut io::stdout().lock())?;
    } else {
        let path = config.tex_path(cli.year);
        write_document(&calendar, &path)?;
        println!("{}", format!("Created: {}", path.display()).green());
    }

    if !skipped.is_empty() {
        eprintln!(
            "{}",
            format!(
                "Skipped {} invalid {}",
                skipped.len(),
                if skipped.len() == 1 { "event" } else { "events" }
            )
            .yellow()
        );
    }

    Ok(())
}

/// Config from `--config` or the default location, with CLI overrides applied.
fn load_config(cli: &Cli) -> Result<YearCalConfig> {
    let mut config = match &cli.config {
        Some(path) => YearCalConfig::load_from(path)
            .with_context(|| format!("Could not load config from {}", path.display()))?,
        None => YearCalConfig::load()?,
    };

    if let Some(dir) = &cli.events_dir {
        config.events_dir = dir.clone();
    }
    if let Some(dir) = &cli.output_dir {
        config.output_dir = dir.clone();
    }

    Ok(config)
}

fn require_events(events: &EventSet, dir: &Path) -> Result<()> {
    if events.is_empty() {
        anyhow::bail!(
            "No events found in {}.\n\n\
            Add a YAML file with a `calendar_entries` section there, or point\n\
            yearcal to your events with:\n  \
            yearcal <year> --events-dir <dir>",
            dir.display()
        );
    }
    Ok(())
}

/// Category source, in order of precedence: `--category`, `--all`, the config
/// file, then asking on the terminal.
fn selector(cli: &Cli, config: &YearCalConfig) -> Box<dyn CategorySelector> {
    if !cli.categories.is_empty() {
        Box::new(Preset::new(cli.categories.clone()))
    } else if cli.all {
        Box::new(AcceptAll)
    } else if let Some(categories) = &config.categories {
        Box::new(Preset::new(categories.clone()))
    } else if io::stdin().is_terminal() {
        Box::new(InteractiveSelector)
    } else {
        info!("stdin is not a terminal, including all categories");
        Box::new(AcceptAll)
    }
}

fn write_document(calendar: &LatexCalendar, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Could not create {}", parent.display()))?;
    }

    let file =
        File::create(path).with_context(|| format!("Could not write {}", path.display()))?;
    calendar.write_to(&mut BufWriter::new(file))?;

    info!("Wrote {}", path.display());
    Ok(())
}
