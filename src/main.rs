mod commands;
mod logging;
mod utils;

use std::path::PathBuf;
use std::process;

use clap::Parser;
use owo_colors::OwoColorize;

#[derive(Parser)]
#[command(name = "yearcal", version)]
#[command(about = "Generate a printable LaTeX calendar of a year from your event files")]
#[command(after_help = "Example:\n  yearcal 2042")]
pub struct Cli {
    /// Year to generate the calendar for (e.g. 2042)
    #[arg(value_parser = clap::value_parser!(i32).range(1..=9999))]
    pub year: i32,

    /// Directory with the event files (*.yml), overrides the config
    #[arg(short, long)]
    pub events_dir: Option<PathBuf>,

    /// Directory to write the .tex file to, overrides the config
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Print the document to stdout instead of writing a file
    #[arg(long, conflicts_with = "output_dir")]
    pub stdout: bool,

    /// Only include this category (repeatable); skips the prompt
    #[arg(short, long = "category", value_name = "NAME")]
    pub categories: Vec<String>,

    /// Include every category found; skips the prompt
    #[arg(short, long, conflicts_with = "categories")]
    pub all: bool,

    /// Leave out invalid events instead of stopping
    #[arg(long)]
    pub skip_invalid: bool,

    /// Config file to use instead of ~/.config/yearcal/config.toml
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = commands::generate::run(cli) {
        eprintln!("{} {e:#}", "Error:".red());
        process::exit(1);
    }
}
