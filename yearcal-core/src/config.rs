//! yearcal configuration.

use std::path::{Path, PathBuf};

use config::{Config, File, FileFormat};
use serde::Deserialize;

use crate::error::{YearCalError, YearCalResult};
use crate::resolve::ErrorPolicy;

static DEFAULT_EVENTS_DIR: &str = "input";
static DEFAULT_OUTPUT_DIR: &str = "output";
static DEFAULT_BASE_FILENAME: &str = "calendar";

fn default_events_dir() -> PathBuf {
    PathBuf::from(DEFAULT_EVENTS_DIR)
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

fn default_base_filename() -> String {
    DEFAULT_BASE_FILENAME.to_string()
}

/// Configuration at ~/.config/yearcal/config.toml
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct YearCalConfig {
    /// Directory holding the YAML event files.
    #[serde(default = "default_events_dir")]
    pub events_dir: PathBuf,

    /// Directory the `.tex` file is written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default = "default_base_filename")]
    pub base_filename: String,

    /// Categories to include without asking. `None` means ask.
    #[serde(default)]
    pub categories: Option<Vec<String>>,

    #[serde(default)]
    pub on_error: ErrorPolicy,
}

impl Default for YearCalConfig {
    fn default() -> Self {
        YearCalConfig {
            events_dir: default_events_dir(),
            output_dir: default_output_dir(),
            base_filename: default_base_filename(),
            categories: None,
            on_error: ErrorPolicy::default(),
        }
    }
}

impl YearCalConfig {
    pub fn config_path() -> YearCalResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| YearCalError::Config("Could not determine config directory".into()))?
            .join("yearcal");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the config from its default location, creating a commented
    /// default file there on first use.
    pub fn load() -> YearCalResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load the config from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> YearCalResult<Self> {
        Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml).required(false))
            .build()
            .map_err(|e| YearCalError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| YearCalError::Config(e.to_string()))
    }

    /// Parse config from TOML text.
    pub fn from_toml(contents: &str) -> YearCalResult<Self> {
        Config::builder()
            .add_source(File::from_str(contents, FileFormat::Toml))
            .build()
            .map_err(|e| YearCalError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| YearCalError::Config(e.to_string()))
    }

    /// `events_dir` with `~` expanded.
    pub fn events_path(&self) -> PathBuf {
        expand_tilde(&self.events_dir)
    }

    /// `output_dir` with `~` expanded.
    pub fn output_path(&self) -> PathBuf {
        expand_tilde(&self.output_dir)
    }

    /// Path of the `.tex` file for `year`.
    pub fn tex_path(&self, year: i32) -> PathBuf {
        self.output_path()
            .join(format!("{}_{}.tex", self.base_filename, year))
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> YearCalResult<()> {
        let contents = format!(
            "\
# yearcal configuration

# Where your event files (*.yml) live:
# events_dir = \"{DEFAULT_EVENTS_DIR}\"

# Where the generated .tex file is written:
# output_dir = \"{DEFAULT_OUTPUT_DIR}\"
# base_filename = \"{DEFAULT_BASE_FILENAME}\"

# Include these categories without asking:
# categories = [\"family\", \"holidays\"]

# What to do with invalid events: \"abort\" or \"skip\"
# on_error = \"abort\"
"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                YearCalError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| YearCalError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

fn expand_tilde(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
}
