use clap::{CommandFactory, Parser};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::error::TrackerError;
use crate::formatting::Currency;
use crate::month::MonthKey;
use crate::time_utils::TimezoneHandler;

/// Directory under the home directory holding tracker state.
pub const APP_DIR_NAME: &str = ".spend-tracker";

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Monthly spending reports and month-over-month comparisons
#[derive(Parser, Debug, Clone)]
#[command(
    name = "spend-tracker",
    about = "Monthly spending reports and month-over-month comparisons",
    version
)]
pub struct Settings {
    /// What to print
    #[arg(long, default_value = "report", value_parser = ["report", "compare", "list", "months"])]
    pub view: String,

    /// Month to report on, as YYYY-MM (defaults to the newest month with data)
    #[arg(long)]
    pub month: Option<MonthKey>,

    /// List expenses from every month instead of one (list view)
    #[arg(long)]
    pub all: bool,

    /// Currency code used to format amounts
    #[arg(long, default_value = "USD")]
    pub currency: String,

    /// Expense file or directory of JSON expense files
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Timezone used to place timestamps in a calendar month (auto-detected if not specified)
    #[arg(long, default_value = "auto")]
    pub timezone: String,

    /// Print the computed figures as JSON instead of narrative text
    #[arg(long)]
    pub json: bool,

    /// Artificial pause before printing a report, in milliseconds
    #[arg(long, default_value = "0", value_parser = clap::value_parser!(u64).range(0..=10_000))]
    pub delay_ms: u64,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Clear saved configuration
    #[arg(long)]
    pub clear: bool,
}

// ── LastUsedParams ─────────────────────────────────────────────────────────────

/// Persisted last-used parameters saved to `~/.spend-tracker/last_used.json`.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct LastUsedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<PathBuf>,
}

impl LastUsedParams {
    /// Default path: `~/.spend-tracker/last_used.json`.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&home_dir())
    }

    /// Return the config path rooted at `base_dir` (used for testing).
    pub fn config_path_in(base_dir: &Path) -> PathBuf {
        base_dir.join(APP_DIR_NAME).join("last_used.json")
    }

    /// Load persisted params from the default path.
    /// Returns `Default` when the file is absent or cannot be parsed.
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_default()
    }

    /// Atomically write params to the default path, creating parent directories
    /// if needed.
    pub fn save(&self) -> Result<(), std::io::Error> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Delete the default config file if it exists.
    pub fn clear() -> Result<(), std::io::Error> {
        Self::clear_at(&Self::config_path())
    }

    pub fn clear_at(path: &Path) -> Result<(), std::io::Error> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments, merge with last-used params where no explicit CLI
    /// value was provided, resolve `"auto"` values, and persist the result.
    pub fn load_with_last_used() -> Self {
        Self::load_with_last_used_impl(
            std::env::args_os().collect(),
            &LastUsedParams::config_path(),
        )
    }

    /// Full implementation: accepts args and an explicit config path so that
    /// tests can redirect to a temporary directory.
    pub fn load_with_last_used_impl(
        args: Vec<std::ffi::OsString>,
        config_path: &Path,
    ) -> Self {
        let matches = Settings::command().get_matches_from(args.clone());
        let mut settings = Settings::parse_from(args);

        if settings.clear {
            let _ = LastUsedParams::clear_at(config_path);
            return Self::resolve_auto_values(settings);
        }

        let last = LastUsedParams::load_from(config_path);

        // CLI always wins. `month` is never loaded from last-used.
        if !is_arg_explicitly_set(&matches, "view") {
            if let Some(v) = last.view {
                settings.view = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "currency") {
            if let Some(v) = last.currency {
                settings.currency = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "timezone") {
            if let Some(v) = last.timezone {
                settings.timezone = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "data") && settings.data.is_none() {
            settings.data = last.data;
        }

        settings = Self::resolve_auto_values(settings);

        let params = LastUsedParams::from(&settings);
        if let Err(e) = params.save_to(config_path) {
            warn!("Could not persist settings to {}: {}", config_path.display(), e);
        }

        settings
    }

    /// Reject values that cannot be honoured once `auto` has been resolved.
    ///
    /// An explicit timezone must be a known IANA name; unknown currency codes
    /// are allowed and render with the code as prefix.
    pub fn validate(&self) -> crate::error::Result<()> {
        if !TimezoneHandler::validate_timezone(&self.timezone) {
            return Err(TrackerError::Config(format!(
                "unknown timezone \"{}\"",
                self.timezone
            )));
        }
        Ok(())
    }

    /// Expense data location, falling back to `~/.spend-tracker/expenses.json`.
    pub fn data_path(&self) -> PathBuf {
        self.data.clone().unwrap_or_else(default_data_path)
    }

    /// Resolve `"auto"` sentinel values, normalise the currency code and apply
    /// the `--debug` flag.
    fn resolve_auto_values(mut settings: Settings) -> Settings {
        if settings.timezone == "auto" {
            let detected = crate::time_utils::get_system_timezone();
            settings.timezone = if TimezoneHandler::validate_timezone(&detected) {
                detected
            } else {
                warn!("System timezone \"{}\" is not recognised, using UTC", detected);
                "UTC".to_string()
            };
        }

        settings.currency = settings.currency.trim().to_uppercase();
        if Currency::lookup(&settings.currency).is_none() {
            warn!(
                "Unknown currency \"{}\"; amounts will be prefixed with the code",
                settings.currency
            );
        }

        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }

        settings
    }
}

// ── Conversion ─────────────────────────────────────────────────────────────────

impl From<&Settings> for LastUsedParams {
    fn from(s: &Settings) -> Self {
        LastUsedParams {
            view: Some(s.view.clone()),
            currency: Some(s.currency.clone()),
            timezone: Some(s.timezone.clone()),
            data: s.data.clone(),
        }
    }
}

// ── Helpers ────────────────────────────────────────────────────────────────────

/// Default expense file: `~/.spend-tracker/expenses.json`.
pub fn default_data_path() -> PathBuf {
    home_dir().join(APP_DIR_NAME).join("expenses.json")
}

fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// Returns `true` when `name` was supplied explicitly on the command line
/// (not via default value or environment variable).
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
