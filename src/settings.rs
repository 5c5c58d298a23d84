//! Timeline settings
//!
//! `defaults/timeline.default.toml` is embedded into the binary so the
//! documented defaults and runtime behavior stay in sync. Callers layer a user
//! file, `TIMELINE_*` environment variables and explicit overrides on top via
//! [`Loader`], then pass the resulting values to the pure functions that need
//! them (`sort_events(events, order)`, `format_date(event, pattern)`).

use std::path::Path;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat, ValueKind};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::format::DEFAULT_DATE_FORMAT;
use crate::sort::SortOrder;

const DEFAULT_TOML: &str = include_str!("../defaults/timeline.default.toml");

/// Prefix for environment overrides, e.g. `TIMELINE_DATE_FORMAT`
pub const ENV_PREFIX: &str = "TIMELINE";

/// User-facing timeline settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineSettings {
    /// View opened by default
    pub default_view: String,
    /// Default sort order for timeline events
    pub timeline_order: SortOrder,
    /// Whether the search box and order toggle are shown
    pub show_header_buttons: bool,
    /// Date format pattern for displaying dates
    pub date_format: String,
}

impl Default for TimelineSettings {
    fn default() -> Self {
        Self {
            default_view: "timeline".to_string(),
            timeline_order: SortOrder::Ascending,
            show_header_buttons: true,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a settings file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer a settings file if it exists.
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer `TIMELINE_*` environment variables.
    pub fn with_environment(mut self) -> Self {
        self.builder = self
            .builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true));
        self
    }

    /// Override a single key (e.g. `timeline_order`).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting settings.
    ///
    /// A blank `date_format` falls back to [`DEFAULT_DATE_FORMAT`].
    pub fn build(self) -> Result<TimelineSettings> {
        let mut settings: TimelineSettings = self.builder.build()?.try_deserialize()?;
        if settings.date_format.trim().is_empty() {
            settings.date_format = DEFAULT_DATE_FORMAT.to_string();
        }
        info!(
            order = %settings.timeline_order,
            date_format = %settings.date_format,
            "loaded timeline settings"
        );
        Ok(settings)
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Defaults, then `path` if given, then the environment.
pub fn load_settings(path: Option<&Path>) -> Result<TimelineSettings> {
    let mut loader = Loader::new();
    if let Some(path) = path {
        loader = loader.with_file(path);
    }
    loader.with_environment().build()
}
