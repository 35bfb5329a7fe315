use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use iso_week::{Output, VerifyRange, Zone};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    #[default]
    String,
    Tuple,
    Json,
}

impl OutputMode {
    /// the library's rendering for this mode, `None` for json
    pub fn as_output(self) -> Option<Output> {
        match self {
            OutputMode::String => Some(Output::String),
            OutputMode::Tuple => Some(Output::Tuple),
            OutputMode::Json => None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub zone: Zone,
    pub output: OutputMode,
    pub verify: VerifyRange,
}

impl AppConfig {
    pub fn load(name: &str) -> Result<AppConfig, ConfigError> {
        Config::builder()
            // Add in `./<name>.{toml|yml|json}` if present
            .add_source(File::with_name(name).required(false))
            // Add in settings from the environment, eg. `ISO_WEEK_ZONE=utc` or `ISO_WEEK_VERIFY__WINDOW=3`
            .add_source(
                Environment::with_prefix("ISO_WEEK")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize::<AppConfig>()
    }
}
