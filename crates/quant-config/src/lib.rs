//! Configuration management.
//!
//! Settings come from a TOML file layered with `QUANT__`-prefixed
//! environment variables, e.g. `QUANT__BACKTEST__SEED=7`.

mod settings;

pub use settings::{
    AppConfig, AppSettings, BacktestSettings, LoggingConfig, NarrativeProvider,
    NarrativeSettings, SettingsError,
};

use config::{Config, ConfigError, Environment, File};
use std::path::Path;

/// Load configuration from file and environment.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from(path).required(true))
        .add_source(
            Environment::with_prefix("QUANT")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    config.try_deserialize()
}
