use crate::config::AppConfig;
use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Json, Serialized, Toml},
    Figment,
};
use std::path::Path;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Config file read by [`ConfigLoader::load`].
    pub const DEFAULT_PATH: &'static str = "config/Config.toml";

    /// Prefix for environment overrides, e.g. `SELLER_WALLET__CURRENCY=1`.
    pub const ENV_PREFIX: &'static str = "SELLER_";

    /// Loads configuration from the default file and environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be parsed or the wallet settings are invalid.
    pub fn load() -> Result<AppConfig> {
        Self::load_from(Self::DEFAULT_PATH)
    }

    /// Loads configuration by merging built-in defaults, the given TOML (or
    /// JSON, by extension) file, and `SELLER_`-prefixed environment variables.
    /// A missing file leaves the defaults in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be parsed or the wallet settings are invalid.
    pub fn load_from(path: impl AsRef<Path>) -> Result<AppConfig> {
        let path = path.as_ref();
        let figment = Figment::from(Serialized::defaults(AppConfig::default()));

        let figment = if path.extension().is_some_and(|ext| ext == "json") {
            figment.merge(Json::file(path))
        } else {
            figment.merge(Toml::file(path))
        };

        Self::extract(figment.merge(Env::prefixed(Self::ENV_PREFIX).split("__")))
    }

    /// Extracts and validates configuration from an already assembled figment.
    ///
    /// # Errors
    ///
    /// Returns an error if extraction fails or the wallet settings are invalid.
    pub fn extract(figment: Figment) -> Result<AppConfig> {
        let config: AppConfig = figment.extract().context("failed to read configuration")?;

        config
            .wallet
            .fee_schedule()
            .context("invalid wallet fee settings")?;

        Ok(config)
    }
}
