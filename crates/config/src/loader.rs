//! Configuration loading utilities

use crate::Settings;
use config::{Config, ConfigError, Environment, File};

/// Prefix of environment overrides, e.g. `KITE__SERVER__PORT=8080`
pub const ENV_PREFIX: &str = "KITE";

/// Load configuration from `config/config` overlaid with `KITE__` environment variables
pub fn load_config() -> Result<Settings, ConfigError> {
	load_config_from("config/config")
}

/// Load configuration from the given file stem (extension optional)
///
/// Values missing from both the file and the environment fall back to
/// [`Settings::default`].
pub fn load_config_from(path: &str) -> Result<Settings, ConfigError> {
	let defaults = Config::try_from(&Settings::default())?;

	let s = Config::builder()
		.add_source(defaults)
		.add_source(File::with_name(path).required(false))
		.add_source(
			Environment::with_prefix(ENV_PREFIX)
				.prefix_separator("__")
				.separator("__")
				.try_parsing(true),
		)
		.build()?;

	s.try_deserialize()
}
