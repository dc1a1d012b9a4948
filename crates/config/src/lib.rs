//! Kite Configuration
//!
//! Configuration management and startup utilities for the Kite deposit router.

pub mod configurable_value;
pub mod loader;
pub mod settings;
pub mod startup_logger;

pub use configurable_value::{ConfigurableValue, ConfigurableValueError, ValueType};
pub use loader::{load_config, load_config_from, ENV_PREFIX};
pub use settings::{
	BalanceSettings, ConfigValidationError, EnsSettings, HistorySettings, KiteSafeConfig,
	LifiSettings, LogFormat, LoggingSettings, RoutingSettings, ServerSettings, Settings,
	VaultConfig,
};
pub use startup_logger::{log_service_info, log_service_shutdown, log_startup_complete};
