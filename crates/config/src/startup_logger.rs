//! Service startup logging for the Kite deposit router

use std::env;
use tracing::info;

use crate::Settings;

/// Logs service, platform and configuration summary at startup
pub fn log_service_info(settings: &Settings) {
	// Root package name, not this crate's
	let service_name = "kite-router";
	let service_version = env!("CARGO_PKG_VERSION");

	info!("=== Kite Router Starting ===");
	info!("🚀 Service: {} v{}", service_name, service_version);
	info!("💻 Platform: {} ({})", env::consts::OS, env::consts::ARCH);

	if let Ok(cwd) = env::current_dir() {
		info!("📁 Working Directory: {}", cwd.display());
	}
	if let Ok(rust_log) = env::var("RUST_LOG") {
		info!("🔧 Log Level: {}", rust_log);
	}

	info!("🧭 Routing vendor: {}", settings.lifi.endpoint);
	match &settings.lifi.api_key {
		Some(key) => info!("🔑 Routing API key: {}", key.description()),
		None => info!("🔑 Routing API key: none (public rate limits)"),
	}
	info!(
		"🏦 Known vaults: {} across {} KiteSafe deployment(s)",
		settings.vaults.len(),
		settings.kite_safe.len()
	);
	info!("⏱️ Route debounce: {}ms", settings.routing.debounce_ms);
	match &settings.history.path {
		Some(path) => info!("📋 History file: {}", path),
		None => info!("📋 History: in-memory"),
	}

	info!(
		"🕒 Started at: {}",
		chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
	);
}

pub fn log_service_shutdown() {
	info!("🛑 Kite Router Shutting Down");
	info!(
		"🕒 Shutdown at: {}",
		chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
	);
}

pub fn log_startup_complete(bind_address: &str) {
	info!("✅ Kite Router Started Successfully");
	info!("🌐 Server listening on: {}", bind_address);
	info!("📡 Ready to accept requests");
}
