//! Build-time configuration.
//!
//! Values are baked in when the WASM bundle is compiled, e.g.
//! `PROINSIGHT_API_URL=http://localhost:8000 trunk build`.

use std::str::FromStr;

use log::Level;

/// Backend used when `PROINSIGHT_API_URL` is not set at build time.
pub const DEFAULT_API_URL: &str = "https://proinsight-backend.onrender.com";

const DEFAULT_LOG_LEVEL: Level = Level::Debug;

/// Settings the app reads once at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
	/// Base URL of the analysis backend, without a trailing slash.
	pub api_base_url: String,
	/// Maximum level forwarded to the browser console.
	pub log_level: Level,
}

impl AppConfig {
	/// Read the configuration captured from the build environment.
	pub fn from_build_env() -> Self {
		Self::from_values(
			option_env!("PROINSIGHT_API_URL"),
			option_env!("PROINSIGHT_LOG_LEVEL"),
		)
	}

	fn from_values(api_url: Option<&str>, log_level: Option<&str>) -> Self {
		let api_base_url = api_url
			.map(str::trim)
			.filter(|url| !url.is_empty())
			.unwrap_or(DEFAULT_API_URL)
			.trim_end_matches('/')
			.to_string();
		let log_level = log_level
			.and_then(|level| Level::from_str(level.trim()).ok())
			.unwrap_or(DEFAULT_LOG_LEVEL);

		Self {
			api_base_url,
			log_level,
		}
	}
}

impl Default for AppConfig {
	fn default() -> Self {
		Self::from_values(None, None)
	}
}
