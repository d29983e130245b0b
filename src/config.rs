//! Configuration for selsync
//!
//! The configuration follows a priority chain:
//! 1. Built-in defaults (Config::default())
//! 2. Config file (~/.selsync/config.toml or config.json5)
//! 3. Environment variables (SELSYNC_* prefix)
//! 4. CLI flags (highest priority, applied by the binary)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;

/// Prefix of all environment overrides
pub const ENV_PREFIX: &str = "SELSYNC_";

/// Configuration for selection sessions and the CLI
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
	// ========================================================================
	// RUNTIME & STATE MANAGEMENT
	// ========================================================================
	/// Directory holding the exclusion stores (~/.selsync)
	pub state_dir: PathBuf,

	/// Profile name; each profile has its own exclusion store
	pub profile: String,

	// ========================================================================
	// LISTING
	// ========================================================================
	/// Give up on a listing request after this many seconds
	pub listing_timeout_secs: u64,

	/// How many levels the CLI expands before printing a tree
	pub expand_depth: usize,

	// ========================================================================
	// OUTPUT & LOGGING
	// ========================================================================
	/// Log level (trace, debug, info, warn, error)
	pub log_level: String,

	/// Log format
	pub log_format: LogFormat,
}

impl Default for Config {
	fn default() -> Self {
		Config {
			state_dir: std::env::var("HOME")
				.ok()
				.map(|h| PathBuf::from(h).join(".selsync"))
				.unwrap_or_else(|| PathBuf::from(".selsync")),
			profile: "default".to_string(),
			listing_timeout_secs: 30,
			expand_depth: 2,
			log_level: "info".to_string(),
			log_format: LogFormat::Pretty,
		}
	}
}

impl Config {
	/// Load a config file, choosing the format by extension
	///
	/// `.toml` is parsed as TOML, anything else as JSON5 (which also accepts
	/// plain JSON). Missing keys keep their defaults.
	pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
		let display = path.display().to_string();
		let contents = std::fs::read_to_string(path)
			.map_err(|e| ConfigError::Read { path: display.clone(), source: e })?;

		let is_toml = path.extension().map(|e| e == "toml").unwrap_or(false);
		let config: Config = if is_toml {
			toml::from_str(&contents)
				.map_err(|e| ConfigError::Parse { path: display, message: e.to_string() })?
		} else {
			json5::from_str(&contents)
				.map_err(|e| ConfigError::Parse { path: display, message: e.to_string() })?
		};
		config.validate()?;
		Ok(config)
	}

	/// Load from `path` if given, else from the default location if present
	pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
		let mut config = match path {
			Some(p) => Config::from_file(p)?,
			None => {
				let defaults = Config::default();
				match defaults.find_default_file() {
					Some(p) => Config::from_file(&p)?,
					None => defaults,
				}
			}
		};
		config.apply_env(|key| std::env::var(key).ok())?;
		Ok(config)
	}

	fn find_default_file(&self) -> Option<PathBuf> {
		["config.toml", "config.json5", "config.json"]
			.iter()
			.map(|name| self.state_dir.join(name))
			.find(|p| p.exists())
	}

	/// Apply `SELSYNC_*` overrides read through `lookup`
	pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let var = |name: &str| lookup(&format!("{}{}", ENV_PREFIX, name));

		if let Some(v) = var("STATE_DIR") {
			self.state_dir = PathBuf::from(v);
		}
		if let Some(v) = var("PROFILE") {
			self.profile = v;
		}
		if let Some(v) = var("LISTING_TIMEOUT") {
			self.listing_timeout_secs = v.parse().map_err(|_| ConfigError::Invalid {
				message: format!("{}LISTING_TIMEOUT must be a number of seconds, got '{}'", ENV_PREFIX, v),
			})?;
		}
		if let Some(v) = var("LOG") {
			self.log_level = v;
		}
		self.validate()
	}

	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.profile.is_empty() || self.profile.contains('/') {
			return Err(ConfigError::Invalid {
				message: format!("profile name '{}' must be non-empty and contain no '/'", self.profile),
			});
		}
		if self.listing_timeout_secs == 0 {
			return Err(ConfigError::Invalid {
				message: "listingTimeoutSecs must be at least 1".to_string(),
			});
		}
		Ok(())
	}

	pub fn listing_timeout(&self) -> Duration {
		Duration::from_secs(self.listing_timeout_secs)
	}
}

/// Log format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum LogFormat {
	#[default]
	Pretty,
	Compact,
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashMap;

	#[test]
	fn test_config_default() {
		let config = Config::default();
		assert_eq!(config.profile, "default");
		assert_eq!(config.listing_timeout_secs, 30);
		assert_eq!(config.log_format, LogFormat::Pretty);
		assert!(config.validate().is_ok());
	}

	#[test]
	fn test_config_serialization() {
		let config = Config::default();
		let json = serde_json::to_string(&config).expect("Failed to serialize");
		assert!(json.contains("\"listingTimeoutSecs\":30"));
		let deserialized: Config = serde_json::from_str(&json).expect("Failed to deserialize");
		assert_eq!(config.profile, deserialized.profile);
	}

	#[test]
	fn test_env_overrides() {
		let env: HashMap<&str, &str> =
			[("SELSYNC_PROFILE", "work"), ("SELSYNC_LISTING_TIMEOUT", "5")].into_iter().collect();
		let mut config = Config::default();
		config.apply_env(|k| env.get(k).map(|v| v.to_string())).unwrap();
		assert_eq!(config.profile, "work");
		assert_eq!(config.listing_timeout(), Duration::from_secs(5));
	}

	#[test]
	fn test_env_rejects_bad_timeout() {
		let mut config = Config::default();
		let err = config
			.apply_env(|k| if k == "SELSYNC_LISTING_TIMEOUT" { Some("soon".into()) } else { None })
			.unwrap_err();
		assert!(matches!(err, ConfigError::Invalid { .. }));
	}

	#[test]
	fn test_validate_profile() {
		let config = Config { profile: "a/b".to_string(), ..Default::default() };
		assert!(config.validate().is_err());
	}
}

// vim: ts=4
