// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: environment variables and TOML files.

use std::path::PathBuf;

use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::layer::ConfigLayer;
use crate::sections::{
	ActivityConfigLayer, LogFormat, LoggingConfigLayer, StorageBackend, StorageConfigLayer,
};

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<ConfigLayer, ConfigError>;
}

/// Built-in defaults source.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<ConfigLayer, ConfigError> {
		debug!("loading defaults");
		Ok(ConfigLayer::default())
	}
}

/// TOML file configuration source.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new("/etc/trail/activity.toml")
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<ConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(ConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: ConfigLayer = toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
			path: self.path.clone(),
			source: e,
		})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

type Lookup = dyn Fn(&str) -> Option<String> + Send + Sync;

/// Environment variable source.
///
/// Convention: TRAIL_ACTIVITY_<FIELD>
pub struct EnvSource {
	lookup: Box<Lookup>,
}

impl EnvSource {
	pub fn new() -> Self {
		Self::with_lookup(|name| std::env::var(name).ok())
	}

	/// Build a source that reads variables through `lookup` instead of the process environment.
	pub fn with_lookup(lookup: impl Fn(&str) -> Option<String> + Send + Sync + 'static) -> Self {
		Self {
			lookup: Box::new(lookup),
		}
	}

	fn var(&self, name: &str) -> Option<String> {
		(self.lookup)(name).filter(|s| !s.is_empty())
	}

	fn bool(&self, name: &str) -> Option<bool> {
		self
			.var(name)
			.map(|v| v.eq_ignore_ascii_case("true") || v == "1")
	}

	fn u32(&self, name: &str) -> Result<Option<u32>, ConfigError> {
		match self.var(name) {
			Some(v) => v.parse().map(Some).map_err(|_| ConfigError::InvalidValue {
				key: name.to_string(),
				message: format!("invalid u32 value '{v}'"),
			}),
			None => Ok(None),
		}
	}

	fn list(&self, name: &str) -> Option<Vec<String>> {
		self.var(name).map(|v| {
			v.split(',')
				.map(str::trim)
				.filter(|s| !s.is_empty())
				.map(ToString::to_string)
				.collect()
		})
	}

	fn parsed<T>(&self, name: &str) -> Result<Option<T>, ConfigError>
	where
		T: std::str::FromStr<Err = String>,
	{
		match self.var(name) {
			Some(v) => v.parse().map(Some).map_err(|message| ConfigError::InvalidValue {
				key: name.to_string(),
				message,
			}),
			None => Ok(None),
		}
	}

	fn load_activity(&self) -> Result<ActivityConfigLayer, ConfigError> {
		Ok(ActivityConfigLayer {
			enabled: self.bool("TRAIL_ACTIVITY_ENABLED"),
			log_non_interactive: self.bool("TRAIL_ACTIVITY_LOG_NON_INTERACTIVE"),
			ignored_options: self.list("TRAIL_ACTIVITY_IGNORED_OPTIONS"),
			default_per_page: self.u32("TRAIL_ACTIVITY_DEFAULT_PER_PAGE")?,
			max_per_page: self.u32("TRAIL_ACTIVITY_MAX_PER_PAGE")?,
			fallback_actor_label: self.var("TRAIL_ACTIVITY_FALLBACK_ACTOR_LABEL"),
		})
	}

	fn load_storage(&self) -> Result<StorageConfigLayer, ConfigError> {
		Ok(StorageConfigLayer {
			backend: self.parsed::<StorageBackend>("TRAIL_ACTIVITY_STORAGE_BACKEND")?,
			sqlite_path: self.var("TRAIL_ACTIVITY_SQLITE_PATH").map(PathBuf::from),
		})
	}

	fn load_logging(&self) -> Result<LoggingConfigLayer, ConfigError> {
		Ok(LoggingConfigLayer {
			level: self.var("TRAIL_ACTIVITY_LOG_LEVEL"),
			format: self.parsed::<LogFormat>("TRAIL_ACTIVITY_LOG_FORMAT")?,
		})
	}
}

impl Default for EnvSource {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<ConfigLayer, ConfigError> {
		debug!("loading environment variables");
		Ok(ConfigLayer {
			activity: Some(self.load_activity()?),
			storage: Some(self.load_storage()?),
			logging: Some(self.load_logging()?),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashMap;
	use std::io::Write;

	fn env_from(pairs: &[(&str, &str)]) -> EnvSource {
		let vars: HashMap<String, String> = pairs
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect();
		EnvSource::with_lookup(move |name| vars.get(name).cloned())
	}

	#[test]
	fn test_precedence_ordering() {
		assert!(Precedence::Defaults < Precedence::ConfigFile);
		assert!(Precedence::ConfigFile < Precedence::Environment);
	}

	#[test]
	fn test_env_source_reads_activity_fields() {
		let layer = env_from(&[
			("TRAIL_ACTIVITY_ENABLED", "0"),
			("TRAIL_ACTIVITY_LOG_NON_INTERACTIVE", "true"),
			("TRAIL_ACTIVITY_IGNORED_OPTIONS", "cron, siteurl ,"),
			("TRAIL_ACTIVITY_MAX_PER_PAGE", "42"),
		])
		.load()
		.unwrap();

		let activity = layer.activity.unwrap();
		assert_eq!(activity.enabled, Some(false));
		assert_eq!(activity.log_non_interactive, Some(true));
		assert_eq!(
			activity.ignored_options,
			Some(vec!["cron".to_string(), "siteurl".to_string()])
		);
		assert_eq!(activity.max_per_page, Some(42));
		assert_eq!(activity.default_per_page, None);
	}

	#[test]
	fn test_env_source_ignores_empty_values() {
		let layer = env_from(&[("TRAIL_ACTIVITY_LOG_LEVEL", "")]).load().unwrap();
		assert_eq!(layer.logging.unwrap().level, None);
	}

	#[test]
	fn test_env_source_rejects_bad_number() {
		let err = env_from(&[("TRAIL_ACTIVITY_DEFAULT_PER_PAGE", "lots")])
			.load()
			.unwrap_err();
		assert!(matches!(
			err,
			ConfigError::InvalidValue { ref key, .. } if key == "TRAIL_ACTIVITY_DEFAULT_PER_PAGE"
		));
	}

	#[test]
	fn test_env_source_rejects_unknown_backend() {
		let err = env_from(&[("TRAIL_ACTIVITY_STORAGE_BACKEND", "oracle")])
			.load()
			.unwrap_err();
		assert!(err.to_string().contains("unknown storage backend"));
	}

	#[test]
	fn test_toml_source_missing_file_is_empty() {
		let layer = TomlSource::new("/nonexistent/trail/activity.toml")
			.load()
			.unwrap();
		assert!(layer.activity.is_none());
	}

	#[test]
	fn test_toml_source_reads_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "[storage]\nbackend = \"memory\"").unwrap();

		let layer = TomlSource::new(file.path()).load().unwrap();
		assert_eq!(layer.storage.unwrap().backend, Some(StorageBackend::Memory));
	}

	#[test]
	fn test_toml_source_reports_parse_error() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "[storage\nbackend = ").unwrap();

		let err = TomlSource::new(file.path()).load().unwrap_err();
		assert!(matches!(err, ConfigError::TomlParse { .. }));
	}
}
