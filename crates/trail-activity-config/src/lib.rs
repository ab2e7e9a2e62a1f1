// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration management for the Trail activity recorder.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file, environment)
//! - Type-safe configuration with validation
//! - Consistent environment variable naming (`TRAIL_ACTIVITY_*`)
//! - Tracing subscriber setup driven by the logging section
//!
//! # Usage
//!
//! ```ignore
//! use trail_activity_config::{load_config, telemetry};
//!
//! let config = load_config()?;
//! telemetry::init_tracing(&config.logging)?;
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;
pub mod telemetry;

pub use error::ConfigError;
pub use layer::ConfigLayer;
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

use tracing::{debug, info};

/// Fully resolved recorder configuration.
#[derive(Debug, Clone, Default)]
pub struct TrailConfig {
	pub activity: ActivityConfig,
	pub storage: StorageConfig,
	pub logging: LoggingConfig,
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`TRAIL_ACTIVITY_*`)
/// 2. Config file (`/etc/trail/activity.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<TrailConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource::new()),
	])
}

/// Load configuration from environment only (for testing or simple deployments).
pub fn load_config_from_env() -> Result<TrailConfig, ConfigError> {
	load_from_sources(vec![Box::new(EnvSource::new())])
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<TrailConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource::new()),
	])
}

/// Merge the given sources in precedence order and finalize.
pub fn load_from_sources(
	mut sources: Vec<Box<dyn ConfigSource>>,
) -> Result<TrailConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = ConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	finalize(merged)
}

/// Finalize configuration layer into resolved config.
fn finalize(layer: ConfigLayer) -> Result<TrailConfig, ConfigError> {
	let activity = layer.activity.unwrap_or_default().finalize();
	let storage = layer.storage.unwrap_or_default().finalize();
	let logging = layer.logging.unwrap_or_default().finalize();

	validate_config(&activity)?;

	info!(
		enabled = activity.enabled,
		log_non_interactive = activity.log_non_interactive,
		ignored_options = activity.ignored_options.len(),
		backend = ?storage.backend,
		"Activity configuration loaded"
	);

	Ok(TrailConfig {
		activity,
		storage,
		logging,
	})
}

/// Validate cross-field configuration rules.
fn validate_config(activity: &ActivityConfig) -> Result<(), ConfigError> {
	if activity.default_per_page == 0 || activity.max_per_page == 0 {
		return Err(ConfigError::Validation(
			"page sizes must be greater than zero".to_string(),
		));
	}

	if activity.default_per_page > activity.max_per_page {
		return Err(ConfigError::Validation(format!(
			"default_per_page ({}) exceeds max_per_page ({})",
			activity.default_per_page, activity.max_per_page
		)));
	}

	Ok(())
}
