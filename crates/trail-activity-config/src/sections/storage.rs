// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Storage backend configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

const DEFAULT_SQLITE_PATH: &str = "./activity.db";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
	Memory,
	#[default]
	Sqlite,
}

impl std::str::FromStr for StorageBackend {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"memory" => Ok(StorageBackend::Memory),
			"sqlite" => Ok(StorageBackend::Sqlite),
			other => Err(format!("unknown storage backend '{other}'")),
		}
	}
}

/// Storage configuration (runtime, fully resolved).
#[derive(Debug, Clone, PartialEq)]
pub struct StorageConfig {
	pub backend: StorageBackend,
	pub sqlite_path: PathBuf,
}

impl Default for StorageConfig {
	fn default() -> Self {
		StorageConfigLayer::default().finalize()
	}
}

/// Storage configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageConfigLayer {
	#[serde(default)]
	pub backend: Option<StorageBackend>,
	#[serde(default)]
	pub sqlite_path: Option<PathBuf>,
}

impl StorageConfigLayer {
	pub fn merge(&mut self, other: StorageConfigLayer) {
		if other.backend.is_some() {
			self.backend = other.backend;
		}
		if other.sqlite_path.is_some() {
			self.sqlite_path = other.sqlite_path;
		}
	}

	pub fn finalize(self) -> StorageConfig {
		StorageConfig {
			backend: self.backend.unwrap_or_default(),
			sqlite_path: self
				.sqlite_path
				.unwrap_or_else(|| PathBuf::from(DEFAULT_SQLITE_PATH)),
		}
	}
}
