// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Storage backends for activity records.
//!
//! A store is an append-only collection of [`ActivityRecord`]s keyed by a
//! store-assigned [`ActivityId`], plus a [`MetaStore`] of key/value entries
//! scoped to each record. Records in [`ActivityStatus::Pending`] are never
//! returned to readers.

#[cfg(test)]
pub(crate) mod conformance;
mod memory;
#[cfg(feature = "store-sqlite")]
mod sqlite;

pub use memory::MemoryActivityStore;
#[cfg(feature = "store-sqlite")]
pub use sqlite::SqliteActivityStore;

use std::sync::Arc;

use serde_json::Value;
use tracing::info;
use trail_activity_config::{StorageBackend, StorageConfig};

use crate::error::StoreError;
use crate::meta::ActivityMeta;
use crate::query::{ActivityFilter, ListQuery};
use crate::record::{ActivityId, ActivityRecord, ActivityStatus, RecordFields};

/// Key/value attachments scoped to one activity record.
pub trait MetaStore: Send + Sync {
	/// Insert or replace one entry on a pending record. Fails with `NotFound`
	/// for unknown records and `Sealed` once the record left pending.
	fn attach_metadata(&self, id: ActivityId, key: &str, value: &Value) -> Result<(), StoreError>;

	/// All entries for a record; unknown records yield an empty map.
	fn get_metadata(&self, id: ActivityId) -> Result<ActivityMeta, StoreError>;
}

pub trait ActivityStore: MetaStore {
	fn name(&self) -> &str;

	/// Append a record and return its newly assigned id.
	fn create_record(&self, fields: RecordFields) -> Result<ActivityId, StoreError>;

	/// Move a record between statuses. A record that left pending can never
	/// return to it (`Sealed`).
	fn set_status(&self, id: ActivityId, status: ActivityStatus) -> Result<(), StoreError>;

	/// Fetch a visible record. Pending records read as absent.
	fn get_record(&self, id: ActivityId) -> Result<Option<ActivityRecord>, StoreError>;

	fn list_records(&self, query: &ListQuery) -> Result<Vec<ActivityRecord>, StoreError>;

	fn count_records(&self, filter: &ActivityFilter) -> Result<u64, StoreError>;

	/// Remove a record together with its metadata.
	fn delete_record(&self, id: ActivityId) -> Result<(), StoreError>;

	fn publish(&self, id: ActivityId) -> Result<(), StoreError> {
		self.set_status(id, ActivityStatus::Published)
	}
}

/// Build the store selected by configuration.
pub fn open_store(config: &StorageConfig) -> Result<Arc<dyn ActivityStore>, StoreError> {
	info!(backend = ?config.backend, "opening activity store");
	match config.backend {
		StorageBackend::Memory => Ok(Arc::new(MemoryActivityStore::new())),
		#[cfg(feature = "store-sqlite")]
		StorageBackend::Sqlite => Ok(Arc::new(SqliteActivityStore::open(&config.sqlite_path)?)),
		#[cfg(not(feature = "store-sqlite"))]
		StorageBackend::Sqlite => Err(StoreError::Backend(
			"sqlite backend requires the store-sqlite feature".to_string(),
		)),
	}
}
