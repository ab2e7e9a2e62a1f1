// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::collections::{BTreeMap, HashMap};

use parking_lot::RwLock;
use serde_json::Value;

use super::{ActivityStore, MetaStore};
use crate::error::StoreError;
use crate::meta::ActivityMeta;
use crate::query::{ActivityFilter, ListQuery};
use crate::record::{ActivityId, ActivityRecord, ActivityStatus, RecordFields};

#[derive(Debug, Default)]
struct Inner {
	next_id: u64,
	records: BTreeMap<ActivityId, ActivityRecord>,
	meta: HashMap<ActivityId, ActivityMeta>,
}

/// In-process store for tests and hosts without durable storage.
#[derive(Debug, Default)]
pub struct MemoryActivityStore {
	inner: RwLock<Inner>,
}

impl MemoryActivityStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of stored records in any status, including pending ones.
	pub fn raw_len(&self) -> usize {
		self.inner.read().records.len()
	}
}

impl MetaStore for MemoryActivityStore {
	fn attach_metadata(&self, id: ActivityId, key: &str, value: &Value) -> Result<(), StoreError> {
		let mut inner = self.inner.write();
		match inner.records.get(&id) {
			None => return Err(StoreError::NotFound(id)),
			Some(record) if record.status != ActivityStatus::Pending => {
				return Err(StoreError::Sealed(id));
			}
			Some(_) => {}
		}
		inner
			.meta
			.entry(id)
			.or_default()
			.insert(key, value.clone());
		Ok(())
	}

	fn get_metadata(&self, id: ActivityId) -> Result<ActivityMeta, StoreError> {
		Ok(self.inner.read().meta.get(&id).cloned().unwrap_or_default())
	}
}

impl ActivityStore for MemoryActivityStore {
	fn name(&self) -> &str {
		"memory"
	}

	fn create_record(&self, fields: RecordFields) -> Result<ActivityId, StoreError> {
		let mut inner = self.inner.write();
		inner.next_id += 1;
		let id = ActivityId::new(inner.next_id);
		inner.records.insert(id, fields.into_record(id));
		Ok(id)
	}

	fn set_status(&self, id: ActivityId, status: ActivityStatus) -> Result<(), StoreError> {
		let mut inner = self.inner.write();
		let record = inner.records.get_mut(&id).ok_or(StoreError::NotFound(id))?;
		if status == ActivityStatus::Pending && record.status != ActivityStatus::Pending {
			return Err(StoreError::Sealed(id));
		}
		record.status = status;
		Ok(())
	}

	fn get_record(&self, id: ActivityId) -> Result<Option<ActivityRecord>, StoreError> {
		Ok(self
			.inner
			.read()
			.records
			.get(&id)
			.filter(|r| r.status.is_visible())
			.cloned())
	}

	fn list_records(&self, query: &ListQuery) -> Result<Vec<ActivityRecord>, StoreError> {
		let inner = self.inner.read();
		let mut matched: Vec<&ActivityRecord> = inner
			.records
			.values()
			.filter(|r| r.status.is_visible() && query.filter.matches(r))
			.collect();
		matched.sort_by(|a, b| query.sort.compare(a, b));

		Ok(matched
			.into_iter()
			.skip(query.offset as usize)
			.take(query.limit as usize)
			.cloned()
			.collect())
	}

	fn count_records(&self, filter: &ActivityFilter) -> Result<u64, StoreError> {
		Ok(self
			.inner
			.read()
			.records
			.values()
			.filter(|r| r.status.is_visible() && filter.matches(r))
			.count() as u64)
	}

	fn delete_record(&self, id: ActivityId) -> Result<(), StoreError> {
		let mut inner = self.inner.write();
		inner.records.remove(&id).ok_or(StoreError::NotFound(id))?;
		inner.meta.remove(&id);
		Ok(())
	}
}
