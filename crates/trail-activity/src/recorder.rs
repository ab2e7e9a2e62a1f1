// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Validating and persisting activity drafts.
//!
//! A record is written in [`ActivityStatus::Pending`], its metadata is
//! attached, and only then is it published. If any step fails the pending
//! record is purged, so readers never observe a record without its
//! metadata.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, instrument, warn};

use crate::error::{ActivityError, ActivityResult};
use crate::record::{
	ActivityId, ActivitySeverity, ActivityStatus, ActorId, NewActivity, RecordFields,
};
use crate::store::ActivityStore;

/// Source of the currently authenticated actor.
pub trait ActorContext: Send + Sync {
	fn current_actor(&self) -> Option<ActorId>;
}

/// No authenticated actor, e.g. cron or CLI contexts.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoActor;

impl ActorContext for NoActor {
	fn current_actor(&self) -> Option<ActorId> {
		None
	}
}

#[derive(Debug, Clone, Copy)]
pub struct FixedActor(pub ActorId);

impl ActorContext for FixedActor {
	fn current_actor(&self) -> Option<ActorId> {
		Some(self.0)
	}
}

pub struct Recorder {
	store: Arc<dyn ActivityStore>,
	actors: Arc<dyn ActorContext>,
}

impl Recorder {
	pub fn new(store: Arc<dyn ActivityStore>, actors: Arc<dyn ActorContext>) -> Self {
		Self { store, actors }
	}

	pub fn store(&self) -> &Arc<dyn ActivityStore> {
		&self.store
	}

	#[instrument(
		skip(self, draft),
		fields(object_type = %draft.object_type, action = %draft.action)
	)]
	pub fn persist(&self, draft: NewActivity) -> ActivityResult<ActivityId> {
		let object_type = draft.object_type.trim();
		let action = draft.action.trim();
		if object_type.is_empty() {
			return Err(ActivityError::Validation("object_type is required".to_string()));
		}
		if action.is_empty() {
			return Err(ActivityError::Validation("action is required".to_string()));
		}

		let fields = RecordFields {
			object_type: object_type.to_string(),
			object_subtype: draft.object_subtype,
			object_id: draft.object_id,
			object_name: draft.object_name,
			action: action.to_string(),
			actor: draft.actor.or_else(|| self.actors.current_actor()),
			severity: draft
				.severity
				.unwrap_or_else(|| ActivitySeverity::classify(object_type, action)),
			timestamp: draft.timestamp.unwrap_or_else(Utc::now),
			status: ActivityStatus::Pending,
		};

		let id = self.store.create_record(fields)?;

		for (key, value) in draft.meta.iter() {
			if let Err(e) = self.store.attach_metadata(id, key, value) {
				self.purge(id);
				return Err(e.into());
			}
		}

		if let Err(e) = self.store.publish(id) {
			self.purge(id);
			return Err(e.into());
		}

		debug!(%id, meta = draft.meta.len(), "activity recorded");
		Ok(id)
	}

	fn purge(&self, id: ActivityId) {
		if let Err(e) = self.store.delete_record(id) {
			warn!(%id, error = %e, "failed to purge pending activity");
		}
	}

	/// Move a visible record to the trash.
	#[instrument(skip(self))]
	pub fn trash(&self, id: ActivityId) -> ActivityResult<()> {
		self.transition(id, ActivityStatus::Trashed)
	}

	/// Bring a trashed record back to the published listing.
	#[instrument(skip(self))]
	pub fn restore(&self, id: ActivityId) -> ActivityResult<()> {
		self.transition(id, ActivityStatus::Published)
	}

	/// Permanently remove a record and its metadata.
	#[instrument(skip(self))]
	pub fn delete(&self, id: ActivityId) -> ActivityResult<()> {
		if self.store.get_record(id)?.is_none() {
			return Err(ActivityError::Lookup(format!("activity {id} not found")));
		}
		self.store.delete_record(id)?;
		Ok(())
	}

	fn transition(&self, id: ActivityId, status: ActivityStatus) -> ActivityResult<()> {
		if self.store.get_record(id)?.is_none() {
			return Err(ActivityError::Lookup(format!("activity {id} not found")));
		}
		self.store.set_status(id, status)?;
		Ok(())
	}
}
