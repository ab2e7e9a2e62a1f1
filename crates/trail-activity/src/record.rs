// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core record types for activity logging.
//!
//! - [`ActivityRecord`]: a persisted, immutable activity entry
//! - [`ActivitySeverity`]: coarse classification used for flagging and sorting
//! - [`ActivityStatus`]: lifecycle of the record itself
//! - [`NewActivity`] / [`NewActivityBuilder`]: drafts handed to the recorder

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::dedup::DedupKey;
use crate::meta::ActivityMeta;

macro_rules! numeric_id {
	($(#[$doc:meta])* $name:ident) => {
		$(#[$doc])*
		#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(transparent)]
		pub struct $name(u64);

		impl $name {
			pub fn new(id: u64) -> Self {
				Self(id)
			}

			pub fn get(&self) -> u64 {
				self.0
			}
		}

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				write!(f, "{}", self.0)
			}
		}

		impl From<u64> for $name {
			fn from(id: u64) -> Self {
				Self(id)
			}
		}
	};
}

numeric_id!(
	/// Store-assigned identifier of an activity record.
	ActivityId
);

numeric_id!(
	/// Host identifier of the user who performed an action.
	ActorId
);

/// Severity of an activity, from routine to critical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActivitySeverity {
	#[default]
	Info,
	Notice,
	Warning,
	Critical,
}

impl ActivitySeverity {
	/// Classify an activity by its object type and action tag.
	///
	/// - `Critical`: removal of users, plugins or themes
	/// - `Warning`: other deletions, trashing, spam and failed logins
	/// - `Notice`: site-wide changes (settings, plugins, themes, core, exports)
	/// - `Info`: everything else
	pub fn classify(object_type: &str, action: &str) -> Self {
		match (object_type, action) {
			("user" | "plugin" | "theme", "delete") => ActivitySeverity::Critical,
			(_, "delete" | "trash" | "spam" | "login_failed") => ActivitySeverity::Warning,
			("site_setting" | "plugin" | "theme" | "core" | "export", _) => {
				ActivitySeverity::Notice
			}
			_ => ActivitySeverity::Info,
		}
	}

	/// Ascending rank, `Info` = 0 through `Critical` = 3.
	pub fn level(&self) -> u8 {
		match self {
			ActivitySeverity::Info => 0,
			ActivitySeverity::Notice => 1,
			ActivitySeverity::Warning => 2,
			ActivitySeverity::Critical => 3,
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			ActivitySeverity::Info => "info",
			ActivitySeverity::Notice => "notice",
			ActivitySeverity::Warning => "warning",
			ActivitySeverity::Critical => "critical",
		}
	}

	/// Returns all severity levels from most to least severe.
	pub fn all() -> &'static [ActivitySeverity] {
		&[
			ActivitySeverity::Critical,
			ActivitySeverity::Warning,
			ActivitySeverity::Notice,
			ActivitySeverity::Info,
		]
	}
}

impl PartialOrd for ActivitySeverity {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for ActivitySeverity {
	fn cmp(&self, other: &Self) -> Ordering {
		self.level().cmp(&other.level())
	}
}

impl fmt::Display for ActivitySeverity {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for ActivitySeverity {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"info" => Ok(ActivitySeverity::Info),
			"notice" => Ok(ActivitySeverity::Notice),
			"warning" => Ok(ActivitySeverity::Warning),
			"critical" => Ok(ActivitySeverity::Critical),
			other => Err(format!("unknown severity '{other}'")),
		}
	}
}

/// Lifecycle of the record itself, independent of the observed entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActivityStatus {
	/// Written but not yet visible; metadata is still being attached.
	Pending,
	#[default]
	Published,
	Trashed,
}

impl ActivityStatus {
	pub fn as_str(&self) -> &'static str {
		match self {
			ActivityStatus::Pending => "pending",
			ActivityStatus::Published => "published",
			ActivityStatus::Trashed => "trashed",
		}
	}

	/// Whether readers may observe a record in this status.
	pub fn is_visible(&self) -> bool {
		!matches!(self, ActivityStatus::Pending)
	}
}

impl fmt::Display for ActivityStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for ActivityStatus {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"pending" => Ok(ActivityStatus::Pending),
			"published" => Ok(ActivityStatus::Published),
			"trashed" => Ok(ActivityStatus::Trashed),
			other => Err(format!("unknown status '{other}'")),
		}
	}
}

/// One persisted activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
	pub id: ActivityId,
	/// Domain of the affected entity (e.g. "attachment", "post", "user").
	pub object_type: String,
	/// Finer classification such as a MIME type or post type.
	pub object_subtype: Option<String>,
	/// Host identifier of the entity, 0 for site-wide objects.
	pub object_id: u64,
	/// Label of the entity at the time of the event.
	pub object_name: String,
	pub action: String,
	pub actor: Option<ActorId>,
	pub severity: ActivitySeverity,
	pub timestamp: DateTime<Utc>,
	pub status: ActivityStatus,
}

/// Fully resolved fields handed to a store when creating a record.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordFields {
	pub object_type: String,
	pub object_subtype: Option<String>,
	pub object_id: u64,
	pub object_name: String,
	pub action: String,
	pub actor: Option<ActorId>,
	pub severity: ActivitySeverity,
	pub timestamp: DateTime<Utc>,
	pub status: ActivityStatus,
}

impl RecordFields {
	pub fn into_record(self, id: ActivityId) -> ActivityRecord {
		ActivityRecord {
			id,
			object_type: self.object_type,
			object_subtype: self.object_subtype,
			object_id: self.object_id,
			object_name: self.object_name,
			action: self.action,
			actor: self.actor,
			severity: self.severity,
			timestamp: self.timestamp,
			status: self.status,
		}
	}
}

/// A draft activity produced by a handler and not yet persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewActivity {
	pub object_type: String,
	pub object_subtype: Option<String>,
	pub object_id: u64,
	pub object_name: String,
	pub action: String,
	/// Defaults to the current authenticated actor when `None`.
	pub actor: Option<ActorId>,
	/// Defaults to [`ActivitySeverity::classify`] when `None`.
	pub severity: Option<ActivitySeverity>,
	/// Defaults to the persist time when `None`.
	pub timestamp: Option<DateTime<Utc>>,
	pub meta: ActivityMeta,
	/// Extra dedup component for events the object alone cannot tell apart.
	pub dedup_discriminator: Option<String>,
}

impl NewActivity {
	pub fn builder(
		object_type: impl Into<String>,
		action: impl Into<String>,
	) -> NewActivityBuilder {
		NewActivityBuilder::new(object_type, action)
	}

	/// Key identifying the logical event for request-scoped deduplication.
	///
	/// Objects without a host id are told apart by name.
	pub fn dedup_key(&self) -> DedupKey {
		let key = if self.object_id == 0 && !self.object_name.is_empty() {
			DedupKey::unnumbered(&self.object_type, &self.object_name, &self.action)
		} else {
			DedupKey::new(&self.object_type, self.object_id, &self.action)
		};
		match &self.dedup_discriminator {
			Some(discriminator) => key.with_discriminator(discriminator.as_str()),
			None => key,
		}
	}
}

/// Builder for constructing activity drafts with a fluent API.
#[derive(Debug, Clone)]
pub struct NewActivityBuilder {
	draft: NewActivity,
}

impl NewActivityBuilder {
	pub fn new(object_type: impl Into<String>, action: impl Into<String>) -> Self {
		Self {
			draft: NewActivity {
				object_type: object_type.into(),
				object_subtype: None,
				object_id: 0,
				object_name: String::new(),
				action: action.into(),
				actor: None,
				severity: None,
				timestamp: None,
				meta: ActivityMeta::new(),
				dedup_discriminator: None,
			},
		}
	}

	/// Set the affected entity's host ID and its current display name.
	pub fn object(mut self, object_id: u64, object_name: impl Into<String>) -> Self {
		self.draft.object_id = object_id;
		self.draft.object_name = object_name.into();
		self
	}

	pub fn subtype(mut self, subtype: impl Into<String>) -> Self {
		self.draft.object_subtype = Some(subtype.into());
		self
	}

	/// Set the subtype only when one is known.
	pub fn maybe_subtype(mut self, subtype: Option<String>) -> Self {
		self.draft.object_subtype = subtype.filter(|s| !s.is_empty());
		self
	}

	pub fn actor(mut self, actor: ActorId) -> Self {
		self.draft.actor = Some(actor);
		self
	}

	pub fn maybe_actor(mut self, actor: Option<ActorId>) -> Self {
		self.draft.actor = actor;
		self
	}

	pub fn severity(mut self, severity: ActivitySeverity) -> Self {
		self.draft.severity = Some(severity);
		self
	}

	pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
		self.draft.timestamp = Some(timestamp);
		self
	}

	pub fn meta(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.draft.meta.insert(key, value);
		self
	}

	/// Keep this event apart from others on the same object and action
	/// within one request.
	pub fn distinct_by(mut self, discriminator: impl Into<String>) -> Self {
		self.draft.dedup_discriminator = Some(discriminator.into());
		self
	}

	pub fn build(self) -> NewActivity {
		self.draft
	}
}
