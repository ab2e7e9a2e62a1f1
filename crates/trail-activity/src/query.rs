// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Query and sort adapter.
//!
//! Listing screens request abstract sort keys (`severity`, `actor`, `when`)
//! and a direction string. [`translate_sort`] maps them onto the ordering
//! fields a store understands; [`ActivityQuery`] bundles filter, sort and
//! pagination into a [`ListQuery`].

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use trail_activity_config::ActivityConfig;

use crate::record::{ActivityRecord, ActivitySeverity, ActivityStatus, ActorId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
	Severity,
	Actor,
	#[default]
	When,
}

impl SortKey {
	/// Parse a requested key; unknown or missing keys sort by time.
	pub fn parse(requested: Option<&str>) -> Self {
		match requested.map(|k| k.trim().to_ascii_lowercase()).as_deref() {
			Some("severity") => SortKey::Severity,
			Some("actor" | "username") => SortKey::Actor,
			_ => SortKey::When,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
	Asc,
	#[default]
	Desc,
}

impl SortDirection {
	/// Case-insensitive `asc`/`desc`; anything else is descending.
	pub fn normalize(requested: Option<&str>) -> Self {
		match requested {
			Some(dir) if dir.trim().eq_ignore_ascii_case("asc") => SortDirection::Asc,
			_ => SortDirection::Desc,
		}
	}

	pub fn as_sql(&self) -> &'static str {
		match self {
			SortDirection::Asc => "ASC",
			SortDirection::Desc => "DESC",
		}
	}

	fn apply(&self, ordering: Ordering) -> Ordering {
		match self {
			SortDirection::Asc => ordering,
			SortDirection::Desc => ordering.reverse(),
		}
	}
}

/// Store-native ordering field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NativeField {
	SeverityLevel,
	ActorId,
	CreatedAt,
}

impl NativeField {
	pub fn column(&self) -> &'static str {
		match self {
			NativeField::SeverityLevel => "severity_level",
			NativeField::ActorId => "actor_id",
			NativeField::CreatedAt => "created_at",
		}
	}
}

impl fmt::Display for NativeField {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.column())
	}
}

impl From<SortKey> for NativeField {
	fn from(key: SortKey) -> Self {
		match key {
			SortKey::Severity => NativeField::SeverityLevel,
			SortKey::Actor => NativeField::ActorId,
			SortKey::When => NativeField::CreatedAt,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NativeSort {
	pub field: NativeField,
	pub direction: SortDirection,
}

impl Default for NativeSort {
	fn default() -> Self {
		Self {
			field: NativeField::CreatedAt,
			direction: SortDirection::Desc,
		}
	}
}

impl NativeSort {
	/// Compare two records by this ordering, breaking ties by id.
	pub fn compare(&self, a: &ActivityRecord, b: &ActivityRecord) -> Ordering {
		let primary = match self.field {
			NativeField::SeverityLevel => a.severity.level().cmp(&b.severity.level()),
			NativeField::ActorId => a.actor.cmp(&b.actor),
			NativeField::CreatedAt => a.timestamp.cmp(&b.timestamp),
		};
		self.direction.apply(primary.then_with(|| a.id.cmp(&b.id)))
	}
}

/// Map a requested sort key and direction onto store-native ordering.
pub fn translate_sort(requested_key: Option<&str>, direction: Option<&str>) -> NativeSort {
	NativeSort {
		field: SortKey::parse(requested_key).into(),
		direction: SortDirection::normalize(direction),
	}
}

/// Record filter. Only published records are listed unless asked otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityFilter {
	pub object_type: Option<String>,
	pub action: Option<String>,
	pub actor: Option<ActorId>,
	pub object_id: Option<u64>,
	pub min_severity: Option<ActivitySeverity>,
	pub status: ActivityStatus,
}

impl Default for ActivityFilter {
	fn default() -> Self {
		Self {
			object_type: None,
			action: None,
			actor: None,
			object_id: None,
			min_severity: None,
			status: ActivityStatus::Published,
		}
	}
}

impl ActivityFilter {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn object_type(mut self, object_type: impl Into<String>) -> Self {
		self.object_type = Some(object_type.into());
		self
	}

	pub fn action(mut self, action: impl Into<String>) -> Self {
		self.action = Some(action.into());
		self
	}

	pub fn actor(mut self, actor: ActorId) -> Self {
		self.actor = Some(actor);
		self
	}

	pub fn object_id(mut self, object_id: u64) -> Self {
		self.object_id = Some(object_id);
		self
	}

	pub fn min_severity(mut self, severity: ActivitySeverity) -> Self {
		self.min_severity = Some(severity);
		self
	}

	pub fn status(mut self, status: ActivityStatus) -> Self {
		self.status = status;
		self
	}

	pub fn matches(&self, record: &ActivityRecord) -> bool {
		record.status == self.status
			&& self
				.object_type
				.as_deref()
				.map_or(true, |t| record.object_type == t)
			&& self.action.as_deref().map_or(true, |a| record.action == a)
			&& self.actor.map_or(true, |a| record.actor == Some(a))
			&& self.object_id.map_or(true, |id| record.object_id == id)
			&& self.min_severity.map_or(true, |s| record.severity >= s)
	}
}

/// Fully resolved listing request handed to a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListQuery {
	pub filter: ActivityFilter,
	pub sort: NativeSort,
	pub limit: u32,
	pub offset: u32,
}

impl Default for ListQuery {
	fn default() -> Self {
		Self {
			filter: ActivityFilter::default(),
			sort: NativeSort::default(),
			limit: 20,
			offset: 0,
		}
	}
}

/// A listing request as it arrives from an admin screen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityQuery {
	#[serde(default)]
	pub filter: ActivityFilter,
	pub orderby: Option<String>,
	pub order: Option<String>,
	/// 1-based page number.
	pub page: Option<u32>,
	pub per_page: Option<u32>,
}

impl ActivityQuery {
	pub fn new(filter: ActivityFilter) -> Self {
		Self {
			filter,
			..Default::default()
		}
	}

	pub fn sort_by(mut self, orderby: impl Into<String>, order: impl Into<String>) -> Self {
		self.orderby = Some(orderby.into());
		self.order = Some(order.into());
		self
	}

	pub fn page(mut self, page: u32, per_page: u32) -> Self {
		self.page = Some(page);
		self.per_page = Some(per_page);
		self
	}

	/// Resolve sort and clamp pagination against the configured bounds.
	pub fn resolve(&self, config: &ActivityConfig) -> ListQuery {
		let per_page = self
			.per_page
			.unwrap_or(config.default_per_page)
			.clamp(1, config.max_per_page.max(1));
		let page = self.page.unwrap_or(1).max(1);

		ListQuery {
			filter: self.filter.clone(),
			sort: translate_sort(self.orderby.as_deref(), self.order.as_deref()),
			limit: per_page,
			offset: (page - 1).saturating_mul(per_page),
		}
	}
}
