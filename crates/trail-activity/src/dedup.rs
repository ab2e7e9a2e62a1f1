// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Request-scoped duplicate suppression.
//!
//! Hosts often fire several notifications for one logical change (a save
//! followed by a meta update, say). A [`RequestScope`] lives for one incoming
//! request and remembers which `(object_type, object_id, action)` triples
//! were already recorded.

use std::collections::HashSet;
use std::fmt;

use uuid::Uuid;

use crate::record::ActivityId;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey {
	pub object_type: String,
	pub object_id: u64,
	/// Stands in for the id of objects the host does not number.
	pub object_name: Option<String>,
	pub action: String,
	/// Separates distinct events that share the other components, such as
	/// two widgets with the same instance number.
	pub discriminator: Option<String>,
}

impl DedupKey {
	pub fn new(object_type: &str, object_id: u64, action: &str) -> Self {
		Self {
			object_type: object_type.to_string(),
			object_id,
			object_name: None,
			action: action.to_string(),
			discriminator: None,
		}
	}

	/// Key for an object identified only by name (settings, plugins, themes).
	pub fn unnumbered(object_type: &str, object_name: &str, action: &str) -> Self {
		Self {
			object_type: object_type.to_string(),
			object_id: 0,
			object_name: Some(object_name.to_string()),
			action: action.to_string(),
			discriminator: None,
		}
	}

	pub fn with_discriminator(mut self, discriminator: impl Into<String>) -> Self {
		self.discriminator = Some(discriminator.into());
		self
	}
}

impl fmt::Display for DedupKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &self.object_name {
			Some(name) => write!(f, "{}[{}]:{}", self.object_type, name, self.action)?,
			None => write!(f, "{}#{}:{}", self.object_type, self.object_id, self.action)?,
		}
		match &self.discriminator {
			Some(discriminator) => write!(f, "/{discriminator}"),
			None => Ok(()),
		}
	}
}

#[derive(Debug, Default)]
pub struct DedupGuard {
	seen: HashSet<DedupKey>,
}

impl DedupGuard {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn is_duplicate(&self, key: &DedupKey) -> bool {
		self.seen.contains(key)
	}

	/// Remember a key. Returns `false` if it was already present.
	pub fn mark(&mut self, key: DedupKey) -> bool {
		self.seen.insert(key)
	}

	pub fn len(&self) -> usize {
		self.seen.len()
	}

	pub fn is_empty(&self) -> bool {
		self.seen.is_empty()
	}
}

/// State for one incoming request or notification batch.
#[derive(Debug)]
pub struct RequestScope {
	id: Uuid,
	guard: DedupGuard,
	recorded: Vec<ActivityId>,
}

impl RequestScope {
	pub fn new() -> Self {
		Self {
			id: Uuid::new_v4(),
			guard: DedupGuard::new(),
			recorded: Vec::new(),
		}
	}

	pub fn id(&self) -> Uuid {
		self.id
	}

	pub fn guard(&self) -> &DedupGuard {
		&self.guard
	}

	/// Ids persisted during this scope, in persist order.
	pub fn recorded(&self) -> &[ActivityId] {
		&self.recorded
	}

	pub(crate) fn note_recorded(&mut self, key: DedupKey, id: ActivityId) {
		self.guard.mark(key);
		self.recorded.push(id);
	}
}

impl Default for RequestScope {
	fn default() -> Self {
		Self::new()
	}
}
