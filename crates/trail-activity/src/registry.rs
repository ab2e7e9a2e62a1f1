// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Lookup table from `(object_type, action)` to display descriptors.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::render::RenderInput;
use crate::template::{LabelTemplate, Placeholder, Segment};

/// Custom render hook replacing template substitution for one action.
pub type CustomRender = Arc<dyn Fn(&RenderInput<'_>) -> String + Send + Sync>;

#[derive(Clone)]
pub struct ActionDescriptor {
	pub label: LabelTemplate,
	pub render: Option<CustomRender>,
}

impl ActionDescriptor {
	pub fn new(label: LabelTemplate) -> Self {
		Self {
			label,
			render: None,
		}
	}

	pub fn with_renderer(mut self, render: CustomRender) -> Self {
		self.render = Some(render);
		self
	}
}

impl fmt::Debug for ActionDescriptor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ActionDescriptor")
			.field("label", &self.label.to_string())
			.field("render", &self.render.as_ref().map(|_| "<custom>"))
			.finish()
	}
}

/// Result of a registry lookup.
#[derive(Debug, Clone)]
pub enum Resolved {
	Registered(ActionDescriptor),
	Fallback(ActionDescriptor),
}

impl Resolved {
	pub fn descriptor(&self) -> &ActionDescriptor {
		match self {
			Resolved::Registered(d) | Resolved::Fallback(d) => d,
		}
	}

	pub fn is_fallback(&self) -> bool {
		matches!(self, Resolved::Fallback(_))
	}
}

/// `{actor} performed {action} on {object_type} #{object_id}.`
pub fn fallback_template() -> LabelTemplate {
	LabelTemplate::from_segments(vec![
		Segment::Placeholder(Placeholder::Actor),
		Segment::Literal(" performed ".to_string()),
		Segment::Placeholder(Placeholder::Action),
		Segment::Literal(" on ".to_string()),
		Segment::Placeholder(Placeholder::ObjectType),
		Segment::Literal(" #".to_string()),
		Segment::Placeholder(Placeholder::ObjectId),
		Segment::Literal(".".to_string()),
	])
}

#[derive(Debug, Default)]
pub struct ActionRegistry {
	entries: RwLock<HashMap<(String, String), ActionDescriptor>>,
}

impl ActionRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Register a descriptor, returning the one it replaced.
	pub fn register(
		&self,
		object_type: impl Into<String>,
		action: impl Into<String>,
		descriptor: ActionDescriptor,
	) -> Option<ActionDescriptor> {
		let key = (object_type.into(), action.into());
		debug!(object_type = %key.0, action = %key.1, "registering action descriptor");
		self.entries.write().insert(key, descriptor)
	}

	pub fn resolve(&self, object_type: &str, action: &str) -> Resolved {
		let entries = self.entries.read();
		match entries.get(&(object_type.to_string(), action.to_string())) {
			Some(descriptor) => Resolved::Registered(descriptor.clone()),
			None => Resolved::Fallback(ActionDescriptor::new(fallback_template())),
		}
	}

	pub fn contains(&self, object_type: &str, action: &str) -> bool {
		self
			.entries
			.read()
			.contains_key(&(object_type.to_string(), action.to_string()))
	}

	/// Registered actions for one object type, sorted.
	pub fn actions_for(&self, object_type: &str) -> Vec<String> {
		let mut actions: Vec<String> = self
			.entries
			.read()
			.keys()
			.filter(|(ty, _)| ty == object_type)
			.map(|(_, action)| action.clone())
			.collect();
		actions.sort();
		actions
	}

	/// Registered object types, sorted and deduplicated.
	pub fn object_types(&self) -> Vec<String> {
		let mut types: Vec<String> = self
			.entries
			.read()
			.keys()
			.map(|(ty, _)| ty.clone())
			.collect();
		types.sort();
		types.dedup();
		types
	}

	pub fn len(&self) -> usize {
		self.entries.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.read().is_empty()
	}
}
