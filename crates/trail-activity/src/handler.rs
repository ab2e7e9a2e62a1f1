// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The action handler capability.
//!
//! Each domain (attachments, posts, users, ...) implements [`ActionHandler`]:
//! it names the host notifications it consumes, translates their payloads
//! into [`NewActivity`] drafts and declares the label templates used to
//! render its actions.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;
use trail_activity_config::ActivityConfig;

use crate::directory::HostDirectory;
use crate::error::ActivityResult;
use crate::record::{ActorId, NewActivity};
use crate::registry::{ActionDescriptor, CustomRender};
use crate::template::LabelTemplate;

/// A host mutation event as delivered to the logger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
	pub name: String,
	#[serde(default)]
	pub payload: Value,
	/// `false` for imports, bulk edits, autosaves and other background work.
	#[serde(default = "default_interactive")]
	pub interactive: bool,
	/// Actor reported by the host, overriding the current context.
	#[serde(default)]
	pub actor: Option<ActorId>,
}

fn default_interactive() -> bool {
	true
}

impl Notification {
	pub fn new(name: impl Into<String>, payload: Value) -> Self {
		Self {
			name: name.into(),
			payload,
			interactive: true,
			actor: None,
		}
	}

	pub fn non_interactive(mut self) -> Self {
		self.interactive = false;
		self
	}

	pub fn with_actor(mut self, actor: ActorId) -> Self {
		self.actor = Some(actor);
		self
	}

	/// Deserialize the payload into a domain-specific struct.
	pub fn parse<T: DeserializeOwned>(&self) -> ActivityResult<T> {
		Ok(T::deserialize(&self.payload)?)
	}
}

/// Outcome of translating one notification.
#[derive(Debug, Clone, PartialEq)]
pub enum Translation {
	Record(NewActivity),
	Skip(&'static str),
}

/// What a handler may consult while translating.
#[derive(Clone)]
pub struct HandlerContext {
	pub config: Arc<ActivityConfig>,
	pub directory: Arc<dyn HostDirectory>,
}

impl HandlerContext {
	pub fn new(config: Arc<ActivityConfig>, directory: Arc<dyn HostDirectory>) -> Self {
		Self { config, directory }
	}

	/// Whether a background notification should be dropped.
	pub fn suppresses(&self, notification: &Notification) -> bool {
		!notification.interactive && !self.config.log_non_interactive
	}
}

/// Label template source text for one action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionLabel {
	pub action: &'static str,
	pub template: &'static str,
}

impl ActionLabel {
	pub const fn new(action: &'static str, template: &'static str) -> Self {
		Self { action, template }
	}
}

pub trait ActionHandler: Send + Sync {
	fn object_type(&self) -> &'static str;

	fn labels(&self) -> &'static [ActionLabel];

	/// Host notification names this handler consumes.
	fn subscriptions(&self) -> &'static [&'static str];

	fn translate(
		&self,
		notification: &Notification,
		ctx: &HandlerContext,
	) -> ActivityResult<Translation>;

	fn custom_renderer(&self, _action: &str) -> Option<CustomRender> {
		None
	}

	/// Parsed descriptors for every label. Unparseable templates are skipped.
	fn descriptors(&self) -> Vec<(&'static str, ActionDescriptor)> {
		self
			.labels()
			.iter()
			.filter_map(|label| match LabelTemplate::parse(label.template) {
				Ok(template) => {
					let mut descriptor = ActionDescriptor::new(template);
					descriptor.render = self.custom_renderer(label.action);
					Some((label.action, descriptor))
				}
				Err(e) => {
					warn!(
						object_type = self.object_type(),
						action = label.action,
						error = %e,
						"skipping invalid label template"
					);
					None
				}
			})
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::directory::EmptyDirectory;
	use crate::error::ActivityError;
	use serde_json::json;

	struct Dummy;

	const DUMMY_LABELS: &[ActionLabel] = &[
		ActionLabel::new("ping", "{actor} pinged {object}."),
		ActionLabel::new("broken", "{actor} {nope}"),
	];

	impl ActionHandler for Dummy {
		fn object_type(&self) -> &'static str {
			"dummy"
		}

		fn labels(&self) -> &'static [ActionLabel] {
			DUMMY_LABELS
		}

		fn subscriptions(&self) -> &'static [&'static str] {
			&["dummy.pinged"]
		}

		fn translate(
			&self,
			_notification: &Notification,
			_ctx: &HandlerContext,
		) -> ActivityResult<Translation> {
			Ok(Translation::Skip("dummy"))
		}
	}

	fn ctx(log_non_interactive: bool) -> HandlerContext {
		HandlerContext::new(
			Arc::new(ActivityConfig {
				log_non_interactive,
				..Default::default()
			}),
			Arc::new(EmptyDirectory),
		)
	}

	#[test]
	fn descriptors_skip_invalid_templates() {
		let descriptors = Dummy.descriptors();
		assert_eq!(descriptors.len(), 1);
		assert_eq!(descriptors[0].0, "ping");
	}

	#[test]
	fn suppresses_background_work_unless_configured() {
		let background = Notification::new("post.saved", json!({})).non_interactive();
		assert!(ctx(false).suppresses(&background));
		assert!(!ctx(true).suppresses(&background));
		assert!(!ctx(false).suppresses(&Notification::new("post.saved", json!({}))));
	}

	#[test]
	fn parse_reports_malformed_payload() {
		#[derive(Debug, Deserialize)]
		struct Payload {
			#[allow(dead_code)]
			post_id: u64,
		}

		let ok = Notification::new("x", json!({"post_id": 3}));
		assert!(ok.parse::<Payload>().is_ok());

		let bad = Notification::new("x", json!({"post_id": "three"}));
		assert!(matches!(bad.parse::<Payload>(), Err(ActivityError::Payload(_))));
	}

	#[test]
	fn notification_defaults_when_deserialized() {
		let n: Notification = serde_json::from_value(json!({"name": "user.login"})).unwrap();
		assert!(n.interactive);
		assert!(n.actor.is_none());
		assert_eq!(n.payload, Value::Null);
	}
}
