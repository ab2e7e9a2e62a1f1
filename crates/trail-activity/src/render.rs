// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Turning stored records into display text.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use trail_activity_config::ActivityConfig;

use crate::meta::ActivityMeta;
use crate::record::{ActivityId, ActivityRecord, ActivitySeverity, ActorId};
use crate::registry::ActionRegistry;
use crate::template::Placeholder;

/// Display details of a user who performed an action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorProfile {
	pub id: ActorId,
	pub display_name: String,
	pub profile_url: Option<String>,
}

pub trait ActorResolver: Send + Sync {
	fn resolve_actor(&self, id: ActorId) -> Option<ActorProfile>;
}

/// Values available to a custom render hook.
#[derive(Debug)]
pub struct RenderInput<'a> {
	pub record: &'a ActivityRecord,
	pub meta: &'a ActivityMeta,
	/// Actor link markup, or the fallback label.
	pub actor: String,
	/// HTML-escaped object name.
	pub object: String,
	/// Relative time phrase.
	pub when: String,
}

/// One line of an activity listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRow {
	pub id: ActivityId,
	pub description: String,
	pub severity: String,
	pub object_type: String,
	pub action: String,
	pub timestamp: DateTime<Utc>,
}

pub struct Renderer {
	registry: Arc<ActionRegistry>,
	actors: Arc<dyn ActorResolver>,
	fallback_actor_label: String,
}

impl Renderer {
	pub fn new(registry: Arc<ActionRegistry>, actors: Arc<dyn ActorResolver>) -> Self {
		Self {
			registry,
			actors,
			fallback_actor_label: ActivityConfig::default().fallback_actor_label,
		}
	}

	pub fn from_config(
		registry: Arc<ActionRegistry>,
		actors: Arc<dyn ActorResolver>,
		config: &ActivityConfig,
	) -> Self {
		Self {
			registry,
			actors,
			fallback_actor_label: config.fallback_actor_label.clone(),
		}
	}

	pub fn render(&self, record: &ActivityRecord, meta: &ActivityMeta) -> String {
		self.render_at(record, meta, Utc::now())
	}

	/// Render relative to a fixed `now`.
	pub fn render_at(
		&self,
		record: &ActivityRecord,
		meta: &ActivityMeta,
		now: DateTime<Utc>,
	) -> String {
		let resolved = self.registry.resolve(&record.object_type, &record.action);
		let descriptor = resolved.descriptor();

		let input = RenderInput {
			record,
			meta,
			actor: self.actor_link(record.actor),
			object: escape_html(&record.object_name),
			when: relative_time(record.timestamp, now),
		};

		if let Some(render) = &descriptor.render {
			return render(&input);
		}

		descriptor.label.render_with(|placeholder| match placeholder {
			Placeholder::Actor => input.actor.clone(),
			Placeholder::Object => input.object.clone(),
			Placeholder::When => input.when.clone(),
			Placeholder::ObjectType => escape_html(&record.object_type),
			Placeholder::Action => escape_html(&record.action),
			Placeholder::ObjectId => record.object_id.to_string(),
			Placeholder::Subtype => escape_html(record.object_subtype.as_deref().unwrap_or("")),
			Placeholder::Meta(key) => escape_html(&meta.get_str(key)),
		})
	}

	/// Linked display name of the actor, or the fallback label.
	pub fn actor_link(&self, actor: Option<ActorId>) -> String {
		let Some(profile) = actor.and_then(|id| self.actors.resolve_actor(id)) else {
			return escape_html(&self.fallback_actor_label);
		};

		let name = escape_html(&profile.display_name);
		match profile.profile_url {
			Some(url) => format!("<a href=\"{}\">{name}</a>", escape_html(&url)),
			None => name,
		}
	}

	/// Capitalized severity label for listing columns.
	pub fn render_severity(&self, record: &ActivityRecord) -> String {
		severity_label(record.severity).to_string()
	}

	pub fn render_row(
		&self,
		record: &ActivityRecord,
		meta: &ActivityMeta,
		now: DateTime<Utc>,
	) -> ActivityRow {
		ActivityRow {
			id: record.id,
			description: self.render_at(record, meta, now),
			severity: self.render_severity(record),
			object_type: record.object_type.clone(),
			action: record.action.clone(),
			timestamp: record.timestamp,
		}
	}
}

fn severity_label(severity: ActivitySeverity) -> &'static str {
	match severity {
		ActivitySeverity::Info => "Info",
		ActivitySeverity::Notice => "Notice",
		ActivitySeverity::Warning => "Warning",
		ActivitySeverity::Critical => "Critical",
	}
}

pub fn escape_html(input: &str) -> String {
	let mut out = String::with_capacity(input.len());
	for c in input.chars() {
		match c {
			'&' => out.push_str("&amp;"),
			'<' => out.push_str("&lt;"),
			'>' => out.push_str("&gt;"),
			'"' => out.push_str("&quot;"),
			'\'' => out.push_str("&#039;"),
			other => out.push(other),
		}
	}
	out
}

/// Human phrase for the time between `then` and `now`.
///
/// Anything under a minute, including timestamps in the future, is
/// "just now".
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
	let seconds = (now - then).num_seconds();
	if seconds < 60 {
		return "just now".to_string();
	}

	let minutes = seconds / 60;
	let hours = minutes / 60;
	let days = hours / 24;

	let (count, unit) = if minutes < 60 {
		(minutes, "minute")
	} else if hours < 24 {
		(hours, "hour")
	} else if days < 7 {
		(days, "day")
	} else if days < 30 {
		(days / 7, "week")
	} else if days < 365 {
		((days / 30).max(1), "month")
	} else {
		(days / 365, "year")
	};

	if count == 1 {
		format!("1 {unit} ago")
	} else {
		format!("{count} {unit}s ago")
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::record::{ActivityStatus, NewActivity};
	use crate::registry::ActionDescriptor;
	use crate::template::LabelTemplate;
	use chrono::{Duration, TimeZone};
	use std::collections::HashMap;

	struct StaticActors(HashMap<ActorId, ActorProfile>);

	impl ActorResolver for StaticActors {
		fn resolve_actor(&self, id: ActorId) -> Option<ActorProfile> {
			self.0.get(&id).cloned()
		}
	}

	fn now() -> DateTime<Utc> {
		Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
	}

	fn record(object_type: &str, action: &str, name: &str, actor: Option<u64>) -> ActivityRecord {
		ActivityRecord {
			id: ActivityId::new(1),
			object_type: object_type.to_string(),
			object_subtype: Some("image/png".to_string()),
			object_id: 42,
			object_name: name.to_string(),
			action: action.to_string(),
			actor: actor.map(ActorId::new),
			severity: ActivitySeverity::classify(object_type, action),
			timestamp: now() - Duration::hours(2),
			status: ActivityStatus::Published,
		}
	}

	fn renderer() -> Renderer {
		let registry = Arc::new(ActionRegistry::new());
		registry.register(
			"attachment",
			"create",
			ActionDescriptor::new(
				LabelTemplate::parse("{actor} uploaded \"{object}\" {when}.").unwrap(),
			),
		);
		let actors = StaticActors(HashMap::from([(
			ActorId::new(7),
			ActorProfile {
				id: ActorId::new(7),
				display_name: "Alice".to_string(),
				profile_url: Some("/users/7".to_string()),
			},
		)]));
		Renderer::new(registry, Arc::new(actors))
	}

	mod render {
		use super::*;

		#[test]
		fn substitutes_registered_template() {
			let out = renderer().render_at(
				&record("attachment", "create", "cat.png", Some(7)),
				&ActivityMeta::new(),
				now(),
			);
			assert_eq!(
				out,
				"<a href=\"/users/7\">Alice</a> uploaded \"cat.png\" 2 hours ago."
			);
		}

		#[test]
		fn unknown_actor_uses_fallback_label() {
			let out = renderer().render_at(
				&record("attachment", "create", "cat.png", Some(99)),
				&ActivityMeta::new(),
				now(),
			);
			assert!(out.starts_with("A user uploaded"));

			let out = renderer().render_at(
				&record("attachment", "create", "cat.png", None),
				&ActivityMeta::new(),
				now(),
			);
			assert!(out.starts_with("A user uploaded"));
		}

		#[test]
		fn configured_fallback_label() {
			let config = ActivityConfig {
				fallback_actor_label: "Someone".to_string(),
				..Default::default()
			};
			let base = renderer();
			let renderer =
				Renderer::from_config(base.registry.clone(), base.actors.clone(), &config);
			let out = renderer.render_at(
				&record("attachment", "create", "cat.png", None),
				&ActivityMeta::new(),
				now(),
			);
			assert!(out.starts_with("Someone uploaded"));
		}

		#[test]
		fn escapes_object_name() {
			let out = renderer().render_at(
				&record("attachment", "create", "<script>\"x\"</script>", None),
				&ActivityMeta::new(),
				now(),
			);
			assert!(out.contains("&lt;script&gt;&quot;x&quot;&lt;/script&gt;"));
			assert!(!out.contains("<script>"));
		}

		#[test]
		fn unregistered_action_uses_fallback_template() {
			let out = renderer().render_at(
				&record("post", "frobnicate", "Hello", Some(7)),
				&ActivityMeta::new(),
				now(),
			);
			assert_eq!(
				out,
				"<a href=\"/users/7\">Alice</a> performed frobnicate on post #42."
			);
		}

		#[test]
		fn missing_meta_renders_empty() {
			let registry = Arc::new(ActionRegistry::new());
			registry.register(
				"site_setting",
				"update",
				ActionDescriptor::new(
					LabelTemplate::parse("{object}: [{meta:old_value}] -> [{meta:new_value}]")
						.unwrap(),
				),
			);
			let renderer = Renderer::new(registry, Arc::new(StaticActors(HashMap::new())));
			let mut meta = ActivityMeta::new();
			meta.insert("new_value", "New");

			let out = renderer.render_at(
				&record("site_setting", "update", "blogname", None),
				&meta,
				now(),
			);
			assert_eq!(out, "blogname: [] -> [New]");
		}

		#[test]
		fn custom_renderer_wins() {
			let registry = Arc::new(ActionRegistry::new());
			registry.register(
				"export",
				"download",
				ActionDescriptor::new(LabelTemplate::parse("{actor}").unwrap()).with_renderer(
					Arc::new(|input: &RenderInput<'_>| {
						format!("{} exported {} rows", input.actor, input.meta.get_str("rows"))
					}),
				),
			);
			let renderer = Renderer::new(registry, Arc::new(StaticActors(HashMap::new())));
			let mut meta = ActivityMeta::new();
			meta.insert("rows", 12);

			let out = renderer.render_at(&record("export", "download", "", None), &meta, now());
			assert_eq!(out, "A user exported 12 rows");
		}

		#[test]
		fn snapshot_survives_entity_changes() {
			let draft = NewActivity::builder("attachment", "create")
				.object(42, "cat.png")
				.build();
			let mut stored = record("attachment", "create", &draft.object_name, None);
			stored.object_subtype = None;

			let out = renderer().render_at(&stored, &ActivityMeta::new(), now());
			assert!(out.contains("\"cat.png\""));
		}

		#[test]
		fn severity_and_rows() {
			let renderer = renderer();
			let rec = record("user", "delete", "bob", None);
			assert_eq!(renderer.render_severity(&rec), "Critical");

			let row = renderer.render_row(&rec, &ActivityMeta::new(), now());
			assert_eq!(row.severity, "Critical");
			assert_eq!(row.description, "A user performed delete on user #42.");
		}
	}

	mod relative {
		use super::*;

		#[test]
		fn phrases() {
			let cases = [
				(Duration::seconds(0), "just now"),
				(Duration::seconds(59), "just now"),
				(Duration::seconds(60), "1 minute ago"),
				(Duration::minutes(5), "5 minutes ago"),
				(Duration::hours(1), "1 hour ago"),
				(Duration::hours(2), "2 hours ago"),
				(Duration::days(1), "1 day ago"),
				(Duration::days(8), "1 week ago"),
				(Duration::days(45), "1 month ago"),
				(Duration::days(400), "1 year ago"),
				(Duration::days(800), "2 years ago"),
			];
			for (ago, expected) in cases {
				assert_eq!(relative_time(now() - ago, now()), expected, "{ago:?}");
			}
		}

		#[test]
		fn future_is_just_now() {
			assert_eq!(
				relative_time(now() + Duration::hours(3), now()),
				"just now"
			);
		}
	}

	#[test]
	fn escape_html_handles_specials() {
		assert_eq!(escape_html("a & b <c> 'd'"), "a &amp; b &lt;c&gt; &#039;d&#039;");
	}
}
