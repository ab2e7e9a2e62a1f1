// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde::Deserialize;

use super::{first_name, NON_INTERACTIVE, UNHANDLED};
use crate::error::{ActivityError, ActivityResult};
use crate::handler::{ActionHandler, ActionLabel, HandlerContext, Notification, Translation};
use crate::record::NewActivity;

const LABELS: &[ActionLabel] = &[
	ActionLabel::new("create", "{actor} created the {subtype} \"{object}\" {when}."),
	ActionLabel::new("update", "{actor} edited the {subtype} \"{object}\" {when}."),
	ActionLabel::new("trash", "{actor} trashed the {subtype} \"{object}\" {when}."),
	ActionLabel::new("restore", "{actor} restored the {subtype} \"{object}\" {when}."),
	ActionLabel::new(
		"delete",
		"{actor} permanently deleted the {subtype} \"{object}\" {when}.",
	),
];

const EVENTS: &[&str] = &["post.saved", "post.trashed", "post.untrashed", "post.deleted"];

/// Post types recorded elsewhere or not at all.
const IGNORED_POST_TYPES: &[&str] = &["revision", "attachment", "nav_menu_item"];

#[derive(Debug, Deserialize)]
struct PostPayload {
	post_id: u64,
	/// `true` when an existing post was saved again.
	#[serde(default)]
	update: bool,
	#[serde(default)]
	title: Option<String>,
	#[serde(default)]
	post_type: Option<String>,
	#[serde(default)]
	status: Option<String>,
}

/// Posts, pages and custom post types. The subtype is the post type.
#[derive(Debug, Default, Clone, Copy)]
pub struct PostHandler;

impl ActionHandler for PostHandler {
	fn object_type(&self) -> &'static str {
		"post"
	}

	fn labels(&self) -> &'static [ActionLabel] {
		LABELS
	}

	fn subscriptions(&self) -> &'static [&'static str] {
		EVENTS
	}

	fn translate(
		&self,
		notification: &Notification,
		ctx: &HandlerContext,
	) -> ActivityResult<Translation> {
		if !EVENTS.contains(&notification.name.as_str()) {
			return Ok(UNHANDLED);
		}
		if ctx.suppresses(notification) {
			return Ok(NON_INTERACTIVE);
		}

		let payload: PostPayload = notification.parse()?;
		let post = ctx.directory.post(payload.post_id);

		let post_type = first_name([
			payload.post_type,
			post.as_ref().map(|p| p.post_type.clone()),
		])
		.unwrap_or_else(|| "post".to_string());
		if IGNORED_POST_TYPES.contains(&post_type.as_str()) {
			return Ok(Translation::Skip("ignored post type"));
		}

		let status = first_name([payload.status, post.as_ref().map(|p| p.status.clone())]);
		if status.as_deref() == Some("auto-draft") {
			return Ok(Translation::Skip("auto-draft"));
		}

		let action = match notification.name.as_str() {
			"post.saved" if payload.update => "update",
			"post.saved" => "create",
			"post.trashed" => "trash",
			"post.untrashed" => "restore",
			_ => "delete",
		};

		let name = first_name([payload.title, post.map(|p| p.title)]).ok_or_else(|| {
			ActivityError::Lookup(format!("post {} not found", payload.post_id))
		})?;

		let mut draft = NewActivity::builder(self.object_type(), action)
			.object(payload.post_id, name)
			.subtype(post_type);
		if let Some(status) = status {
			draft = draft.meta("post_status", status);
		}
		Ok(Translation::Record(draft.build()))
	}
}
