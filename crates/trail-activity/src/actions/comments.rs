// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde::Deserialize;

use super::{first_name, NON_INTERACTIVE, UNHANDLED};
use crate::error::{ActivityError, ActivityResult};
use crate::handler::{ActionHandler, ActionLabel, HandlerContext, Notification, Translation};
use crate::record::NewActivity;

const LABELS: &[ActionLabel] = &[
	ActionLabel::new("create", "{actor} added a comment by {object} {when}."),
	ActionLabel::new("update", "{actor} edited a comment by {object} {when}."),
	ActionLabel::new("approve", "{actor} approved a comment by {object} {when}."),
	ActionLabel::new("unapprove", "{actor} unapproved a comment by {object} {when}."),
	ActionLabel::new("spam", "{actor} marked a comment by {object} as spam {when}."),
	ActionLabel::new("trash", "{actor} trashed a comment by {object} {when}."),
	ActionLabel::new("restore", "{actor} restored a comment by {object} {when}."),
	ActionLabel::new(
		"delete",
		"{actor} permanently deleted a comment by {object} {when}.",
	),
];

const EVENTS: &[&str] = &[
	"comment.inserted",
	"comment.edited",
	"comment.status_changed",
	"comment.deleted",
];

#[derive(Debug, Deserialize)]
struct CommentPayload {
	comment_id: u64,
	#[serde(default)]
	author: Option<String>,
	#[serde(default)]
	new_status: Option<String>,
	#[serde(default)]
	old_status: Option<String>,
}

/// Comments. The object name is the comment author, the subtype the
/// comment type.
#[derive(Debug, Default, Clone, Copy)]
pub struct CommentHandler;

fn status_action(new_status: &str, old_status: Option<&str>) -> Option<&'static str> {
	match new_status {
		"approved" | "approve" | "1" => Some("approve"),
		"unapproved" | "hold" | "0" => Some("unapprove"),
		"spam" => Some("spam"),
		"trash" => Some("trash"),
		// Leaving the trash or spam folder.
		_ if matches!(old_status, Some("trash" | "spam")) => Some("restore"),
		_ => None,
	}
}

impl ActionHandler for CommentHandler {
	fn object_type(&self) -> &'static str {
		"comment"
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

		let payload: CommentPayload = notification.parse()?;

		let action = match notification.name.as_str() {
			"comment.inserted" => "create",
			"comment.edited" => "update",
			"comment.deleted" => "delete",
			_ => {
				let new_status = payload.new_status.as_deref().unwrap_or_default();
				match status_action(new_status, payload.old_status.as_deref()) {
					Some(action) => action,
					None => return Ok(Translation::Skip("unrecognized comment status")),
				}
			}
		};

		let comment = ctx.directory.comment(payload.comment_id);
		let name = first_name([
			payload.author,
			comment.as_ref().map(|c| c.author.clone()),
		])
		.ok_or_else(|| {
			ActivityError::Lookup(format!("comment {} not found", payload.comment_id))
		})?;

		let mut draft =
			NewActivity::builder(self.object_type(), action).object(payload.comment_id, name);
		if let Some(comment) = comment {
			draft = draft
				.maybe_subtype(Some(comment.comment_type))
				.meta("post_id", comment.post_id);
			if let Some(post) = ctx.directory.post(comment.post_id) {
				draft = draft.meta("post_title", post.title);
			}
		}
		if let Some(old_status) = payload.old_status {
			draft = draft.meta("old_status", old_status);
		}
		Ok(Translation::Record(draft.build()))
	}
}
