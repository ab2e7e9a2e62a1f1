// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde::Deserialize;

use super::{first_name, UNHANDLED};
use crate::error::{ActivityError, ActivityResult};
use crate::handler::{ActionHandler, ActionLabel, HandlerContext, Notification, Translation};
use crate::record::NewActivity;

const LABELS: &[ActionLabel] = &[
	ActionLabel::new("create", "{actor} uploaded \"{object}\" {when}."),
	ActionLabel::new("update", "{actor} edited \"{object}\" {when}."),
	ActionLabel::new("delete", "{actor} deleted \"{object}\" {when}."),
];

const EVENTS: &[&str] = &["attachment.added", "attachment.edited", "attachment.deleted"];

#[derive(Debug, Deserialize)]
struct AttachmentPayload {
	attachment_id: u64,
	#[serde(default)]
	title: Option<String>,
	#[serde(default)]
	mime_type: Option<String>,
}

/// Uploaded media. The subtype is the file's MIME type.
#[derive(Debug, Default, Clone, Copy)]
pub struct AttachmentHandler;

impl ActionHandler for AttachmentHandler {
	fn object_type(&self) -> &'static str {
		"attachment"
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
		let action = match notification.name.as_str() {
			"attachment.added" => "create",
			"attachment.edited" => "update",
			"attachment.deleted" => "delete",
			_ => return Ok(UNHANDLED),
		};

		let payload: AttachmentPayload = notification.parse()?;
		let post = ctx.directory.post(payload.attachment_id);

		let name = first_name([payload.title, post.as_ref().map(|p| p.title.clone())])
			.ok_or_else(|| {
				ActivityError::Lookup(format!("attachment {} not found", payload.attachment_id))
			})?;
		let mime_type = payload.mime_type.or_else(|| post.and_then(|p| p.mime_type));

		Ok(Translation::Record(
			NewActivity::builder(self.object_type(), action)
				.object(payload.attachment_id, name)
				.maybe_subtype(mime_type)
				.build(),
		))
	}
}
