// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde::Deserialize;

use super::UNHANDLED;
use crate::error::{ActivityError, ActivityResult};
use crate::handler::{ActionHandler, ActionLabel, HandlerContext, Notification, Translation};
use crate::record::NewActivity;

const LABELS: &[ActionLabel] = &[
	ActionLabel::new(
		"update",
		"{actor} updated the site from {meta:old_version} to {object} {when}.",
	),
	ActionLabel::new(
		"auto_update",
		"The site was automatically updated from {meta:old_version} to {object} {when}.",
	),
];

const EVENTS: &[&str] = &["core.updated"];

#[derive(Debug, Deserialize)]
struct CorePayload {
	new_version: String,
	#[serde(default)]
	old_version: Option<String>,
	#[serde(default)]
	automatic: bool,
}

/// Updates of the host software itself.
#[derive(Debug, Default, Clone, Copy)]
pub struct CoreHandler;

impl ActionHandler for CoreHandler {
	fn object_type(&self) -> &'static str {
		"core"
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
		_ctx: &HandlerContext,
	) -> ActivityResult<Translation> {
		if notification.name != "core.updated" {
			return Ok(UNHANDLED);
		}

		let payload: CorePayload = notification.parse()?;
		let new_version = payload.new_version.trim();
		if new_version.is_empty() {
			return Err(ActivityError::Validation("new_version is required".to_string()));
		}
		if payload.old_version.as_deref() == Some(new_version) {
			return Ok(Translation::Skip("version unchanged"));
		}

		let action = if payload.automatic { "auto_update" } else { "update" };
		let mut draft = NewActivity::builder(self.object_type(), action)
			.object(0, new_version)
			.meta("new_version", new_version);
		if let Some(old_version) = payload.old_version.as_deref() {
			draft = draft.meta("old_version", old_version);
		}
		Ok(Translation::Record(draft.build()))
	}
}
