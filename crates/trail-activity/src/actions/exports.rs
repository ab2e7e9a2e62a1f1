// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde::Deserialize;

use super::UNHANDLED;
use crate::error::ActivityResult;
use crate::handler::{ActionHandler, ActionLabel, HandlerContext, Notification, Translation};
use crate::record::NewActivity;

const LABELS: &[ActionLabel] = &[ActionLabel::new(
	"download",
	"{actor} downloaded an export of {object} {when}.",
)];

const EVENTS: &[&str] = &["export.completed"];

#[derive(Debug, Deserialize)]
struct ExportPayload {
	job_id: u64,
	/// What was exported, e.g. `all` or a post type.
	#[serde(default = "default_content")]
	content: String,
	#[serde(default = "default_completed")]
	completed: bool,
	#[serde(default)]
	rows: Option<u64>,
}

fn default_content() -> String {
	"all".to_string()
}

fn default_completed() -> bool {
	true
}

/// Content exports. One record per finished job, never per exported row.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExportHandler;

impl ActionHandler for ExportHandler {
	fn object_type(&self) -> &'static str {
		"export"
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
		if notification.name != "export.completed" {
			return Ok(UNHANDLED);
		}

		let payload: ExportPayload = notification.parse()?;
		if !payload.completed {
			return Ok(Translation::Skip("export still running"));
		}

		let mut draft = NewActivity::builder(self.object_type(), "download")
			.object(payload.job_id, payload.content.clone())
			.meta("content", payload.content);
		if let Some(rows) = payload.rows {
			draft = draft.meta("rows", rows);
		}
		Ok(Translation::Record(draft.build()))
	}
}
