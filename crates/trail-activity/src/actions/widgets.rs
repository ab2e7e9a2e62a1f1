// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde::Deserialize;

use super::{first_name, UNHANDLED};
use crate::error::ActivityResult;
use crate::handler::{ActionHandler, ActionLabel, HandlerContext, Notification, Translation};
use crate::record::NewActivity;

const LABELS: &[ActionLabel] = &[
	ActionLabel::new(
		"update",
		"{actor} updated the widget \"{object}\" in {subtype} {when}.",
	),
	ActionLabel::new(
		"delete",
		"{actor} removed the widget \"{object}\" from {subtype} {when}.",
	),
];

const EVENTS: &[&str] = &["widget.updated", "widget.deleted"];

#[derive(Debug, Deserialize)]
struct WidgetPayload {
	/// Host widget id such as `text-3`.
	widget_id: String,
	sidebar: String,
	#[serde(default)]
	title: Option<String>,
}

/// Numeric instance suffix of a widget id (`text-3` is 3), or 0.
fn instance_number(widget_id: &str) -> u64 {
	widget_id
		.rsplit_once('-')
		.and_then(|(_, n)| n.parse().ok())
		.unwrap_or(0)
}

/// Sidebar widgets. The subtype is the sidebar. Instance numbers repeat
/// across widget kinds, so the full widget id keeps events apart.
#[derive(Debug, Default, Clone, Copy)]
pub struct WidgetHandler;

impl ActionHandler for WidgetHandler {
	fn object_type(&self) -> &'static str {
		"widget"
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
		let action = match notification.name.as_str() {
			"widget.updated" => "update",
			"widget.deleted" => "delete",
			_ => return Ok(UNHANDLED),
		};

		let payload: WidgetPayload = notification.parse()?;
		let name = first_name([payload.title, Some(payload.widget_id.clone())])
			.unwrap_or_else(|| payload.widget_id.clone());

		Ok(Translation::Record(
			NewActivity::builder(self.object_type(), action)
				.object(instance_number(&payload.widget_id), name)
				.subtype(payload.sidebar)
				.distinct_by(payload.widget_id.clone())
				.meta("widget_id", payload.widget_id)
				.build(),
		))
	}
}
