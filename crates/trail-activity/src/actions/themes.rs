// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde::Deserialize;

use super::{first_name, UNHANDLED};
use crate::error::{ActivityError, ActivityResult};
use crate::handler::{ActionHandler, ActionLabel, HandlerContext, Notification, Translation};
use crate::record::NewActivity;

const LABELS: &[ActionLabel] = &[
	ActionLabel::new(
		"switch",
		"{actor} switched from \"{meta:old_theme}\" to the \"{object}\" theme {when}.",
	),
	ActionLabel::new("install", "{actor} installed the \"{object}\" theme {when}."),
	ActionLabel::new(
		"update",
		"{actor} updated the \"{object}\" theme to {meta:version} {when}.",
	),
	ActionLabel::new("delete", "{actor} deleted the \"{object}\" theme {when}."),
];

const EVENTS: &[&str] = &[
	"theme.switched",
	"theme.installed",
	"theme.updated",
	"theme.deleted",
];

#[derive(Debug, Deserialize)]
struct ThemePayload {
	stylesheet: String,
	#[serde(default)]
	name: Option<String>,
	#[serde(default)]
	version: Option<String>,
	/// Name of the previously active theme on switch.
	#[serde(default)]
	old_name: Option<String>,
}

/// Themes, identified by stylesheet slug.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThemeHandler;

impl ActionHandler for ThemeHandler {
	fn object_type(&self) -> &'static str {
		"theme"
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
			"theme.switched" => "switch",
			"theme.installed" => "install",
			"theme.updated" => "update",
			"theme.deleted" => "delete",
			_ => return Ok(UNHANDLED),
		};

		let payload: ThemePayload = notification.parse()?;
		if payload.stylesheet.trim().is_empty() {
			return Err(ActivityError::Validation("theme without stylesheet".to_string()));
		}

		let name = first_name([payload.name]).unwrap_or_else(|| payload.stylesheet.clone());
		let mut draft = NewActivity::builder(self.object_type(), action)
			.object(0, name)
			.meta("stylesheet", payload.stylesheet);
		if let Some(version) = payload.version {
			draft = draft.meta("version", version);
		}
		if let Some(old_name) = payload.old_name {
			draft = draft.meta("old_theme", old_name);
		}
		Ok(Translation::Record(draft.build()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::actions::testing::{ctx, record};
	use serde_json::json;

	#[test]
	fn switch_records_previous_theme() {
		let (_, ctx) = ctx();
		let draft = record(
			ThemeHandler
				.translate(
					&Notification::new(
						"theme.switched",
						json!({
							"stylesheet": "twentyfour",
							"name": "Twenty Twenty-Four",
							"old_name": "Twenty Twenty-Three"
						}),
					),
					&ctx,
				)
				.unwrap(),
		);
		assert_eq!(draft.action, "switch");
		assert_eq!(draft.object_name, "Twenty Twenty-Four");
		assert_eq!(draft.meta.get_str("old_theme"), "Twenty Twenty-Three");
		assert_eq!(draft.meta.get_str("stylesheet"), "twentyfour");
	}

	#[test]
	fn unnamed_theme_falls_back_to_stylesheet() {
		let (_, ctx) = ctx();
		let draft = record(
			ThemeHandler
				.translate(
					&Notification::new(
						"theme.updated",
						json!({"stylesheet": "astra", "version": "4.1"}),
					),
					&ctx,
				)
				.unwrap(),
		);
		assert_eq!(draft.object_name, "astra");
		assert_eq!(draft.meta.get_str("version"), "4.1");
	}

	#[test]
	fn blank_stylesheet_is_rejected() {
		let (_, ctx) = ctx();
		assert!(matches!(
			ThemeHandler.translate(
				&Notification::new("theme.deleted", json!({"stylesheet": " "})),
				&ctx
			),
			Err(ActivityError::Validation(_))
		));
	}
}
