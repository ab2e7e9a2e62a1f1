// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde::Deserialize;

use super::{first_name, UNHANDLED};
use crate::error::{ActivityError, ActivityResult};
use crate::handler::{ActionHandler, ActionLabel, HandlerContext, Notification, Translation};
use crate::record::NewActivity;

const LABELS: &[ActionLabel] = &[
	ActionLabel::new("activate", "{actor} activated the \"{object}\" plugin {when}."),
	ActionLabel::new(
		"deactivate",
		"{actor} deactivated the \"{object}\" plugin {when}.",
	),
	ActionLabel::new("install", "{actor} installed the \"{object}\" plugin {when}."),
	ActionLabel::new(
		"update",
		"{actor} updated the \"{object}\" plugin to {meta:version} {when}.",
	),
	ActionLabel::new("delete", "{actor} deleted the \"{object}\" plugin {when}."),
];

const EVENTS: &[&str] = &[
	"plugin.activated",
	"plugin.deactivated",
	"plugin.installed",
	"plugin.updated",
	"plugin.deleted",
];

#[derive(Debug, Deserialize)]
struct PluginPayload {
	/// Plugin basename such as `akismet/akismet.php`.
	plugin: String,
	#[serde(default)]
	name: Option<String>,
	#[serde(default)]
	version: Option<String>,
	#[serde(default)]
	network_wide: bool,
}

/// Slug of a plugin basename: its directory, or the file stem for
/// single-file plugins.
fn plugin_slug(basename: &str) -> &str {
	match basename.split_once('/') {
		Some((dir, _)) => dir,
		None => basename.trim_end_matches(".php"),
	}
}

/// Plugins, identified by basename.
#[derive(Debug, Default, Clone, Copy)]
pub struct PluginHandler;

impl ActionHandler for PluginHandler {
	fn object_type(&self) -> &'static str {
		"plugin"
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
			"plugin.activated" => "activate",
			"plugin.deactivated" => "deactivate",
			"plugin.installed" => "install",
			"plugin.updated" => "update",
			"plugin.deleted" => "delete",
			_ => return Ok(UNHANDLED),
		};

		let payload: PluginPayload = notification.parse()?;
		let basename = payload.plugin.trim();
		if basename.is_empty() {
			return Err(ActivityError::Validation("plugin without basename".to_string()));
		}

		let name = first_name([payload.name]).unwrap_or_else(|| plugin_slug(basename).to_string());
		let mut draft = NewActivity::builder(self.object_type(), action)
			.object(0, name)
			.meta("plugin", basename);
		if let Some(version) = payload.version {
			draft = draft.meta("version", version);
		}
		if payload.network_wide {
			draft = draft.meta("network_wide", true);
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
	fn slugs() {
		assert_eq!(plugin_slug("akismet/akismet.php"), "akismet");
		assert_eq!(plugin_slug("hello.php"), "hello");
	}

	#[test]
	fn every_event_maps_to_an_action() {
		let (_, ctx) = ctx();
		for (event, action) in [
			("plugin.activated", "activate"),
			("plugin.deactivated", "deactivate"),
			("plugin.installed", "install"),
			("plugin.updated", "update"),
			("plugin.deleted", "delete"),
		] {
			let draft = record(
				PluginHandler
					.translate(
						&Notification::new(
							event,
							json!({"plugin": "akismet/akismet.php", "name": "Akismet"}),
						),
						&ctx,
					)
					.unwrap(),
			);
			assert_eq!(draft.action, action);
			assert_eq!(draft.object_name, "Akismet");
			assert_eq!(draft.meta.get_str("plugin"), "akismet/akismet.php");
		}
	}

	#[test]
	fn bulk_updates_have_distinct_dedup_keys() {
		let (_, ctx) = ctx();
		let keys: Vec<_> = ["akismet/akismet.php", "jetpack/jetpack.php"]
			.into_iter()
			.map(|plugin| {
				record(
					PluginHandler
						.translate(
							&Notification::new("plugin.updated", json!({"plugin": plugin})),
							&ctx,
						)
						.unwrap(),
				)
				.dedup_key()
			})
			.collect();
		assert_ne!(keys[0], keys[1]);
	}

	#[test]
	fn network_activation_is_noted() {
		let (_, ctx) = ctx();
		let draft = record(
			PluginHandler
				.translate(
					&Notification::new(
						"plugin.activated",
						json!({"plugin": "hello.php", "network_wide": true}),
					),
					&ctx,
				)
				.unwrap(),
		);
		assert_eq!(draft.object_name, "hello");
		assert_eq!(draft.meta.get_str("network_wide"), "true");
	}
}
