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
	ActionLabel::new("delete", "{actor} deleted the {subtype} \"{object}\" {when}."),
];

const EVENTS: &[&str] = &["term.created", "term.edited", "term.deleted"];

/// Menus are terms too, but recorded by the menu handler.
const MENU_TAXONOMY: &str = "nav_menu";

#[derive(Debug, Deserialize)]
struct TermPayload {
	term_id: u64,
	#[serde(default)]
	taxonomy: Option<String>,
	#[serde(default)]
	name: Option<String>,
}

/// Categories, tags and custom taxonomy terms. The subtype is the taxonomy.
#[derive(Debug, Default, Clone, Copy)]
pub struct TermHandler;

impl ActionHandler for TermHandler {
	fn object_type(&self) -> &'static str {
		"term"
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
			"term.created" => "create",
			"term.edited" => "update",
			"term.deleted" => "delete",
			_ => return Ok(UNHANDLED),
		};
		if ctx.suppresses(notification) {
			return Ok(NON_INTERACTIVE);
		}

		let payload: TermPayload = notification.parse()?;
		let term = ctx.directory.term(payload.term_id);

		let taxonomy = first_name([payload.taxonomy, term.as_ref().map(|t| t.taxonomy.clone())]);
		if taxonomy.as_deref() == Some(MENU_TAXONOMY) {
			return Ok(Translation::Skip("menu term"));
		}

		let name = first_name([payload.name, term.map(|t| t.name)])
			.ok_or_else(|| ActivityError::Lookup(format!("term {} not found", payload.term_id)))?;

		Ok(Translation::Record(
			NewActivity::builder(self.object_type(), action)
				.object(payload.term_id, name)
				.maybe_subtype(taxonomy)
				.build(),
		))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::actions::testing::{ctx, record, skip_reason};
	use crate::directory::TermSnapshot;
	use serde_json::json;

	#[test]
	fn records_taxonomy_as_subtype() {
		let (directory, ctx) = ctx();
		directory.insert_term(TermSnapshot {
			id: 3,
			name: "News".to_string(),
			taxonomy: "category".to_string(),
		});

		let draft = record(
			TermHandler
				.translate(&Notification::new("term.edited", json!({"term_id": 3})), &ctx)
				.unwrap(),
		);
		assert_eq!(draft.action, "update");
		assert_eq!(draft.object_name, "News");
		assert_eq!(draft.object_subtype.as_deref(), Some("category"));
	}

	#[test]
	fn deleted_term_uses_payload_name() {
		let (_, ctx) = ctx();
		let draft = record(
			TermHandler
				.translate(
					&Notification::new(
						"term.deleted",
						json!({"term_id": 8, "taxonomy": "post_tag", "name": "rust"}),
					),
					&ctx,
				)
				.unwrap(),
		);
		assert_eq!(draft.action, "delete");
		assert_eq!(draft.object_name, "rust");
	}

	#[test]
	fn menu_terms_are_left_to_menus() {
		let (_, ctx) = ctx();
		let reason = skip_reason(
			TermHandler
				.translate(
					&Notification::new(
						"term.created",
						json!({"term_id": 2, "taxonomy": "nav_menu", "name": "Main"}),
					),
					&ctx,
				)
				.unwrap(),
		);
		assert_eq!(reason, "menu term");
	}
}
