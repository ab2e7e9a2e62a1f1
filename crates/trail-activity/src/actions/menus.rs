// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde::Deserialize;

use super::{first_name, UNHANDLED};
use crate::error::{ActivityError, ActivityResult};
use crate::handler::{ActionHandler, ActionLabel, HandlerContext, Notification, Translation};
use crate::record::NewActivity;

const LABELS: &[ActionLabel] = &[
	ActionLabel::new("create", "{actor} created the menu \"{object}\" {when}."),
	ActionLabel::new("update", "{actor} updated the menu \"{object}\" {when}."),
	ActionLabel::new("delete", "{actor} deleted the menu \"{object}\" {when}."),
];

const EVENTS: &[&str] = &["menu.created", "menu.updated", "menu.deleted"];

#[derive(Debug, Deserialize)]
struct MenuPayload {
	menu_id: u64,
	#[serde(default)]
	name: Option<String>,
}

/// Navigation menus.
#[derive(Debug, Default, Clone, Copy)]
pub struct MenuHandler;

impl ActionHandler for MenuHandler {
	fn object_type(&self) -> &'static str {
		"menu"
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
			"menu.created" => "create",
			"menu.updated" => "update",
			"menu.deleted" => "delete",
			_ => return Ok(UNHANDLED),
		};

		let payload: MenuPayload = notification.parse()?;
		let name = first_name([
			payload.name,
			ctx.directory.term(payload.menu_id).map(|t| t.name),
		])
		.ok_or_else(|| ActivityError::Lookup(format!("menu {} not found", payload.menu_id)))?;

		Ok(Translation::Record(
			NewActivity::builder(self.object_type(), action)
				.object(payload.menu_id, name)
				.build(),
		))
	}
}
