// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde::Deserialize;

use super::{first_name, NON_INTERACTIVE, UNHANDLED};
use crate::error::{ActivityError, ActivityResult};
use crate::handler::{ActionHandler, ActionLabel, HandlerContext, Notification, Translation};
use crate::record::{ActivitySeverity, ActorId, NewActivity};

const LABELS: &[ActionLabel] = &[
	ActionLabel::new("login", "{actor} logged in {when}."),
	ActionLabel::new("logout", "{actor} logged out {when}."),
	ActionLabel::new(
		"login_failed",
		"Somebody failed to log in as \"{object}\" {when}.",
	),
	ActionLabel::new("create", "{actor} created the user \"{object}\" {when}."),
	ActionLabel::new("update", "{actor} updated the profile of \"{object}\" {when}."),
	ActionLabel::new("delete", "{actor} deleted the user \"{object}\" {when}."),
];

const EVENTS: &[&str] = &[
	"user.login",
	"user.logout",
	"user.login_failed",
	"user.registered",
	"user.profile_updated",
	"user.deleted",
];

#[derive(Debug, Deserialize)]
struct UserPayload {
	#[serde(default)]
	user_id: Option<ActorId>,
	#[serde(default)]
	username: Option<String>,
	#[serde(default)]
	display_name: Option<String>,
	/// Set on deletion when content was handed to another user.
	#[serde(default)]
	reassign: Option<ActorId>,
}

/// Authentication and account management.
#[derive(Debug, Default, Clone, Copy)]
pub struct UserHandler;

impl UserHandler {
	fn failed_login(&self, payload: UserPayload) -> ActivityResult<Translation> {
		let attempted = first_name([payload.username])
			.ok_or_else(|| ActivityError::Validation("failed login without username".to_string()))?;

		Ok(Translation::Record(
			NewActivity::builder(self.object_type(), "login_failed")
				.object(0, attempted)
				.severity(ActivitySeverity::Warning)
				.build(),
		))
	}
}

impl ActionHandler for UserHandler {
	fn object_type(&self) -> &'static str {
		"user"
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
			"user.login" => "login",
			"user.logout" => "logout",
			"user.login_failed" => "login_failed",
			"user.registered" => "create",
			"user.profile_updated" => "update",
			"user.deleted" => "delete",
			_ => return Ok(UNHANDLED),
		};

		let payload: UserPayload = notification.parse()?;
		if action == "login_failed" {
			return self.failed_login(payload);
		}
		if matches!(action, "create" | "update" | "delete") && ctx.suppresses(notification) {
			return Ok(NON_INTERACTIVE);
		}

		let user_id = payload
			.user_id
			.ok_or_else(|| {
				ActivityError::Validation(format!("{} without user_id", notification.name))
			})?;
		let user = ctx.directory.user(user_id);
		let name = first_name([
			payload.display_name,
			user.as_ref().map(|u| u.display_name.clone()),
			payload.username,
			user.map(|u| u.login),
		])
		.ok_or_else(|| ActivityError::Lookup(format!("user {user_id} not found")))?;

		let mut draft =
			NewActivity::builder(self.object_type(), action).object(user_id.get(), name);
		// Sessions are performed by the user themselves.
		if matches!(action, "login" | "logout") {
			draft = draft.actor(user_id);
		}
		if let Some(reassign) = payload.reassign {
			draft = draft.meta("reassign", reassign.get());
		}
		Ok(Translation::Record(draft.build()))
	}
}
