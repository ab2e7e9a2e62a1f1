// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde::Deserialize;
use serde_json::Value;

use super::UNHANDLED;
use crate::error::{ActivityError, ActivityResult};
use crate::handler::{ActionHandler, ActionLabel, HandlerContext, Notification, Translation};
use crate::record::NewActivity;

const LABELS: &[ActionLabel] = &[ActionLabel::new(
	"update",
	"{actor} changed the \"{object}\" setting from \"{meta:old_value}\" to \"{meta:new_value}\" {when}.",
)];

const EVENTS: &[&str] = &["option.updated"];

#[derive(Debug, Deserialize)]
struct OptionPayload {
	option: String,
	#[serde(default)]
	old_value: Value,
	#[serde(default)]
	new_value: Value,
}

/// Site options. Only real changes to options outside the ignore list are
/// recorded, one per distinct new value within a request.
#[derive(Debug, Default, Clone, Copy)]
pub struct SiteSettingHandler;

impl ActionHandler for SiteSettingHandler {
	fn object_type(&self) -> &'static str {
		"site_setting"
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
		if notification.name != "option.updated" {
			return Ok(UNHANDLED);
		}

		let payload: OptionPayload = notification.parse()?;
		let option = payload.option.trim();
		if option.is_empty() {
			return Err(ActivityError::Validation("option name is required".to_string()));
		}
		if ctx.config.is_ignored_option(option) {
			return Ok(Translation::Skip("ignored option"));
		}
		if payload.old_value == payload.new_value {
			return Ok(Translation::Skip("value unchanged"));
		}

		let new_value = payload.new_value.to_string();
		Ok(Translation::Record(
			NewActivity::builder(self.object_type(), "update")
				.object(0, option)
				.distinct_by(new_value)
				.meta("old_value", payload.old_value)
				.meta("new_value", payload.new_value)
				.build(),
		))
	}
}
