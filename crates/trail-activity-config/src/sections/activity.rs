// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Activity recording configuration section.

use serde::{Deserialize, Serialize};

const DEFAULT_PER_PAGE: u32 = 20;
const DEFAULT_MAX_PER_PAGE: u32 = 200;
const DEFAULT_FALLBACK_ACTOR_LABEL: &str = "A user";

/// Option names that change on nearly every request and would drown the log.
///
/// A trailing `*` matches by prefix.
pub const DEFAULT_IGNORED_OPTIONS: &[&str] = &[
	"cron",
	"rewrite_rules",
	"recently_edited",
	"recently_activated",
	"active_plugins",
	"uninstall_plugins",
	"auto_updater.lock",
	"db_upgraded",
	"_transient_*",
	"_site_transient_*",
];

fn default_ignored_options() -> Vec<String> {
	DEFAULT_IGNORED_OPTIONS
		.iter()
		.map(|s| s.to_string())
		.collect()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ActivityConfigLayer {
	pub enabled: Option<bool>,
	pub log_non_interactive: Option<bool>,
	pub ignored_options: Option<Vec<String>>,
	pub default_per_page: Option<u32>,
	pub max_per_page: Option<u32>,
	pub fallback_actor_label: Option<String>,
}

impl ActivityConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.enabled.is_some() {
			self.enabled = other.enabled;
		}
		if other.log_non_interactive.is_some() {
			self.log_non_interactive = other.log_non_interactive;
		}
		if other.ignored_options.is_some() {
			self.ignored_options = other.ignored_options;
		}
		if other.default_per_page.is_some() {
			self.default_per_page = other.default_per_page;
		}
		if other.max_per_page.is_some() {
			self.max_per_page = other.max_per_page;
		}
		if other.fallback_actor_label.is_some() {
			self.fallback_actor_label = other.fallback_actor_label;
		}
	}

	pub fn finalize(self) -> ActivityConfig {
		ActivityConfig {
			enabled: self.enabled.unwrap_or(true),
			log_non_interactive: self.log_non_interactive.unwrap_or(false),
			ignored_options: self
				.ignored_options
				.unwrap_or_else(default_ignored_options),
			default_per_page: self.default_per_page.unwrap_or(DEFAULT_PER_PAGE),
			max_per_page: self.max_per_page.unwrap_or(DEFAULT_MAX_PER_PAGE),
			fallback_actor_label: self
				.fallback_actor_label
				.unwrap_or_else(|| DEFAULT_FALLBACK_ACTOR_LABEL.to_string()),
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivityConfig {
	/// Master switch; when false notifications are ignored entirely.
	pub enabled: bool,
	/// Record imports, bulk edits and other non-interactive mutations.
	pub log_non_interactive: bool,
	/// Site option names never recorded by the site-settings handler.
	pub ignored_options: Vec<String>,
	pub default_per_page: u32,
	pub max_per_page: u32,
	/// Shown in place of the actor link when the actor cannot be resolved.
	pub fallback_actor_label: String,
}

impl ActivityConfig {
	/// Returns true when `option` matches an entry of `ignored_options`.
	pub fn is_ignored_option(&self, option: &str) -> bool {
		self.ignored_options.iter().any(|pattern| {
			match pattern.strip_suffix('*') {
				Some(prefix) => option.starts_with(prefix),
				None => pattern == option,
			}
		})
	}
}

impl Default for ActivityConfig {
	fn default() -> Self {
		ActivityConfigLayer::default().finalize()
	}
}
