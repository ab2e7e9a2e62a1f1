// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Built-in handlers, one per host domain.
//!
//! | handler | object type | notifications |
//! |---------|-------------|---------------|
//! | [`AttachmentHandler`] | `attachment` | `attachment.added`, `attachment.edited`, `attachment.deleted` |
//! | [`PostHandler`] | `post` | `post.saved`, `post.trashed`, `post.untrashed`, `post.deleted` |
//! | [`CommentHandler`] | `comment` | `comment.inserted`, `comment.edited`, `comment.status_changed`, `comment.deleted` |
//! | [`TermHandler`] | `term` | `term.created`, `term.edited`, `term.deleted` |
//! | [`UserHandler`] | `user` | `user.login`, `user.logout`, `user.login_failed`, `user.registered`, `user.profile_updated`, `user.deleted` |
//! | [`MenuHandler`] | `menu` | `menu.created`, `menu.updated`, `menu.deleted` |
//! | [`WidgetHandler`] | `widget` | `widget.updated`, `widget.deleted` |
//! | [`ThemeHandler`] | `theme` | `theme.switched`, `theme.installed`, `theme.updated`, `theme.deleted` |
//! | [`PluginHandler`] | `plugin` | `plugin.activated`, `plugin.deactivated`, `plugin.installed`, `plugin.updated`, `plugin.deleted` |
//! | [`SiteSettingHandler`] | `site_setting` | `option.updated` |
//! | [`ExportHandler`] | `export` | `export.completed` |
//! | [`CoreHandler`] | `core` | `core.updated` |

mod attachments;
mod comments;
mod core_updates;
mod exports;
mod menus;
mod plugins;
mod posts;
mod settings;
mod terms;
mod themes;
mod users;
mod widgets;

pub use self::attachments::AttachmentHandler;
pub use self::comments::CommentHandler;
pub use self::core_updates::CoreHandler;
pub use self::exports::ExportHandler;
pub use self::menus::MenuHandler;
pub use self::plugins::PluginHandler;
pub use self::posts::PostHandler;
pub use self::settings::SiteSettingHandler;
pub use self::terms::TermHandler;
pub use self::themes::ThemeHandler;
pub use self::users::UserHandler;
pub use self::widgets::WidgetHandler;

use std::sync::Arc;

use crate::handler::{ActionHandler, Translation};

pub fn default_handlers() -> Vec<Arc<dyn ActionHandler>> {
	vec![
		Arc::new(AttachmentHandler),
		Arc::new(PostHandler),
		Arc::new(CommentHandler),
		Arc::new(TermHandler),
		Arc::new(UserHandler),
		Arc::new(MenuHandler),
		Arc::new(WidgetHandler),
		Arc::new(ThemeHandler),
		Arc::new(PluginHandler),
		Arc::new(SiteSettingHandler),
		Arc::new(ExportHandler),
		Arc::new(CoreHandler),
	]
}

/// First non-blank candidate.
pub(crate) fn first_name<I>(candidates: I) -> Option<String>
where
	I: IntoIterator<Item = Option<String>>,
{
	candidates
		.into_iter()
		.flatten()
		.map(|s| s.trim().to_string())
		.find(|s| !s.is_empty())
}

pub(crate) const UNHANDLED: Translation = Translation::Skip("unhandled notification");

pub(crate) const NON_INTERACTIVE: Translation = Translation::Skip("non-interactive notification");


#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashSet;

	#[test]
	fn default_handlers_cover_every_domain() {
		let types: HashSet<&str> = default_handlers().iter().map(|h| h.object_type()).collect();
		assert_eq!(types.len(), 12);
	}

	#[test]
	fn every_label_parses() {
		for handler in default_handlers() {
			assert_eq!(
				handler.descriptors().len(),
				handler.labels().len(),
				"{} has an invalid label",
				handler.object_type()
			);
		}
	}

	#[test]
	fn subscriptions_are_unique_across_handlers() {
		let mut seen = HashSet::new();
		for handler in default_handlers() {
			for event in handler.subscriptions() {
				assert!(seen.insert(*event), "{event} subscribed twice");
			}
		}
	}

	#[test]
	fn first_name_skips_blank() {
		assert_eq!(
			first_name([None, Some("  ".to_string()), Some(" cat.png ".to_string())]),
			Some("cat.png".to_string())
		);
		assert_eq!(first_name([None, None]), None);
	}
}
