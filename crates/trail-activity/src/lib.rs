// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Activity recording for content-management hosts.
//!
//! Host mutation events arrive as [`Notification`]s. Domain
//! [`ActionHandler`]s translate them into [`NewActivity`] drafts, the
//! [`Recorder`] persists them into an [`ActivityStore`], and the
//! [`Renderer`] turns stored records back into display text using the label
//! templates held in the [`ActionRegistry`].
//!
//! ```ignore
//! use std::sync::Arc;
//! use trail_activity::{ActivityLogger, HookBus, Notification, RequestScope};
//!
//! let logger = Arc::new(ActivityLogger::builder().default_handlers().build());
//! let mut bus = HookBus::new();
//! logger.subscribe(&mut bus);
//!
//! let mut scope = RequestScope::new();
//! bus.emit(&mut scope, &Notification::new("attachment.added", payload));
//! ```

pub mod actions;
pub mod dedup;
pub mod directory;
pub mod error;
pub mod handler;
pub mod logger;
pub mod meta;
pub mod query;
pub mod record;
pub mod recorder;
pub mod registry;
pub mod render;
pub mod store;
pub mod template;

pub use actions::default_handlers;
pub use dedup::{DedupGuard, DedupKey, RequestScope};
pub use directory::{
	CommentSnapshot, EmptyDirectory, HostDirectory, MemoryDirectory, PostSnapshot, TermSnapshot,
	UserSnapshot,
};
pub use error::{ActivityError, ActivityResult, StoreError, TemplateError};
pub use handler::{ActionHandler, ActionLabel, HandlerContext, Notification, Translation};
pub use logger::{
	ActivityLogger, ActivityLoggerBuilder, ActivityPage, HookBus, HookCallback, Subscribe,
};
pub use meta::ActivityMeta;
pub use query::{
	translate_sort, ActivityFilter, ActivityQuery, ListQuery, NativeField, NativeSort,
	SortDirection, SortKey,
};
pub use record::{
	ActivityId, ActivityRecord, ActivitySeverity, ActivityStatus, ActorId, NewActivity,
	NewActivityBuilder, RecordFields,
};
pub use recorder::{ActorContext, FixedActor, NoActor, Recorder};
pub use registry::{ActionDescriptor, ActionRegistry, CustomRender, Resolved};
pub use render::{
	escape_html, relative_time, ActivityRow, ActorProfile, ActorResolver, RenderInput, Renderer,
};
pub use store::{open_store, ActivityStore, MemoryActivityStore, MetaStore};
pub use template::{LabelTemplate, Placeholder, Segment};

#[cfg(feature = "store-sqlite")]
pub use store::SqliteActivityStore;

pub use trail_activity_config::{ActivityConfig, StorageBackend, StorageConfig, TrailConfig};
