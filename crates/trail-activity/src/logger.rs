// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Dispatching host notifications through domain handlers.
//!
//! [`ActivityLogger`] owns the handler set, the registry of action labels,
//! the [`Recorder`] and the [`Renderer`]. Hosts either call
//! [`ActivityLogger::dispatch`] directly or let the logger attach itself to a
//! [`Subscribe`] implementation such as [`HookBus`].
//!
//! Dispatch never returns an error: translation, validation and storage
//! failures are logged and the notification is dropped.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};
use trail_activity_config::ActivityConfig;

use crate::actions::default_handlers;
use crate::dedup::RequestScope;
use crate::directory::{EmptyDirectory, HostDirectory};
use crate::error::{ActivityResult, TemplateError};
use crate::handler::{ActionHandler, HandlerContext, Notification, Translation};
use crate::query::ActivityQuery;
use crate::record::ActivityId;
use crate::recorder::{ActorContext, NoActor, Recorder};
use crate::registry::{ActionDescriptor, ActionRegistry};
use crate::render::{ActivityRow, ActorResolver, Renderer};
use crate::store::{ActivityStore, MemoryActivityStore};
use crate::template::LabelTemplate;

pub type HookCallback = Arc<dyn Fn(&mut RequestScope, &Notification) + Send + Sync>;

/// Host capability for attaching callbacks to named events.
pub trait Subscribe {
	fn subscribe(&mut self, event: &str, callback: HookCallback);
}

/// Minimal synchronous event bus.
#[derive(Default)]
pub struct HookBus {
	hooks: HashMap<String, Vec<HookCallback>>,
}

impl HookBus {
	pub fn new() -> Self {
		Self::default()
	}

	/// Invoke every callback registered for the notification's name, in
	/// registration order. Returns how many ran.
	pub fn emit(&self, scope: &mut RequestScope, notification: &Notification) -> usize {
		let Some(callbacks) = self.hooks.get(&notification.name) else {
			return 0;
		};
		for callback in callbacks {
			callback(scope, notification);
		}
		callbacks.len()
	}

	pub fn has_subscribers(&self, event: &str) -> bool {
		self.hooks.get(event).is_some_and(|c| !c.is_empty())
	}
}

impl Subscribe for HookBus {
	fn subscribe(&mut self, event: &str, callback: HookCallback) {
		self.hooks.entry(event.to_string()).or_default().push(callback);
	}
}

/// One page of rendered activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityPage {
	pub rows: Vec<ActivityRow>,
	pub total: u64,
	pub limit: u32,
	pub offset: u32,
}

pub struct ActivityLogger {
	config: Arc<ActivityConfig>,
	registry: Arc<ActionRegistry>,
	recorder: Recorder,
	renderer: Renderer,
	ctx: HandlerContext,
	handlers: Vec<Arc<dyn ActionHandler>>,
	routes: HashMap<String, Vec<usize>>,
}

impl ActivityLogger {
	pub fn builder() -> ActivityLoggerBuilder {
		ActivityLoggerBuilder::new()
	}

	pub fn config(&self) -> &ActivityConfig {
		&self.config
	}

	pub fn registry(&self) -> &Arc<ActionRegistry> {
		&self.registry
	}

	pub fn recorder(&self) -> &Recorder {
		&self.recorder
	}

	pub fn renderer(&self) -> &Renderer {
		&self.renderer
	}

	pub fn store(&self) -> &Arc<dyn ActivityStore> {
		self.recorder.store()
	}

	pub fn handlers(&self) -> &[Arc<dyn ActionHandler>] {
		&self.handlers
	}

	/// Notification names with at least one handler, sorted.
	pub fn subscribed_events(&self) -> Vec<&str> {
		let mut events: Vec<&str> = self.routes.keys().map(String::as_str).collect();
		events.sort_unstable();
		events
	}

	/// Attach [`Self::dispatch`] to every notification a handler consumes.
	pub fn subscribe(self: &Arc<Self>, host: &mut dyn Subscribe) {
		for event in self.subscribed_events() {
			let logger = Arc::clone(self);
			host.subscribe(
				event,
				Arc::new(move |scope: &mut RequestScope, notification: &Notification| {
					logger.dispatch(scope, notification);
				}),
			);
		}
	}

	/// Dispatch a single notification in a fresh request scope.
	pub fn handle(&self, notification: &Notification) -> Vec<ActivityId> {
		let mut scope = RequestScope::new();
		self.dispatch(&mut scope, notification)
	}

	/// Translate and record one notification. Returns the ids written.
	#[instrument(skip_all, fields(event = %notification.name, scope = %scope.id()))]
	pub fn dispatch(
		&self,
		scope: &mut RequestScope,
		notification: &Notification,
	) -> Vec<ActivityId> {
		if !self.config.enabled {
			debug!("activity logging disabled");
			return Vec::new();
		}

		let Some(indices) = self.routes.get(&notification.name) else {
			debug!("no handler for notification");
			return Vec::new();
		};

		let mut recorded = Vec::new();
		for &index in indices {
			let handler = &self.handlers[index];
			let object_type = handler.object_type();

			let mut draft = match handler.translate(notification, &self.ctx) {
				Ok(Translation::Record(draft)) => draft,
				Ok(Translation::Skip(reason)) => {
					debug!(object_type, reason, "notification skipped");
					continue;
				}
				Err(e) => {
					warn!(object_type, error = %e, "failed to translate notification");
					continue;
				}
			};

			if draft.actor.is_none() {
				draft.actor = notification.actor;
			}

			let key = draft.dedup_key();
			if scope.guard().is_duplicate(&key) {
				debug!(%key, "duplicate activity in request scope");
				continue;
			}

			match self.recorder.persist(draft) {
				Ok(id) => {
					scope.note_recorded(key, id);
					recorded.push(id);
				}
				Err(e) => {
					warn!(object_type, %key, error = %e, "failed to record activity");
				}
			}
		}
		recorded
	}

	/// Replace the label template for one action, keeping any custom renderer.
	pub fn relabel(
		&self,
		object_type: &str,
		action: &str,
		template: &str,
	) -> Result<(), TemplateError> {
		let label = LabelTemplate::parse(template)?;
		let resolved = self.registry.resolve(object_type, action);
		let mut descriptor = ActionDescriptor::new(label);
		if !resolved.is_fallback() {
			descriptor.render = resolved.descriptor().render.clone();
		}
		self.registry.register(object_type, action, descriptor);
		Ok(())
	}

	/// Actions offered by the "filter by action" list for an object type.
	pub fn filter_actions(&self, object_type: &str) -> Vec<String> {
		self.registry.actions_for(object_type)
	}

	pub fn list(&self, query: &ActivityQuery) -> ActivityResult<ActivityPage> {
		self.list_at(query, Utc::now())
	}

	/// Query the store and render each row relative to `now`.
	pub fn list_at(
		&self,
		query: &ActivityQuery,
		now: DateTime<Utc>,
	) -> ActivityResult<ActivityPage> {
		let list = query.resolve(&self.config);
		let store = self.store();
		let total = store.count_records(&list.filter)?;

		let mut rows = Vec::new();
		for record in store.list_records(&list)? {
			let meta = store.get_metadata(record.id)?;
			rows.push(self.renderer.render_row(&record, &meta, now));
		}

		Ok(ActivityPage {
			rows,
			total,
			limit: list.limit,
			offset: list.offset,
		})
	}
}

pub struct ActivityLoggerBuilder {
	config: ActivityConfig,
	store: Option<Arc<dyn ActivityStore>>,
	directory: Arc<dyn HostDirectory>,
	actor_resolver: Arc<dyn ActorResolver>,
	actor_context: Arc<dyn ActorContext>,
	handlers: Vec<Arc<dyn ActionHandler>>,
}

impl ActivityLoggerBuilder {
	pub fn new() -> Self {
		Self {
			config: ActivityConfig::default(),
			store: None,
			directory: Arc::new(EmptyDirectory),
			actor_resolver: Arc::new(EmptyDirectory),
			actor_context: Arc::new(NoActor),
			handlers: Vec::new(),
		}
	}

	pub fn config(mut self, config: ActivityConfig) -> Self {
		self.config = config;
		self
	}

	pub fn store(mut self, store: Arc<dyn ActivityStore>) -> Self {
		self.store = Some(store);
		self
	}

	pub fn directory(mut self, directory: Arc<dyn HostDirectory>) -> Self {
		self.directory = directory;
		self
	}

	pub fn actor_resolver(mut self, resolver: Arc<dyn ActorResolver>) -> Self {
		self.actor_resolver = resolver;
		self
	}

	/// Use one collaborator for both entity lookup and actor resolution.
	pub fn host<H>(mut self, host: Arc<H>) -> Self
	where
		H: HostDirectory + ActorResolver + 'static,
	{
		self.directory = host.clone();
		self.actor_resolver = host;
		self
	}

	pub fn actor_context(mut self, context: Arc<dyn ActorContext>) -> Self {
		self.actor_context = context;
		self
	}

	pub fn handler(mut self, handler: Arc<dyn ActionHandler>) -> Self {
		self.handlers.push(handler);
		self
	}

	pub fn default_handlers(mut self) -> Self {
		self.handlers.extend(default_handlers());
		self
	}

	pub fn build(self) -> ActivityLogger {
		let config = Arc::new(self.config);
		let registry = Arc::new(ActionRegistry::new());
		let store = self
			.store
			.unwrap_or_else(|| Arc::new(MemoryActivityStore::new()));

		let mut routes: HashMap<String, Vec<usize>> = HashMap::new();
		for (index, handler) in self.handlers.iter().enumerate() {
			for (action, descriptor) in handler.descriptors() {
				registry.register(handler.object_type(), action, descriptor);
			}
			for event in handler.subscriptions() {
				routes.entry((*event).to_string()).or_default().push(index);
			}
		}

		debug!(
			handlers = self.handlers.len(),
			events = routes.len(),
			actions = registry.len(),
			"activity logger built"
		);

		ActivityLogger {
			ctx: HandlerContext::new(config.clone(), self.directory),
			renderer: Renderer::from_config(registry.clone(), self.actor_resolver, &config),
			recorder: Recorder::new(store, self.actor_context),
			registry,
			handlers: self.handlers,
			routes,
			config,
		}
	}
}

impl Default for ActivityLoggerBuilder {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::ActivityError;
	use crate::handler::ActionLabel;
	use crate::query::ActivityFilter;
	use crate::record::NewActivity;
	use serde::Deserialize;
	use serde_json::json;
	use std::sync::atomic::{AtomicUsize, Ordering};

	/// Records one `gizmo`/`poke` per notification, keyed by payload id.
	struct Poke;

	#[derive(Deserialize)]
	struct PokePayload {
		id: u64,
	}

	const POKE_LABELS: &[ActionLabel] = &[ActionLabel::new("poke", "{actor} poked {object}.")];

	impl ActionHandler for Poke {
		fn object_type(&self) -> &'static str {
			"gizmo"
		}

		fn labels(&self) -> &'static [ActionLabel] {
			POKE_LABELS
		}

		fn subscriptions(&self) -> &'static [&'static str] {
			&["gizmo.poked", "gizmo.prodded"]
		}

		fn translate(
			&self,
			notification: &Notification,
			_ctx: &HandlerContext,
		) -> ActivityResult<Translation> {
			let payload: PokePayload = notification.parse()?;
			if payload.id == 0 {
				return Err(ActivityError::Lookup("gizmo 0".to_string()));
			}
			Ok(Translation::Record(
				NewActivity::builder("gizmo", "poke")
					.object(payload.id, format!("gizmo {}", payload.id))
					.build(),
			))
		}
	}

	fn logger() -> ActivityLogger {
		ActivityLogger::builder().handler(Arc::new(Poke)).build()
	}

	fn count(logger: &ActivityLogger) -> u64 {
		logger
			.store()
			.count_records(&ActivityFilter::default())
			.unwrap()
	}

	mod dispatch {
		use super::*;

		#[test]
		fn records_routed_notification() {
			let logger = logger();
			let ids = logger.handle(&Notification::new("gizmo.poked", json!({"id": 4})));
			assert_eq!(ids.len(), 1);
			assert_eq!(count(&logger), 1);
		}

		#[test]
		fn ignores_unrouted_notification() {
			let logger = logger();
			assert!(logger
				.handle(&Notification::new("gizmo.smashed", json!({"id": 4})))
				.is_empty());
		}

		#[test]
		fn dedups_within_scope_only() {
			let logger = logger();
			let mut scope = RequestScope::new();
			let poke = Notification::new("gizmo.poked", json!({"id": 4}));
			let prod = Notification::new("gizmo.prodded", json!({"id": 4}));

			assert_eq!(logger.dispatch(&mut scope, &poke).len(), 1);
			assert!(logger.dispatch(&mut scope, &prod).is_empty());
			assert_eq!(scope.recorded().len(), 1);

			let mut next = RequestScope::new();
			assert_eq!(logger.dispatch(&mut next, &poke).len(), 1);
			assert_eq!(count(&logger), 2);
		}

		#[test]
		fn swallows_translation_errors() {
			let logger = logger();
			assert!(logger
				.handle(&Notification::new("gizmo.poked", json!({"id": "four"})))
				.is_empty());
			assert!(logger
				.handle(&Notification::new("gizmo.poked", json!({"id": 0})))
				.is_empty());
			assert_eq!(count(&logger), 0);
		}

		#[test]
		fn disabled_config_records_nothing() {
			let logger = ActivityLogger::builder()
				.config(ActivityConfig {
					enabled: false,
					..Default::default()
				})
				.handler(Arc::new(Poke))
				.build();
			assert!(logger
				.handle(&Notification::new("gizmo.poked", json!({"id": 4})))
				.is_empty());
		}

		#[test]
		fn notification_actor_fills_draft() {
			let logger = logger();
			let ids = logger.handle(
				&Notification::new("gizmo.poked", json!({"id": 4}))
					.with_actor(crate::record::ActorId::new(9)),
			);
			let record = logger.store().get_record(ids[0]).unwrap().unwrap();
			assert_eq!(record.actor, Some(crate::record::ActorId::new(9)));
		}
	}

	mod hook_bus {
		use super::*;

		#[test]
		fn subscribe_wires_every_event() {
			let logger = Arc::new(logger());
			let mut bus = HookBus::new();
			logger.subscribe(&mut bus);

			assert!(bus.has_subscribers("gizmo.poked"));
			assert!(bus.has_subscribers("gizmo.prodded"));
			assert!(!bus.has_subscribers("gizmo.smashed"));

			let mut scope = RequestScope::new();
			assert_eq!(
				bus.emit(&mut scope, &Notification::new("gizmo.poked", json!({"id": 1}))),
				1
			);
			assert_eq!(scope.recorded().len(), 1);
		}

		#[test]
		fn emit_runs_callbacks_in_order() {
			let calls = Arc::new(AtomicUsize::new(0));
			let mut bus = HookBus::new();
			for expected in 0..3 {
				let calls = Arc::clone(&calls);
				bus.subscribe(
					"tick",
					Arc::new(move |_: &mut RequestScope, _: &Notification| {
						assert_eq!(calls.fetch_add(1, Ordering::SeqCst), expected);
					}),
				);
			}
			let ran = bus.emit(&mut RequestScope::new(), &Notification::new("tick", json!(null)));
			assert_eq!(ran, 3);
			assert_eq!(calls.load(Ordering::SeqCst), 3);
		}
	}

	mod labels {
		use super::*;

		#[test]
		fn build_registers_handler_labels() {
			let logger = logger();
			assert!(logger.registry().contains("gizmo", "poke"));
			assert_eq!(logger.filter_actions("gizmo"), vec!["poke"]);
		}

		#[test]
		fn relabel_overrides_template() {
			let logger = logger();
			logger
				.relabel("gizmo", "poke", "{actor} a stupsé {object}.")
				.unwrap();
			let ids = logger.handle(&Notification::new("gizmo.poked", json!({"id": 4})));

			let page = logger.list(&ActivityQuery::default()).unwrap();
			assert_eq!(page.rows[0].id, ids[0]);
			assert_eq!(page.rows[0].description, "A user a stupsé gizmo 4.");
		}

		#[test]
		fn relabel_rejects_bad_template() {
			assert!(logger().relabel("gizmo", "poke", "{actor").is_err());
		}
	}

	#[test]
	fn list_paginates_and_counts() {
		let logger = logger();
		for id in 1..=5 {
			logger.handle(&Notification::new("gizmo.poked", json!({"id": id})));
		}

		let page = logger
			.list(&ActivityQuery::default().page(2, 2))
			.unwrap();
		assert_eq!(page.total, 5);
		assert_eq!(page.rows.len(), 2);
		assert_eq!(page.offset, 2);
	}
}
