// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Behaviour every [`ActivityStore`] must share.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;

use super::ActivityStore;
use crate::error::StoreError;
use crate::query::{translate_sort, ActivityFilter, ListQuery};
use crate::record::{ActivityId, ActivitySeverity, ActivityStatus, ActorId, RecordFields};

pub(crate) fn at(minute: u32) -> DateTime<Utc> {
	Utc.with_ymd_and_hms(2024, 5, 1, 12, minute, 0).unwrap()
}

pub(crate) fn fields(object_type: &str, action: &str, status: ActivityStatus) -> RecordFields {
	RecordFields {
		object_type: object_type.to_string(),
		object_subtype: None,
		object_id: 1,
		object_name: "thing".to_string(),
		action: action.to_string(),
		actor: None,
		severity: ActivitySeverity::classify(object_type, action),
		timestamp: at(0),
		status,
	}
}

pub(crate) fn run_all(store: &dyn ActivityStore) {
	create_and_get(store);
	pending_is_invisible(store);
	metadata_round_trip(store);
	published_records_are_sealed(store);
	delete_removes_metadata(store);
	list_sorts_and_paginates(store);
	filters_and_counts(store);
}

fn create_and_get(store: &dyn ActivityStore) {
	let mut input = fields("attachment", "create", ActivityStatus::Published);
	input.object_subtype = Some("image/png".to_string());
	input.object_id = 42;
	input.object_name = "cat.png".to_string();
	input.actor = Some(ActorId::new(7));

	let id = store.create_record(input.clone()).unwrap();
	let record = store.get_record(id).unwrap().unwrap();
	assert_eq!(record, input.into_record(id));

	let next = store
		.create_record(fields("post", "create", ActivityStatus::Published))
		.unwrap();
	assert!(next > id, "ids must increase");

	store.delete_record(id).unwrap();
	store.delete_record(next).unwrap();
}

fn pending_is_invisible(store: &dyn ActivityStore) {
	let id = store
		.create_record(fields("post", "create", ActivityStatus::Pending))
		.unwrap();
	assert!(store.get_record(id).unwrap().is_none());
	assert!(store.list_records(&ListQuery::default()).unwrap().is_empty());

	store.publish(id).unwrap();
	assert!(store.get_record(id).unwrap().is_some());

	store.set_status(id, ActivityStatus::Trashed).unwrap();
	assert_eq!(
		store.get_record(id).unwrap().unwrap().status,
		ActivityStatus::Trashed
	);
	assert!(matches!(
		store.set_status(ActivityId::new(999_999), ActivityStatus::Published),
		Err(StoreError::NotFound(_))
	));

	store.delete_record(id).unwrap();
}

fn metadata_round_trip(store: &dyn ActivityStore) {
	let id = store
		.create_record(fields("site_setting", "update", ActivityStatus::Pending))
		.unwrap();
	store
		.attach_metadata(id, "old_value", &json!("Old"))
		.unwrap();
	store
		.attach_metadata(id, "new_value", &json!({"nested": [1, 2]}))
		.unwrap();
	store
		.attach_metadata(id, "old_value", &json!("Older"))
		.unwrap();
	store.publish(id).unwrap();

	let meta = store.get_metadata(id).unwrap();
	assert_eq!(meta.len(), 2);
	assert_eq!(meta.get_str("old_value"), "Older");
	assert_eq!(meta.get("new_value"), Some(&json!({"nested": [1, 2]})));

	assert!(matches!(
		store.attach_metadata(ActivityId::new(999_999), "k", &json!(1)),
		Err(StoreError::NotFound(_))
	));
	assert!(store
		.get_metadata(ActivityId::new(999_999))
		.unwrap()
		.is_empty());

	store.delete_record(id).unwrap();
}

fn published_records_are_sealed(store: &dyn ActivityStore) {
	let id = store
		.create_record(fields("site_setting", "update", ActivityStatus::Pending))
		.unwrap();
	store.attach_metadata(id, "new_value", &json!("New")).unwrap();
	store.publish(id).unwrap();

	assert!(matches!(
		store.attach_metadata(id, "new_value", &json!("Forged")),
		Err(StoreError::Sealed(_))
	));
	assert!(matches!(
		store.attach_metadata(id, "extra", &json!(1)),
		Err(StoreError::Sealed(_))
	));
	let meta = store.get_metadata(id).unwrap();
	assert_eq!(meta.len(), 1);
	assert_eq!(meta.get_str("new_value"), "New");

	assert!(matches!(
		store.set_status(id, ActivityStatus::Pending),
		Err(StoreError::Sealed(_))
	));
	store.set_status(id, ActivityStatus::Trashed).unwrap();
	assert!(matches!(
		store.set_status(id, ActivityStatus::Pending),
		Err(StoreError::Sealed(_))
	));
	assert!(store.get_record(id).unwrap().is_some());

	store.delete_record(id).unwrap();
}

fn delete_removes_metadata(store: &dyn ActivityStore) {
	let id = store
		.create_record(fields("post", "update", ActivityStatus::Pending))
		.unwrap();
	store.attach_metadata(id, "k", &json!("v")).unwrap();
	store.publish(id).unwrap();

	store.delete_record(id).unwrap();
	assert!(store.get_record(id).unwrap().is_none());
	assert!(store.get_metadata(id).unwrap().is_empty());
	assert!(matches!(
		store.delete_record(id),
		Err(StoreError::NotFound(_))
	));
}

fn list_sorts_and_paginates(store: &dyn ActivityStore) {
	let mut ids = Vec::new();
	for (minute, object_type, action, actor) in [
		(1, "user", "delete", 3),
		(2, "post", "create", 1),
		(3, "post", "trash", 2),
	] {
		let mut input = fields(object_type, action, ActivityStatus::Published);
		input.timestamp = at(minute);
		input.actor = Some(ActorId::new(actor));
		ids.push(store.create_record(input).unwrap());
	}

	let list = |orderby: &str, order: &str, limit: u32, offset: u32| -> Vec<ActivityId> {
		store
			.list_records(&ListQuery {
				filter: ActivityFilter::default(),
				sort: translate_sort(Some(orderby), Some(order)),
				limit,
				offset,
			})
			.unwrap()
			.into_iter()
			.map(|r| r.id)
			.collect()
	};

	assert_eq!(list("when", "desc", 10, 0), vec![ids[2], ids[1], ids[0]]);
	assert_eq!(list("date", "ASC", 10, 0), vec![ids[0], ids[1], ids[2]]);
	assert_eq!(list("severity", "asc", 10, 0), vec![ids[1], ids[2], ids[0]]);
	assert_eq!(list("username", "asc", 10, 0), vec![ids[1], ids[2], ids[0]]);
	assert_eq!(list("when", "desc", 2, 1), vec![ids[1], ids[0]]);

	for id in ids {
		store.delete_record(id).unwrap();
	}
}

fn filters_and_counts(store: &dyn ActivityStore) {
	let a = store
		.create_record(fields("post", "create", ActivityStatus::Published))
		.unwrap();
	let b = store
		.create_record(fields("post", "delete", ActivityStatus::Published))
		.unwrap();
	let c = store
		.create_record(fields("user", "login", ActivityStatus::Trashed))
		.unwrap();

	assert_eq!(store.count_records(&ActivityFilter::default()).unwrap(), 2);
	assert_eq!(
		store
			.count_records(&ActivityFilter::new().object_type("post").action("delete"))
			.unwrap(),
		1
	);
	assert_eq!(
		store
			.count_records(&ActivityFilter::new().min_severity(ActivitySeverity::Warning))
			.unwrap(),
		1
	);
	assert_eq!(
		store
			.count_records(&ActivityFilter::new().status(ActivityStatus::Trashed))
			.unwrap(),
		1
	);

	let trashed = store
		.list_records(&ListQuery {
			filter: ActivityFilter::new().status(ActivityStatus::Trashed),
			..Default::default()
		})
		.unwrap();
	assert_eq!(trashed.len(), 1);
	assert_eq!(trashed[0].id, c);

	for id in [a, b, c] {
		store.delete_record(id).unwrap();
	}
}
