// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::path::Path;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::types::Value as SqlValue;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use serde_json::Value;
use tracing::debug;

use super::{ActivityStore, MetaStore};
use crate::error::StoreError;
use crate::meta::ActivityMeta;
use crate::query::{ActivityFilter, ListQuery};
use crate::record::{
	ActivityId, ActivityRecord, ActivitySeverity, ActivityStatus, ActorId, RecordFields,
};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS activities (
	id INTEGER PRIMARY KEY AUTOINCREMENT,
	object_type TEXT NOT NULL,
	object_subtype TEXT,
	object_id INTEGER NOT NULL,
	object_name TEXT NOT NULL,
	action TEXT NOT NULL,
	actor_id INTEGER,
	severity TEXT NOT NULL,
	severity_level INTEGER NOT NULL,
	created_at TEXT NOT NULL,
	status TEXT NOT NULL CHECK (status IN ('pending', 'published', 'trashed'))
);
CREATE INDEX IF NOT EXISTS idx_activities_status_created ON activities (status, created_at);
CREATE INDEX IF NOT EXISTS idx_activities_object ON activities (object_type, object_id);
CREATE TABLE IF NOT EXISTS activity_meta (
	activity_id INTEGER NOT NULL REFERENCES activities (id) ON DELETE CASCADE,
	meta_key TEXT NOT NULL,
	meta_value TEXT NOT NULL,
	PRIMARY KEY (activity_id, meta_key)
);
"#;

const SELECT_COLUMNS: &str = "id, object_type, object_subtype, object_id, object_name, action, \
	 actor_id, severity, created_at, status";

/// SQLite-backed store. One connection guarded by a mutex.
pub struct SqliteActivityStore {
	conn: Mutex<Connection>,
}

impl SqliteActivityStore {
	pub fn open(path: &Path) -> Result<Self, StoreError> {
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			std::fs::create_dir_all(parent).map_err(|e| {
				StoreError::Backend(format!("create db parent dir {}: {e}", parent.display()))
			})?;
		}
		debug!(path = %path.display(), "opening sqlite activity store");
		Self::from_connection(Connection::open(path)?)
	}

	pub fn open_in_memory() -> Result<Self, StoreError> {
		Self::from_connection(Connection::open_in_memory()?)
	}

	fn from_connection(conn: Connection) -> Result<Self, StoreError> {
		conn.pragma_update(None, "foreign_keys", true)?;
		conn.execute_batch(SCHEMA)?;
		Ok(Self {
			conn: Mutex::new(conn),
		})
	}
}

/// Column values as read, before enum parsing.
struct RawRow {
	id: i64,
	object_type: String,
	object_subtype: Option<String>,
	object_id: i64,
	object_name: String,
	action: String,
	actor_id: Option<i64>,
	severity: String,
	created_at: DateTime<Utc>,
	status: String,
}

impl RawRow {
	fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
		Ok(Self {
			id: row.get(0)?,
			object_type: row.get(1)?,
			object_subtype: row.get(2)?,
			object_id: row.get(3)?,
			object_name: row.get(4)?,
			action: row.get(5)?,
			actor_id: row.get(6)?,
			severity: row.get(7)?,
			created_at: row.get(8)?,
			status: row.get(9)?,
		})
	}

	fn into_record(self) -> Result<ActivityRecord, StoreError> {
		Ok(ActivityRecord {
			id: ActivityId::new(self.id as u64),
			object_type: self.object_type,
			object_subtype: self.object_subtype,
			object_id: self.object_id as u64,
			object_name: self.object_name,
			action: self.action,
			actor: self.actor_id.map(|a| ActorId::new(a as u64)),
			severity: self
				.severity
				.parse::<ActivitySeverity>()
				.map_err(StoreError::Backend)?,
			timestamp: self.created_at,
			status: self
				.status
				.parse::<ActivityStatus>()
				.map_err(StoreError::Backend)?,
		})
	}
}

fn sql_id(id: ActivityId) -> i64 {
	id.get() as i64
}

/// Build the WHERE clause and bound values for a filter.
fn where_clause(filter: &ActivityFilter) -> (String, Vec<SqlValue>) {
	let mut conditions = vec!["status = ?".to_string()];
	let mut values = vec![SqlValue::Text(filter.status.as_str().to_string())];

	if let Some(object_type) = &filter.object_type {
		conditions.push("object_type = ?".to_string());
		values.push(SqlValue::Text(object_type.clone()));
	}
	if let Some(action) = &filter.action {
		conditions.push("action = ?".to_string());
		values.push(SqlValue::Text(action.clone()));
	}
	if let Some(actor) = filter.actor {
		conditions.push("actor_id = ?".to_string());
		values.push(SqlValue::Integer(actor.get() as i64));
	}
	if let Some(object_id) = filter.object_id {
		conditions.push("object_id = ?".to_string());
		values.push(SqlValue::Integer(object_id as i64));
	}
	if let Some(severity) = filter.min_severity {
		conditions.push("severity_level >= ?".to_string());
		values.push(SqlValue::Integer(i64::from(severity.level())));
	}

	(conditions.join(" AND "), values)
}

/// Status of any record, pending included. `NotFound` when absent.
fn current_status(conn: &Connection, id: ActivityId) -> Result<ActivityStatus, StoreError> {
	let status: Option<String> = conn
		.query_row(
			"SELECT status FROM activities WHERE id = ?1",
			params![sql_id(id)],
			|row| row.get(0),
		)
		.optional()?;
	status
		.ok_or(StoreError::NotFound(id))?
		.parse::<ActivityStatus>()
		.map_err(StoreError::Backend)
}

impl MetaStore for SqliteActivityStore {
	fn attach_metadata(&self, id: ActivityId, key: &str, value: &Value) -> Result<(), StoreError> {
		let encoded = serde_json::to_string(value)?;
		let conn = self.conn.lock();
		if current_status(&conn, id)? != ActivityStatus::Pending {
			return Err(StoreError::Sealed(id));
		}

		conn.execute(
			"INSERT INTO activity_meta (activity_id, meta_key, meta_value) VALUES (?1, ?2, ?3)
			 ON CONFLICT (activity_id, meta_key) DO UPDATE SET meta_value = excluded.meta_value",
			params![sql_id(id), key, encoded],
		)?;
		Ok(())
	}

	fn get_metadata(&self, id: ActivityId) -> Result<ActivityMeta, StoreError> {
		let conn = self.conn.lock();
		let mut stmt = conn.prepare(
			"SELECT meta_key, meta_value FROM activity_meta \
			 WHERE activity_id = ?1 ORDER BY meta_key",
		)?;
		let rows = stmt
			.query_map(params![sql_id(id)], |row| {
				Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
			})?
			.collect::<Result<Vec<_>, _>>()?;

		let mut meta = ActivityMeta::new();
		for (key, raw) in rows {
			let value = serde_json::from_str(&raw).unwrap_or(Value::String(raw));
			meta.insert(key, value);
		}
		Ok(meta)
	}
}

impl ActivityStore for SqliteActivityStore {
	fn name(&self) -> &str {
		"sqlite"
	}

	fn create_record(&self, fields: RecordFields) -> Result<ActivityId, StoreError> {
		let conn = self.conn.lock();
		conn.execute(
			"INSERT INTO activities (
				object_type, object_subtype, object_id, object_name, action,
				actor_id, severity, severity_level, created_at, status
			) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
			params![
				fields.object_type,
				fields.object_subtype,
				fields.object_id as i64,
				fields.object_name,
				fields.action,
				fields.actor.map(|a| a.get() as i64),
				fields.severity.as_str(),
				i64::from(fields.severity.level()),
				fields.timestamp,
				fields.status.as_str(),
			],
		)?;
		Ok(ActivityId::new(conn.last_insert_rowid() as u64))
	}

	fn set_status(&self, id: ActivityId, status: ActivityStatus) -> Result<(), StoreError> {
		let conn = self.conn.lock();
		let current = current_status(&conn, id)?;
		if status == ActivityStatus::Pending && current != ActivityStatus::Pending {
			return Err(StoreError::Sealed(id));
		}
		conn.execute(
			"UPDATE activities SET status = ?2 WHERE id = ?1",
			params![sql_id(id), status.as_str()],
		)?;
		Ok(())
	}

	fn get_record(&self, id: ActivityId) -> Result<Option<ActivityRecord>, StoreError> {
		let conn = self.conn.lock();
		let raw = conn
			.query_row(
				&format!(
					"SELECT {SELECT_COLUMNS} FROM activities \
					 WHERE id = ?1 AND status != 'pending'"
				),
				params![sql_id(id)],
				RawRow::from_row,
			)
			.optional()?;
		raw.map(RawRow::into_record).transpose()
	}

	fn list_records(&self, query: &ListQuery) -> Result<Vec<ActivityRecord>, StoreError> {
		let (where_sql, mut values) = where_clause(&query.filter);
		let direction = query.sort.direction.as_sql();
		let sql = format!(
			"SELECT {SELECT_COLUMNS} FROM activities WHERE {where_sql} \
			 ORDER BY {} {direction}, id {direction} LIMIT ? OFFSET ?",
			query.sort.field.column(),
		);
		values.push(SqlValue::Integer(i64::from(query.limit)));
		values.push(SqlValue::Integer(i64::from(query.offset)));

		let conn = self.conn.lock();
		let mut stmt = conn.prepare(&sql)?;
		let rows = stmt
			.query_map(params_from_iter(values.iter()), RawRow::from_row)?
			.collect::<Result<Vec<_>, _>>()?;
		rows.into_iter().map(RawRow::into_record).collect()
	}

	fn count_records(&self, filter: &ActivityFilter) -> Result<u64, StoreError> {
		let (where_sql, values) = where_clause(filter);
		let count: i64 = self.conn.lock().query_row(
			&format!("SELECT COUNT(*) FROM activities WHERE {where_sql}"),
			params_from_iter(values.iter()),
			|row| row.get(0),
		)?;
		Ok(count as u64)
	}

	fn delete_record(&self, id: ActivityId) -> Result<(), StoreError> {
		let mut conn = self.conn.lock();
		let tx = conn.transaction()?;
		tx.execute(
			"DELETE FROM activity_meta WHERE activity_id = ?1",
			params![sql_id(id)],
		)?;
		let deleted = tx.execute("DELETE FROM activities WHERE id = ?1", params![sql_id(id)])?;
		if deleted == 0 {
			return Err(StoreError::NotFound(id));
		}
		tx.commit()?;
		Ok(())
	}
}
