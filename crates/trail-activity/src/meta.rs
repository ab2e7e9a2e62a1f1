// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Structured context attached to an activity record.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Key/value metadata stored alongside one activity record.
///
/// Values are never validated; readers must tolerate missing or oddly typed
/// entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityMeta(BTreeMap<String, Value>);

impl ActivityMeta {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
		self.0.insert(key.into(), value.into())
	}

	pub fn get(&self, key: &str) -> Option<&Value> {
		self.0.get(key)
	}

	/// Returns the value under `key` as display text, or an empty string.
	///
	/// Strings are returned verbatim, numbers and booleans in their JSON form,
	/// and `null` or missing keys as `""`.
	pub fn get_str(&self, key: &str) -> String {
		match self.0.get(key) {
			None | Some(Value::Null) => String::new(),
			Some(Value::String(s)) => s.clone(),
			Some(other) => other.to_string(),
		}
	}

	pub fn contains_key(&self, key: &str) -> bool {
		self.0.contains_key(key)
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
		self.0.iter()
	}
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ActivityMeta {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		Self(
			iter
				.into_iter()
				.map(|(k, v)| (k.into(), v.into()))
				.collect(),
		)
	}
}

impl IntoIterator for ActivityMeta {
	type Item = (String, Value);
	type IntoIter = std::collections::btree_map::IntoIter<String, Value>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.into_iter()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn get_str_handles_every_shape() {
		let meta: ActivityMeta = [
			("name", json!("cat.png")),
			("count", json!(3)),
			("flag", json!(true)),
			("nothing", Value::Null),
			("list", json!(["a", "b"])),
		]
		.into_iter()
		.collect();

		assert_eq!(meta.get_str("name"), "cat.png");
		assert_eq!(meta.get_str("count"), "3");
		assert_eq!(meta.get_str("flag"), "true");
		assert_eq!(meta.get_str("nothing"), "");
		assert_eq!(meta.get_str("missing"), "");
		assert_eq!(meta.get_str("list"), "[\"a\",\"b\"]");
	}

	#[test]
	fn insert_replaces_existing_value() {
		let mut meta = ActivityMeta::new();
		assert!(meta.insert("old_value", "Old").is_none());
		assert_eq!(meta.insert("old_value", "Older"), Some(json!("Old")));
		assert_eq!(meta.len(), 1);
	}

	#[test]
	fn serializes_as_plain_object() {
		let mut meta = ActivityMeta::new();
		meta.insert("new_value", "New");
		assert_eq!(
			serde_json::to_value(&meta).unwrap(),
			json!({"new_value": "New"})
		);
	}
}
