// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use thiserror::Error;

use crate::record::ActivityId;

pub type ActivityResult<T> = Result<T, ActivityError>;

#[derive(Error, Debug)]
pub enum ActivityError {
	#[error("validation error: {0}")]
	Validation(String),

	#[error("lookup error: {0}")]
	Lookup(String),

	#[error("storage error: {0}")]
	Storage(#[from] StoreError),

	#[error("malformed payload: {0}")]
	Payload(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum StoreError {
	#[error("activity {0} not found")]
	NotFound(ActivityId),

	#[error("activity {0} is no longer pending")]
	Sealed(ActivityId),

	#[error("backend error: {0}")]
	Backend(String),

	#[cfg(feature = "store-sqlite")]
	#[error("sqlite error: {0}")]
	Sqlite(#[from] rusqlite::Error),

	#[error("serialization error: {0}")]
	Serialization(#[from] serde_json::Error),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
	#[error("unterminated placeholder starting at byte {0}")]
	Unterminated(usize),

	#[error("unmatched '}}' at byte {0}")]
	UnmatchedClose(usize),

	#[error("unknown placeholder '{0}'")]
	UnknownPlaceholder(String),
}
