// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections for the activity recorder.

pub mod activity;
pub mod logging;
pub mod storage;

pub use activity::{ActivityConfig, ActivityConfigLayer};
pub use logging::{LogFormat, LoggingConfig, LoggingConfigLayer};
pub use storage::{StorageBackend, StorageConfig, StorageConfigLayer};
