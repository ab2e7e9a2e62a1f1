// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Read-only view of host entities.
//!
//! Many host notifications carry only an identifier. Handlers use a
//! [`HostDirectory`] to capture the entity's current name and type at event
//! time so rendering never needs to look it up again.

use std::collections::HashMap;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::record::ActorId;
use crate::render::{ActorProfile, ActorResolver};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostSnapshot {
	pub id: u64,
	pub title: String,
	pub post_type: String,
	pub status: String,
	/// Set for attachments.
	pub mime_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSnapshot {
	pub id: ActorId,
	pub login: String,
	pub display_name: String,
	pub profile_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermSnapshot {
	pub id: u64,
	pub name: String,
	pub taxonomy: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentSnapshot {
	pub id: u64,
	pub post_id: u64,
	pub author: String,
	pub status: String,
	pub comment_type: String,
}

pub trait HostDirectory: Send + Sync {
	fn post(&self, _id: u64) -> Option<PostSnapshot> {
		None
	}

	fn user(&self, _id: ActorId) -> Option<UserSnapshot> {
		None
	}

	fn term(&self, _id: u64) -> Option<TermSnapshot> {
		None
	}

	fn comment(&self, _id: u64) -> Option<CommentSnapshot> {
		None
	}
}

/// Directory that knows nothing; handlers fall back to payload fields.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyDirectory;

impl HostDirectory for EmptyDirectory {}

impl ActorResolver for EmptyDirectory {
	fn resolve_actor(&self, _id: ActorId) -> Option<ActorProfile> {
		None
	}
}

#[derive(Debug, Default)]
struct Entities {
	posts: HashMap<u64, PostSnapshot>,
	users: HashMap<ActorId, UserSnapshot>,
	terms: HashMap<u64, TermSnapshot>,
	comments: HashMap<u64, CommentSnapshot>,
}

/// Mutable in-memory directory, used by tests and embedded hosts.
#[derive(Debug, Default)]
pub struct MemoryDirectory {
	entities: RwLock<Entities>,
}

impl MemoryDirectory {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn insert_post(&self, post: PostSnapshot) {
		self.entities.write().posts.insert(post.id, post);
	}

	pub fn insert_user(&self, user: UserSnapshot) {
		self.entities.write().users.insert(user.id, user);
	}

	pub fn insert_term(&self, term: TermSnapshot) {
		self.entities.write().terms.insert(term.id, term);
	}

	pub fn insert_comment(&self, comment: CommentSnapshot) {
		self.entities.write().comments.insert(comment.id, comment);
	}

	/// Rename a post in place. Returns `false` if it is unknown.
	pub fn rename_post(&self, id: u64, title: impl Into<String>) -> bool {
		match self.entities.write().posts.get_mut(&id) {
			Some(post) => {
				post.title = title.into();
				true
			}
			None => false,
		}
	}

	pub fn remove_post(&self, id: u64) -> Option<PostSnapshot> {
		self.entities.write().posts.remove(&id)
	}

	pub fn remove_user(&self, id: ActorId) -> Option<UserSnapshot> {
		self.entities.write().users.remove(&id)
	}
}

impl HostDirectory for MemoryDirectory {
	fn post(&self, id: u64) -> Option<PostSnapshot> {
		self.entities.read().posts.get(&id).cloned()
	}

	fn user(&self, id: ActorId) -> Option<UserSnapshot> {
		self.entities.read().users.get(&id).cloned()
	}

	fn term(&self, id: u64) -> Option<TermSnapshot> {
		self.entities.read().terms.get(&id).cloned()
	}

	fn comment(&self, id: u64) -> Option<CommentSnapshot> {
		self.entities.read().comments.get(&id).cloned()
	}
}

impl ActorResolver for MemoryDirectory {
	fn resolve_actor(&self, id: ActorId) -> Option<ActorProfile> {
		self.user(id).map(|user| ActorProfile {
			id: user.id,
			display_name: user.display_name,
			profile_url: user.profile_url,
		})
	}
}
