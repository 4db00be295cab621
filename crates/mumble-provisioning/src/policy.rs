// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use mumble_core::Group;

/// Which directory group bans its members, and the reason recorded.
///
/// With no group configured, ban rows are never touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BanPolicy {
	pub group_id: Option<i64>,
	pub reason: String,
}

impl BanPolicy {
	pub fn new(group_id: i64, reason: impl Into<String>) -> Self {
		Self {
			group_id: Some(group_id),
			reason: reason.into(),
		}
	}

	pub fn disabled() -> Self {
		Self {
			group_id: None,
			reason: String::new(),
		}
	}

	/// `Some(banned)` when a banned group is configured.
	pub fn evaluate(&self, groups: &[Group]) -> Option<bool> {
		self.group_id
			.map(|banned| groups.iter().any(|g| g.id == banned))
	}
}
