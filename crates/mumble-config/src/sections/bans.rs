// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Banned group configuration.

use serde::Deserialize;

pub const DEFAULT_BAN_REASON: &str = "banned by directory group";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BansConfig {
	/// Directory group whose members are banned. `None` disables ban sync.
	pub group_id: Option<i64>,
	pub reason: String,
}

impl Default for BansConfig {
	fn default() -> Self {
		Self {
			group_id: None,
			reason: DEFAULT_BAN_REASON.to_string(),
		}
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BansConfigLayer {
	#[serde(default)]
	pub group_id: Option<i64>,
	#[serde(default)]
	pub reason: Option<String>,
}

impl BansConfigLayer {
	pub fn merge(&mut self, other: BansConfigLayer) {
		if other.group_id.is_some() {
			self.group_id = other.group_id;
		}
		if other.reason.is_some() {
			self.reason = other.reason;
		}
	}

	pub fn finalize(self) -> BansConfig {
		BansConfig {
			group_id: self.group_id,
			reason: self
				.reason
				.unwrap_or_else(|| DEFAULT_BAN_REASON.to_string()),
		}
	}
}
