// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Location of the `group: tag` file.

use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagsConfig {
	/// No file means no tags: display names fall back to the ticker.
	pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TagsConfigLayer {
	#[serde(default)]
	pub file: Option<PathBuf>,
}

impl TagsConfigLayer {
	pub fn merge(&mut self, other: TagsConfigLayer) {
		if other.file.is_some() {
			self.file = other.file;
		}
	}

	pub fn finalize(self) -> TagsConfig {
		TagsConfig { file: self.file }
	}
}
