// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Directory facts read from JSON files.

use std::path::Path;

use anyhow::Context;
use mumble_core::{Character, Group};
use serde::de::DeserializeOwned;

fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
	let text = std::fs::read_to_string(path)
		.with_context(|| format!("failed to read {}", path.display()))?;
	serde_json::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))
}

pub fn read_character(path: &Path) -> anyhow::Result<Character> {
	read_json(path)
}

pub fn read_characters(path: &Path) -> anyhow::Result<Vec<Character>> {
	read_json(path)
}

/// Groups from `path`, or none when no file was given.
pub fn read_groups(path: Option<&Path>) -> anyhow::Result<Vec<Group>> {
	match path {
		Some(path) => read_json(path),
		None => Ok(Vec::new()),
	}
}
