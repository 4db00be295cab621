// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Parsing of the `group: tag` configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, TagsError};

/// Tags recognised as pronouns (compared case-insensitively).
pub const PRONOUN_TAGS: &[&str] = &[
	"he/him",
	"she/her",
	"they/them",
	"he/they",
	"she/they",
	"it/its",
	"any/all",
	"ask me",
];

/// Tag that marks the role flag shown next to every other tag.
pub const CEO_TAG: &str = "CEO";

/// The part a tag plays in the display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagRole {
	Pronoun,
	Ceo,
	Organization,
}

impl TagRole {
	pub fn classify(tag: &str) -> Self {
		if tag.eq_ignore_ascii_case(CEO_TAG) {
			TagRole::Ceo
		} else if PRONOUN_TAGS.iter().any(|p| p.eq_ignore_ascii_case(tag)) {
			TagRole::Pronoun
		} else {
			TagRole::Organization
		}
	}
}

impl std::fmt::Display for TagRole {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			TagRole::Pronoun => write!(f, "pronoun"),
			TagRole::Ceo => write!(f, "ceo"),
			TagRole::Organization => write!(f, "organization"),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagMapping {
	pub group: String,
	pub tag: String,
	pub role: TagRole,
}

/// Ordered group to tag mapping.
///
/// Built once and never mutated; configuration changes require building a
/// new value. Order of the source lines is preserved and decides which tag
/// wins within a role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagConfig {
	mappings: Vec<TagMapping>,
}

impl TagConfig {
	/// Parse `group: tag` lines.
	///
	/// Lines are split at the first `:`. Blank lines, lines without a `:`
	/// and lines whose group or tag is empty after trimming are skipped.
	pub fn parse(text: &str) -> Self {
		let mappings: Vec<TagMapping> = text
			.lines()
			.filter_map(|line| {
				let (group, tag) = line.split_once(':')?;
				let (group, tag) = (group.trim(), tag.trim());
				if group.is_empty() || tag.is_empty() {
					return None;
				}
				Some(TagMapping {
					group: group.to_string(),
					tag: tag.to_string(),
					role: TagRole::classify(tag),
				})
			})
			.collect();

		debug!(mappings = mappings.len(), "parsed tag configuration");
		Self { mappings }
	}

	/// Read and parse a tag configuration file.
	pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let text = std::fs::read_to_string(path).map_err(|e| TagsError::FileRead {
			path: path.to_path_buf(),
			source: e,
		})?;
		debug!(path = %path.display(), "loading tag configuration");
		Ok(Self::parse(&text))
	}

	pub fn mappings(&self) -> &[TagMapping] {
		&self.mappings
	}

	pub fn is_empty(&self) -> bool {
		self.mappings.is_empty()
	}

	pub fn len(&self) -> usize {
		self.mappings.len()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	#[test]
	fn parses_lines_in_order() {
		let config = TagConfig::parse("Leadership: CEO\nFleet: Scout\nPronouns Them: they/them\n");
		let groups: Vec<&str> = config.mappings().iter().map(|m| m.group.as_str()).collect();
		assert_eq!(groups, vec!["Leadership", "Fleet", "Pronouns Them"]);
		assert_eq!(config.mappings()[0].role, TagRole::Ceo);
		assert_eq!(config.mappings()[1].role, TagRole::Organization);
		assert_eq!(config.mappings()[2].role, TagRole::Pronoun);
	}

	#[test]
	fn skips_blank_and_malformed_lines() {
		let text = "\n   \nno separator here\n: orphan tag\nlonely group:   \n  Fleet  :  Scout  \n";
		let config = TagConfig::parse(text);
		assert_eq!(config.len(), 1);
		assert_eq!(config.mappings()[0].group, "Fleet");
		assert_eq!(config.mappings()[0].tag, "Scout");
	}

	#[test]
	fn splits_at_first_colon() {
		let config = TagConfig::parse("Fleet: Scout: Wing");
		assert_eq!(config.mappings()[0].tag, "Scout: Wing");
	}

	#[test]
	fn handles_crlf_line_endings() {
		let config = TagConfig::parse("Fleet: Scout\r\nLeadership: CEO\r\n");
		assert_eq!(config.len(), 2);
		assert_eq!(config.mappings()[0].tag, "Scout");
	}

	#[test]
	fn classifies_case_insensitively() {
		assert_eq!(TagRole::classify("ceo"), TagRole::Ceo);
		assert_eq!(TagRole::classify("They/Them"), TagRole::Pronoun);
		assert_eq!(TagRole::classify("Ask Me"), TagRole::Pronoun);
		assert_eq!(TagRole::classify("Scout"), TagRole::Organization);
	}

	#[test]
	fn empty_text_is_empty_config() {
		assert!(TagConfig::parse("").is_empty());
	}

	#[test]
	fn loads_from_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "Fleet: Scout").unwrap();
		writeln!(file, "Leadership: CEO").unwrap();

		let config = TagConfig::from_file(file.path()).unwrap();
		assert_eq!(config.len(), 2);
	}

	#[test]
	fn missing_file_is_an_error() {
		let dir = tempfile::tempdir().unwrap();
		let err = TagConfig::from_file(dir.path().join("missing.txt")).unwrap_err();
		assert!(matches!(err, TagsError::FileRead { .. }));
	}
}
