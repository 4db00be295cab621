// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Directory facts about a character and its group memberships.

use serde::{Deserialize, Serialize};

/// Directory-assigned character id. Never generated locally.
#[derive(
	Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CharacterId(pub i64);

impl CharacterId {
	pub fn get(self) -> i64 {
		self.0
	}
}

impl std::fmt::Display for CharacterId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// A character as reported by the directory.
///
/// Any field except `id` may be missing on a partial sync; the engine never
/// lets a missing value overwrite a stored one where that would lose data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
	pub id: CharacterId,
	#[serde(default)]
	pub name: Option<String>,
	/// Ownership marker: changes when the character moves to another player.
	#[serde(default)]
	pub owner_hash: Option<String>,
	#[serde(default)]
	pub organization_id: Option<i64>,
	#[serde(default)]
	pub organization_name: Option<String>,
	#[serde(default)]
	pub organization_ticker: Option<String>,
	#[serde(default)]
	pub parent_organization_id: Option<i64>,
	#[serde(default)]
	pub parent_organization_name: Option<String>,
	#[serde(default)]
	pub parent_organization_ticker: Option<String>,
}

impl Character {
	pub fn new(id: i64, name: impl Into<String>) -> Self {
		Self {
			id: CharacterId(id),
			name: Some(name.into()),
			..Default::default()
		}
	}

	pub fn with_owner_hash(mut self, owner_hash: impl Into<String>) -> Self {
		self.owner_hash = Some(owner_hash.into());
		self
	}

	pub fn with_organization(
		mut self,
		id: i64,
		name: impl Into<String>,
		ticker: impl Into<String>,
	) -> Self {
		self.organization_id = Some(id);
		self.organization_name = Some(name.into());
		self.organization_ticker = Some(ticker.into());
		self
	}

	pub fn with_parent_organization(
		mut self,
		id: i64,
		name: impl Into<String>,
		ticker: impl Into<String>,
	) -> Self {
		self.parent_organization_id = Some(id);
		self.parent_organization_name = Some(name.into());
		self.parent_organization_ticker = Some(ticker.into());
		self
	}

	/// The character name, or `""` when the directory did not send one.
	pub fn name(&self) -> &str {
		self.name.as_deref().unwrap_or("")
	}

	pub fn has_name(&self) -> bool {
		!self.name().is_empty()
	}

	/// Ownership marker if present and non-empty.
	pub fn owner_hash(&self) -> Option<&str> {
		self.owner_hash.as_deref().filter(|h| !h.is_empty())
	}

	/// Ticker entries to record for this character.
	///
	/// A level is skipped when either its id or its ticker is missing.
	pub fn tickers(&self) -> Vec<(TickerScope, i64, &str)> {
		[
			(
				TickerScope::Organization,
				self.organization_id,
				self.organization_ticker.as_deref(),
			),
			(
				TickerScope::ParentOrganization,
				self.parent_organization_id,
				self.parent_organization_ticker.as_deref(),
			),
		]
		.into_iter()
		.filter_map(|(scope, id, ticker)| match (id, ticker) {
			(Some(id), Some(ticker)) if id != 0 && !ticker.is_empty() => Some((scope, id, ticker)),
			_ => None,
		})
		.collect()
	}
}

/// A directory group the character belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Group {
	pub id: i64,
	pub name: String,
}

impl Group {
	pub fn new(id: i64, name: impl Into<String>) -> Self {
		Self {
			id,
			name: name.into(),
		}
	}
}

/// Flatten group names into the stored comma-separated form.
pub fn flatten_group_names(groups: &[Group]) -> String {
	groups
		.iter()
		.map(|g| g.name.as_str())
		.collect::<Vec<_>>()
		.join(",")
}

/// Organization level a ticker belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TickerScope {
	Organization,
	ParentOrganization,
}

impl std::fmt::Display for TickerScope {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			TickerScope::Organization => write!(f, "organization"),
			TickerScope::ParentOrganization => write!(f, "parent_organization"),
		}
	}
}
