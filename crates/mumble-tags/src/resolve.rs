// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Display name suffix resolution.

use std::collections::HashSet;

use crate::config::{TagConfig, TagRole, CEO_TAG};

/// Suffix shown when no organization tag applies: `" [TICKER]"`.
pub fn ticker_suffix(ticker: Option<&str>) -> Option<String> {
	ticker
		.filter(|t| !t.is_empty())
		.map(|t| format!(" [{t}]"))
}

impl TagConfig {
	/// Compute the display name suffix for a set of held group names.
	///
	/// The suffix is `pronoun`, then `CEO`, then the first organization tag
	/// or, if none is held, `fallback_suffix`.
	pub fn resolve<'a, I>(&self, groups: I, fallback_suffix: Option<&str>) -> String
	where
		I: IntoIterator<Item = &'a str>,
	{
		let held: HashSet<&str> = groups.into_iter().collect();

		let mut pronoun = None;
		let mut ceo = false;
		let mut organization = None;

		for mapping in self.mappings() {
			if !held.contains(mapping.group.as_str()) {
				continue;
			}
			match mapping.role {
				TagRole::Pronoun if pronoun.is_none() => pronoun = Some(mapping.tag.as_str()),
				TagRole::Ceo => ceo = true,
				TagRole::Organization if organization.is_none() => {
					organization = Some(mapping.tag.as_str())
				}
				_ => {}
			}
		}

		let mut suffix = String::new();
		if let Some(tag) = pronoun {
			suffix.push_str(&format!(" ({tag})"));
		}
		if ceo {
			suffix.push_str(&format!(" ({CEO_TAG})"));
		}
		match organization {
			Some(tag) => suffix.push_str(&format!(" ({tag})")),
			None => suffix.push_str(fallback_suffix.unwrap_or("")),
		}
		suffix
	}

	/// `character_name` followed by the resolved suffix, using the
	/// organization ticker as the fallback.
	pub fn display_name<'a, I>(
		&self,
		character_name: &str,
		groups: I,
		organization_ticker: Option<&str>,
	) -> String
	where
		I: IntoIterator<Item = &'a str>,
	{
		let fallback = ticker_suffix(organization_ticker);
		format!(
			"{character_name}{}",
			self.resolve(groups, fallback.as_deref())
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	const NO_GROUPS: [&str; 0] = [];

	fn config() -> TagConfig {
		TagConfig::parse(
			"Leadership: CEO\n\
			 Fleet: Scout\n\
			 Pronouns Them: they/them\n\
			 Industry: Miner\n\
			 Pronouns Her: she/her\n",
		)
	}

	#[test]
	fn ceo_is_shown_alongside_ticker() {
		let config = TagConfig::parse("Leadership: CEO\nFleet: Scout");
		assert_eq!(
			config.display_name("Ari", ["Leadership"], Some("ABC")),
			"Ari (CEO) [ABC]"
		);
	}

	#[test]
	fn organization_tag_replaces_ticker() {
		assert_eq!(
			config().display_name("Ari", ["Fleet"], Some("ABC")),
			"Ari (Scout)"
		);
	}

	#[test]
	fn first_organization_tag_in_config_order_wins() {
		assert_eq!(config().resolve(["Industry", "Fleet"], None), " (Scout)");
	}

	#[test]
	fn first_pronoun_in_config_order_wins() {
		assert_eq!(
			config().resolve(["Pronouns Her", "Pronouns Them"], None),
			" (they/them)"
		);
	}

	#[test]
	fn pronoun_then_ceo_then_organization() {
		assert_eq!(
			config().resolve(["Fleet", "Leadership", "Pronouns Them"], Some(" [ABC]")),
			" (they/them) (CEO) (Scout)"
		);
	}

	#[test]
	fn pronoun_precedes_ticker_fallback() {
		assert_eq!(
			config().display_name("Ari", ["Pronouns Her"], Some("ABC")),
			"Ari (she/her) [ABC]"
		);
	}

	#[test]
	fn no_groups_and_no_ticker_is_bare_name() {
		assert_eq!(config().display_name("Ari", NO_GROUPS, None), "Ari");
		assert_eq!(config().display_name("Ari", NO_GROUPS, Some("")), "Ari");
	}

	#[test]
	fn unknown_groups_are_ignored() {
		assert_eq!(config().resolve(["Nobody"], Some(" [X]")), " [X]");
	}

	#[test]
	fn empty_name_still_gets_suffix() {
		assert_eq!(config().display_name("", ["Fleet"], None), " (Scout)");
		assert_eq!(config().display_name("", NO_GROUPS, None), "");
	}

	proptest! {
		#[test]
		fn resolve_is_deterministic(
			picks in proptest::collection::vec(0usize..6, 0..6),
			ticker in proptest::option::of("[A-Z]{1,5}"),
		) {
			let names = ["Leadership", "Fleet", "Pronouns Them", "Industry", "Pronouns Her", "Other"];
			let groups: Vec<&str> = picks.iter().map(|i| names[*i]).collect();
			let config = config();
			let first = config.display_name("Ari", groups.iter().copied(), ticker.as_deref());
			let second = config.display_name("Ari", groups.iter().rev().copied(), ticker.as_deref());
			prop_assert_eq!(first, second);
		}
	}
}
