// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Results that carry non-fatal failures alongside the value.

use std::fmt;

use mumble_core::{CharacterId, TickerScope};
use serde::Serialize;

/// A side effect that failed without failing the operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PartialFailure {
	/// Recording an organization ticker failed.
	TickerUpsert {
		scope: TickerScope,
		organization_id: i64,
		error: String,
	},
	/// Reading a stored ticker for the display name failed; the name was
	/// built without one.
	TickerLookup { organization_id: i64, error: String },
	/// The password came from the fallback generator.
	WeakSecret { character_id: CharacterId },
}

impl fmt::Display for PartialFailure {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			PartialFailure::TickerUpsert {
				scope,
				organization_id,
				error,
			} => write!(f, "failed to store {scope} ticker for {organization_id}: {error}"),
			PartialFailure::TickerLookup {
				organization_id,
				error,
			} => write!(f, "failed to read ticker for {organization_id}: {error}"),
			PartialFailure::WeakSecret { character_id } => write!(
				f,
				"secret for {character_id} generated without the OS random source"
			),
		}
	}
}

/// The value of a successful operation plus any cosmetic failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled<T> {
	pub value: T,
	pub partial_failures: Vec<PartialFailure>,
}

impl<T> Reconciled<T> {
	pub fn clean(value: T) -> Self {
		Self {
			value,
			partial_failures: Vec::new(),
		}
	}

	pub fn with_failures(value: T, partial_failures: Vec<PartialFailure>) -> Self {
		Self {
			value,
			partial_failures,
		}
	}

	/// No side effect failed.
	pub fn is_clean(&self) -> bool {
		self.partial_failures.is_empty()
	}

	pub fn into_value(self) -> T {
		self.value
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn clean_has_no_failures() {
		let outcome = Reconciled::clean(5);
		assert!(outcome.is_clean());
		assert_eq!(outcome.into_value(), 5);
	}

	#[test]
	fn weak_secret_serializes_with_kind_and_character() {
		let failure = PartialFailure::WeakSecret {
			character_id: CharacterId(3),
		};
		let outcome = Reconciled::with_failures("a", vec![failure.clone()]);
		assert!(!outcome.is_clean());

		let json = serde_json::to_value(&failure).unwrap();
		assert_eq!(json["kind"], "weak_secret");
		assert_eq!(json["character_id"], 3);
		assert_eq!(
			failure.to_string(),
			"secret for 3 generated without the OS random source"
		);
	}

	#[test]
	fn display_names_the_ticker() {
		let failure = PartialFailure::TickerUpsert {
			scope: TickerScope::ParentOrganization,
			organization_id: 99,
			error: "disk full".to_string(),
		};
		assert_eq!(
			failure.to_string(),
			"failed to store parent_organization ticker for 99: disk full"
		);
	}
}
