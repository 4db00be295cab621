// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Login name derivation.
//!
//! Mumble login names are lowercase ASCII made of `[a-z0-9-_]`. A character
//! name is normalized into a base name; collisions are resolved by appending
//! `_1`, `_2`, ... against the account store.

/// Total candidates tried for one base name: the base itself plus `_1`..`_99`.
pub const MAX_LOGIN_NAME_ATTEMPTS: u32 = 100;

/// Map a display name to a login name base.
///
/// ASCII letters are lowercased, digits and `-` are kept, every other ASCII
/// character becomes `_`. Characters outside ASCII have no login-name
/// representation and are dropped.
///
/// ```
/// use mumble_core::normalize;
///
/// assert_eq!(normalize("Jean Luc O'Brien"), "jean_luc_o_brien");
/// assert_eq!(normalize("X Æ A-12"), "x__a-12");
/// ```
pub fn normalize(display_name: &str) -> String {
	display_name
		.chars()
		.filter(char::is_ascii)
		.map(|c| {
			if c.is_ascii_alphanumeric() || c == '-' {
				c.to_ascii_lowercase()
			} else {
				'_'
			}
		})
		.collect()
}

/// Candidate login names for `base`, in the order they must be tried.
pub fn candidates(base: &str) -> impl Iterator<Item = String> + '_ {
	(0..MAX_LOGIN_NAME_ATTEMPTS).map(move |attempt| {
		if attempt == 0 {
			base.to_string()
		} else {
			format!("{base}_{attempt}")
		}
	})
}
