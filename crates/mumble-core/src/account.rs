// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use mumble_common_secret::SecretString;
use serde::Serialize;

use crate::character::CharacterId;

/// Credentials a character uses to log in to Mumble.
///
/// `secret` serializes as `[REDACTED]`; call `secret.expose()` to hand the
/// password to the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceAccount {
	pub character_id: CharacterId,
	pub login_name: String,
	pub secret: SecretString,
}

impl ServiceAccount {
	pub fn new(
		character_id: CharacterId,
		login_name: impl Into<String>,
		secret: SecretString,
	) -> Self {
		Self {
			character_id,
			login_name: login_name.into(),
			secret,
		}
	}
}
