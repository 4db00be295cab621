// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Rows and write requests for the account store.

use chrono::{DateTime, SecondsFormat, Utc};
use mumble_common_secret::SecretString;
use mumble_core::{CharacterId, ServiceAccount};

/// A column update that may leave the stored value alone.
///
/// `Keep` binds as `NULL` and the update statement falls back to the
/// current column value with `COALESCE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldPatch<T> {
	Keep,
	Set(T),
}

impl<T> Default for FieldPatch<T> {
	fn default() -> Self {
		FieldPatch::Keep
	}
}

impl<T> FieldPatch<T> {
	pub fn as_set(&self) -> Option<&T> {
		match self {
			FieldPatch::Keep => None,
			FieldPatch::Set(value) => Some(value),
		}
	}
}

impl FieldPatch<String> {
	/// `Set` for a non-empty value, `Keep` otherwise.
	pub fn non_empty(value: impl Into<String>) -> Self {
		let value = value.into();
		if value.is_empty() {
			FieldPatch::Keep
		} else {
			FieldPatch::Set(value)
		}
	}
}

/// Organization columns as sent by the directory. Always overwritten.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrganizationFields {
	pub organization_id: Option<i64>,
	pub organization_name: Option<String>,
	pub parent_organization_id: Option<i64>,
	pub parent_organization_name: Option<String>,
}

/// A row to insert into `accounts`.
#[derive(Debug, Clone)]
pub struct NewAccount {
	pub character_id: CharacterId,
	pub character_name: String,
	pub login_name: String,
	pub secret: SecretString,
	pub display_name: String,
	pub groups: String,
	pub owner_hash: String,
	pub organization: OrganizationFields,
}

/// Changes to apply to an existing account row.
///
/// `groups` and `organization` always overwrite; the other columns only
/// change when set.
#[derive(Debug, Clone, Default)]
pub struct AccountPatch {
	pub character_name: FieldPatch<String>,
	pub login_name: FieldPatch<String>,
	pub display_name: FieldPatch<String>,
	pub groups: String,
	pub organization: OrganizationFields,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountRecord {
	pub character_id: CharacterId,
	pub character_name: String,
	pub login_name: String,
	pub secret: SecretString,
	pub display_name: String,
	pub groups: String,
	pub owner_hash: String,
	pub organization: OrganizationFields,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl AccountRecord {
	pub fn to_service_account(&self) -> ServiceAccount {
		ServiceAccount::new(self.character_id, &self.login_name, self.secret.clone())
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BanRecord {
	pub character_id: CharacterId,
	pub reason: String,
	pub created_at: DateTime<Utc>,
}

/// Timestamps are stored as RFC 3339 text with microsecond precision so
/// that lexical order matches time order.
pub(crate) fn format_timestamp(at: DateTime<Utc>) -> String {
	at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, crate::error::DbError> {
	DateTime::parse_from_rfc3339(value)
		.map(|dt| dt.with_timezone(&Utc))
		.map_err(|e| crate::error::DbError::InvalidData(format!("timestamp {value:?}: {e}")))
}
