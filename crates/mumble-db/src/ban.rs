// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Ban relation: a row exists exactly while the character holds the banned
//! group.

use chrono::Utc;
use mumble_core::CharacterId;
use sqlx::Row;

use crate::account::AccountRepository;
use crate::error::DbError;
use crate::types::{format_timestamp, parse_timestamp, BanRecord};

impl AccountRepository {
	/// Insert a ban unless one exists. Returns `true` if a row was added.
	#[tracing::instrument(skip(self, reason), fields(character_id = %id))]
	pub async fn ensure_ban(&self, id: CharacterId, reason: &str) -> Result<bool, DbError> {
		let result = sqlx::query(
			r#"
			INSERT INTO bans (character_id, reason, created_at)
			VALUES (?, ?, ?)
			ON CONFLICT(character_id) DO NOTHING
			"#,
		)
		.bind(id.get())
		.bind(reason)
		.bind(format_timestamp(Utc::now()))
		.execute(&self.pool)
		.await?;

		let inserted = result.rows_affected() > 0;
		if inserted {
			tracing::debug!("ban added");
		}
		Ok(inserted)
	}

	/// Delete a ban if present. Returns `true` if a row was removed.
	#[tracing::instrument(skip(self), fields(character_id = %id))]
	pub async fn remove_ban(&self, id: CharacterId) -> Result<bool, DbError> {
		let result = sqlx::query("DELETE FROM bans WHERE character_id = ?")
			.bind(id.get())
			.execute(&self.pool)
			.await?;

		let removed = result.rows_affected() > 0;
		if removed {
			tracing::debug!("ban removed");
		}
		Ok(removed)
	}

	#[tracing::instrument(skip(self), fields(character_id = %id))]
	pub async fn get_ban(&self, id: CharacterId) -> Result<Option<BanRecord>, DbError> {
		let row = sqlx::query("SELECT character_id, reason, created_at FROM bans WHERE character_id = ?")
			.bind(id.get())
			.fetch_optional(&self.pool)
			.await?;

		match row {
			Some(row) => {
				let created_at: String = row.try_get("created_at")?;
				Ok(Some(BanRecord {
					character_id: CharacterId(row.try_get("character_id")?),
					reason: row.try_get("reason")?,
					created_at: parse_timestamp(&created_at)?,
				}))
			}
			None => Ok(None),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::create_test_pool;

	#[tokio::test]
	async fn ensure_is_insert_if_absent() {
		let repo = AccountRepository::new(create_test_pool().await.unwrap());
		assert!(repo.ensure_ban(CharacterId(1), "first").await.unwrap());
		assert!(!repo.ensure_ban(CharacterId(1), "second").await.unwrap());

		let ban = repo.get_ban(CharacterId(1)).await.unwrap().unwrap();
		assert_eq!(ban.reason, "first");

		let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM bans")
			.fetch_one(repo.pool())
			.await
			.unwrap();
		assert_eq!(count, 1);
	}

	#[tokio::test]
	async fn remove_is_delete_if_present() {
		let repo = AccountRepository::new(create_test_pool().await.unwrap());
		assert!(!repo.remove_ban(CharacterId(1)).await.unwrap());

		repo.ensure_ban(CharacterId(1), "banned").await.unwrap();
		assert!(repo.remove_ban(CharacterId(1)).await.unwrap());
		assert!(repo.get_ban(CharacterId(1)).await.unwrap().is_none());
	}
}
