// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Account repository.
//!
//! One row per directory character. Rows are created by registration and
//! mutated by reconciliation and password resets; they are never deleted.
//! The ticker and ban relations live in [`crate::ticker`] and [`crate::ban`]
//! but are reached through the same [`AccountStore`] handle.

use async_trait::async_trait;
use chrono::Utc;
use mumble_common_secret::SecretString;
use mumble_core::{CharacterId, TickerScope};
use sqlx::{
	sqlite::{SqlitePool, SqliteRow},
	QueryBuilder, Row, Sqlite,
};

use crate::error::{map_write_error, DbError};
use crate::types::{
	format_timestamp, parse_timestamp, AccountPatch, AccountRecord, BanRecord, NewAccount,
	OrganizationFields,
};

const ACCOUNT_COLUMNS: &str = "character_id, character_name, login_name, secret, display_name, \
	groups, owner_hash, organization_id, organization_name, parent_organization_id, \
	parent_organization_name, created_at, updated_at";

#[async_trait]
pub trait AccountStore: Send + Sync {
	async fn get_account(&self, id: CharacterId) -> Result<Option<AccountRecord>, DbError>;
	async fn get_accounts(&self, ids: &[CharacterId]) -> Result<Vec<AccountRecord>, DbError>;
	async fn is_login_name_taken(&self, login_name: &str) -> Result<bool, DbError>;
	async fn create_account(&self, account: &NewAccount) -> Result<(), DbError>;
	async fn update_account(&self, id: CharacterId, patch: &AccountPatch) -> Result<bool, DbError>;
	async fn rotate_secret(
		&self,
		id: CharacterId,
		owner_hash: &str,
		secret: &SecretString,
	) -> Result<bool, DbError>;
	async fn update_secret(&self, id: CharacterId, secret: &SecretString) -> Result<bool, DbError>;
	async fn list_account_ids(&self) -> Result<Vec<CharacterId>, DbError>;
	async fn upsert_ticker(
		&self,
		scope: TickerScope,
		organization_id: i64,
		ticker: &str,
	) -> Result<(), DbError>;
	async fn get_ticker(
		&self,
		scope: TickerScope,
		organization_id: i64,
	) -> Result<Option<String>, DbError>;
	async fn ensure_ban(&self, id: CharacterId, reason: &str) -> Result<bool, DbError>;
	async fn remove_ban(&self, id: CharacterId) -> Result<bool, DbError>;
	async fn get_ban(&self, id: CharacterId) -> Result<Option<BanRecord>, DbError>;
}

#[async_trait]
impl AccountStore for AccountRepository {
	async fn get_account(&self, id: CharacterId) -> Result<Option<AccountRecord>, DbError> {
		self.get_account(id).await
	}

	async fn get_accounts(&self, ids: &[CharacterId]) -> Result<Vec<AccountRecord>, DbError> {
		self.get_accounts(ids).await
	}

	async fn is_login_name_taken(&self, login_name: &str) -> Result<bool, DbError> {
		self.is_login_name_taken(login_name).await
	}

	async fn create_account(&self, account: &NewAccount) -> Result<(), DbError> {
		self.create_account(account).await
	}

	async fn update_account(&self, id: CharacterId, patch: &AccountPatch) -> Result<bool, DbError> {
		self.update_account(id, patch).await
	}

	async fn rotate_secret(
		&self,
		id: CharacterId,
		owner_hash: &str,
		secret: &SecretString,
	) -> Result<bool, DbError> {
		self.rotate_secret(id, owner_hash, secret).await
	}

	async fn update_secret(&self, id: CharacterId, secret: &SecretString) -> Result<bool, DbError> {
		self.update_secret(id, secret).await
	}

	async fn list_account_ids(&self) -> Result<Vec<CharacterId>, DbError> {
		self.list_account_ids().await
	}

	async fn upsert_ticker(
		&self,
		scope: TickerScope,
		organization_id: i64,
		ticker: &str,
	) -> Result<(), DbError> {
		self.upsert_ticker(scope, organization_id, ticker).await
	}

	async fn get_ticker(
		&self,
		scope: TickerScope,
		organization_id: i64,
	) -> Result<Option<String>, DbError> {
		self.get_ticker(scope, organization_id).await
	}

	async fn ensure_ban(&self, id: CharacterId, reason: &str) -> Result<bool, DbError> {
		self.ensure_ban(id, reason).await
	}

	async fn remove_ban(&self, id: CharacterId) -> Result<bool, DbError> {
		self.remove_ban(id).await
	}

	async fn get_ban(&self, id: CharacterId) -> Result<Option<BanRecord>, DbError> {
		self.get_ban(id).await
	}
}

/// Repository for account, ticker and ban rows.
#[derive(Clone)]
pub struct AccountRepository {
	pub(crate) pool: SqlitePool,
}

impl AccountRepository {
	/// Create a new account repository with the given pool.
	///
	/// # Arguments
	/// * `pool` - SQLite connection pool with migrations applied
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	pub fn pool(&self) -> &SqlitePool {
		&self.pool
	}

	#[tracing::instrument(skip(self), fields(character_id = %id))]
	pub async fn get_account(&self, id: CharacterId) -> Result<Option<AccountRecord>, DbError> {
		let row = sqlx::query(&format!(
			"SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE character_id = ?"
		))
		.bind(id.get())
		.fetch_optional(&self.pool)
		.await?;

		row.as_ref().map(parse_account_row).transpose()
	}

	/// Fetch every requested account in one query.
	///
	/// Ids with no row are absent from the result; the result follows no
	/// particular order.
	#[tracing::instrument(skip(self, ids), fields(requested = ids.len()))]
	pub async fn get_accounts(&self, ids: &[CharacterId]) -> Result<Vec<AccountRecord>, DbError> {
		if ids.is_empty() {
			return Ok(Vec::new());
		}

		let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
			"SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE character_id IN ("
		));
		let mut separated = builder.separated(", ");
		for id in ids {
			separated.push_bind(id.get());
		}
		separated.push_unseparated(")");

		let rows = builder.build().fetch_all(&self.pool).await?;
		let accounts = rows
			.iter()
			.map(parse_account_row)
			.collect::<Result<Vec<_>, _>>()?;

		tracing::debug!(found = accounts.len(), "accounts fetched");
		Ok(accounts)
	}

	#[tracing::instrument(skip(self))]
	pub async fn is_login_name_taken(&self, login_name: &str) -> Result<bool, DbError> {
		let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM accounts WHERE login_name = ?")
			.bind(login_name)
			.fetch_one(&self.pool)
			.await?;
		Ok(count > 0)
	}

	/// Insert a new account with `created_at = updated_at = now`.
	///
	/// # Errors
	/// - `DbError::LoginNameTaken` if another row holds `login_name`
	/// - `DbError::Conflict` if the character is already registered
	#[tracing::instrument(
		skip(self, account),
		fields(character_id = %account.character_id, login_name = %account.login_name)
	)]
	pub async fn create_account(&self, account: &NewAccount) -> Result<(), DbError> {
		let now = format_timestamp(Utc::now());

		sqlx::query(
			r#"
			INSERT INTO accounts (
				character_id, character_name, login_name, secret, display_name, groups,
				owner_hash, organization_id, organization_name, parent_organization_id,
				parent_organization_name, created_at, updated_at
			) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(account.character_id.get())
		.bind(&account.character_name)
		.bind(&account.login_name)
		.bind(account.secret.expose())
		.bind(&account.display_name)
		.bind(&account.groups)
		.bind(&account.owner_hash)
		.bind(account.organization.organization_id)
		.bind(&account.organization.organization_name)
		.bind(account.organization.parent_organization_id)
		.bind(&account.organization.parent_organization_name)
		.bind(&now)
		.bind(&now)
		.execute(&self.pool)
		.await
		.map_err(|e| map_write_error(e, Some(&account.login_name)))?;

		tracing::debug!("account created");
		Ok(())
	}

	/// Apply `patch` to an existing row.
	///
	/// Returns `false` when no row exists for `id`.
	///
	/// # Errors
	/// `DbError::LoginNameTaken` if the patch sets a login name held by
	/// another row.
	#[tracing::instrument(skip(self, patch), fields(character_id = %id))]
	pub async fn update_account(&self, id: CharacterId, patch: &AccountPatch) -> Result<bool, DbError> {
		let now = format_timestamp(Utc::now());

		let result = sqlx::query(
			r#"
			UPDATE accounts SET
				character_name = COALESCE(?, character_name),
				login_name = COALESCE(?, login_name),
				display_name = COALESCE(?, display_name),
				groups = ?,
				organization_id = ?,
				organization_name = ?,
				parent_organization_id = ?,
				parent_organization_name = ?,
				updated_at = ?
			WHERE character_id = ?
			"#,
		)
		.bind(patch.character_name.as_set())
		.bind(patch.login_name.as_set())
		.bind(patch.display_name.as_set())
		.bind(&patch.groups)
		.bind(patch.organization.organization_id)
		.bind(&patch.organization.organization_name)
		.bind(patch.organization.parent_organization_id)
		.bind(&patch.organization.parent_organization_name)
		.bind(&now)
		.bind(id.get())
		.execute(&self.pool)
		.await
		.map_err(|e| map_write_error(e, patch.login_name.as_set().map(String::as_str)))?;

		let updated = result.rows_affected() > 0;
		if updated {
			tracing::debug!("account updated");
		}
		Ok(updated)
	}

	/// Replace the secret and the owner marker in one statement.
	///
	/// `updated_at` is left alone so the row keeps its place in
	/// [`Self::list_account_ids`].
	#[tracing::instrument(skip(self, owner_hash, secret), fields(character_id = %id))]
	pub async fn rotate_secret(
		&self,
		id: CharacterId,
		owner_hash: &str,
		secret: &SecretString,
	) -> Result<bool, DbError> {
		let result = sqlx::query(
			r#"
			UPDATE accounts
			SET secret = ?, owner_hash = ?
			WHERE character_id = ?
			"#,
		)
		.bind(secret.expose())
		.bind(owner_hash)
		.bind(id.get())
		.execute(&self.pool)
		.await?;

		let rotated = result.rows_affected() > 0;
		if rotated {
			tracing::debug!("secret rotated for new owner");
		}
		Ok(rotated)
	}

	/// Replace the secret only. Like rotation, this does not touch `updated_at`.
	#[tracing::instrument(skip(self, secret), fields(character_id = %id))]
	pub async fn update_secret(&self, id: CharacterId, secret: &SecretString) -> Result<bool, DbError> {
		let result = sqlx::query(
			r#"
			UPDATE accounts
			SET secret = ?
			WHERE character_id = ?
			"#,
		)
		.bind(secret.expose())
		.bind(id.get())
		.execute(&self.pool)
		.await?;

		Ok(result.rows_affected() > 0)
	}

	/// Every account id, least recently updated first.
	#[tracing::instrument(skip(self))]
	pub async fn list_account_ids(&self) -> Result<Vec<CharacterId>, DbError> {
		let rows: Vec<(i64,)> = sqlx::query_as(
			"SELECT character_id FROM accounts ORDER BY updated_at ASC, character_id ASC",
		)
		.fetch_all(&self.pool)
		.await?;

		Ok(rows.into_iter().map(|(id,)| CharacterId(id)).collect())
	}
}

fn parse_account_row(row: &SqliteRow) -> Result<AccountRecord, DbError> {
	let secret: String = row.try_get("secret")?;
	let created_at: String = row.try_get("created_at")?;
	let updated_at: String = row.try_get("updated_at")?;

	Ok(AccountRecord {
		character_id: CharacterId(row.try_get("character_id")?),
		character_name: row.try_get("character_name")?,
		login_name: row.try_get("login_name")?,
		secret: SecretString::new(secret),
		display_name: row.try_get("display_name")?,
		groups: row.try_get("groups")?,
		owner_hash: row.try_get("owner_hash")?,
		organization: OrganizationFields {
			organization_id: row.try_get("organization_id")?,
			organization_name: row.try_get("organization_name")?,
			parent_organization_id: row.try_get("parent_organization_id")?,
			parent_organization_name: row.try_get("parent_organization_name")?,
		},
		created_at: parse_timestamp(&created_at)?,
		updated_at: parse_timestamp(&updated_at)?,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::create_test_pool;
	use crate::types::FieldPatch;

	async fn make_repo() -> AccountRepository {
		AccountRepository::new(create_test_pool().await.unwrap())
	}

	fn new_account(id: i64, login_name: &str) -> NewAccount {
		NewAccount {
			character_id: CharacterId(id),
			character_name: format!("Pilot {id}"),
			login_name: login_name.to_string(),
			secret: SecretString::new(format!("secret{id}")),
			display_name: format!("Pilot {id} [ABC]"),
			groups: "alpha,beta".to_string(),
			owner_hash: "h1".to_string(),
			organization: OrganizationFields {
				organization_id: Some(98000001),
				organization_name: Some("Org".to_string()),
				parent_organization_id: None,
				parent_organization_name: None,
			},
		}
	}

	#[tokio::test]
	async fn create_then_get() {
		let repo = make_repo().await;
		repo.create_account(&new_account(1, "pilot_1")).await.unwrap();

		let account = repo.get_account(CharacterId(1)).await.unwrap().unwrap();
		assert_eq!(account.login_name, "pilot_1");
		assert_eq!(account.secret.expose(), "secret1");
		assert_eq!(account.owner_hash, "h1");
		assert_eq!(account.organization.organization_id, Some(98000001));
		assert_eq!(account.created_at, account.updated_at);

		assert!(repo.get_account(CharacterId(2)).await.unwrap().is_none());
	}

	#[tokio::test]
	async fn duplicate_login_name_is_reported_as_taken() {
		let repo = make_repo().await;
		repo.create_account(&new_account(1, "pilot")).await.unwrap();

		let err = repo.create_account(&new_account(2, "pilot")).await.unwrap_err();
		assert!(matches!(err, DbError::LoginNameTaken(ref name) if name == "pilot"));
	}

	#[tokio::test]
	async fn duplicate_character_is_a_conflict() {
		let repo = make_repo().await;
		repo.create_account(&new_account(1, "one")).await.unwrap();

		let err = repo.create_account(&new_account(1, "two")).await.unwrap_err();
		assert!(matches!(err, DbError::Conflict(_)));
	}

	#[tokio::test]
	async fn empty_login_names_may_repeat() {
		let repo = make_repo().await;
		repo.create_account(&new_account(1, "")).await.unwrap();
		repo.create_account(&new_account(2, "")).await.unwrap();
		assert!(repo.is_login_name_taken("").await.unwrap());
	}

	#[tokio::test]
	async fn batch_fetch_skips_missing_rows() {
		let repo = make_repo().await;
		repo.create_account(&new_account(1, "a")).await.unwrap();
		repo.create_account(&new_account(3, "c")).await.unwrap();

		let mut ids: Vec<i64> = repo
			.get_accounts(&[CharacterId(1), CharacterId(2), CharacterId(3)])
			.await
			.unwrap()
			.into_iter()
			.map(|a| a.character_id.get())
			.collect();
		ids.sort();
		assert_eq!(ids, vec![1, 3]);

		assert!(repo.get_accounts(&[]).await.unwrap().is_empty());
	}

	#[tokio::test]
	async fn keep_fields_survive_update() {
		let repo = make_repo().await;
		repo.create_account(&new_account(1, "old")).await.unwrap();

		let patch = AccountPatch {
			groups: "gamma".to_string(),
			..Default::default()
		};
		assert!(repo.update_account(CharacterId(1), &patch).await.unwrap());

		let account = repo.get_account(CharacterId(1)).await.unwrap().unwrap();
		assert_eq!(account.login_name, "old");
		assert_eq!(account.character_name, "Pilot 1");
		assert_eq!(account.display_name, "Pilot 1 [ABC]");
		assert_eq!(account.groups, "gamma");
		assert_eq!(account.organization.organization_id, None);
		assert!(account.updated_at >= account.created_at);
	}

	#[tokio::test]
	async fn set_fields_overwrite() {
		let repo = make_repo().await;
		repo.create_account(&new_account(1, "")).await.unwrap();

		let patch = AccountPatch {
			character_name: FieldPatch::Set("Ari".to_string()),
			login_name: FieldPatch::Set("ari".to_string()),
			display_name: FieldPatch::Set("Ari (Scout)".to_string()),
			..Default::default()
		};
		repo.update_account(CharacterId(1), &patch).await.unwrap();

		let account = repo.get_account(CharacterId(1)).await.unwrap().unwrap();
		assert_eq!(account.character_name, "Ari");
		assert_eq!(account.login_name, "ari");
		assert_eq!(account.display_name, "Ari (Scout)");
	}

	#[tokio::test]
	async fn update_of_missing_row_reports_false() {
		let repo = make_repo().await;
		let updated = repo
			.update_account(CharacterId(9), &AccountPatch::default())
			.await
			.unwrap();
		assert!(!updated);
	}

	#[tokio::test]
	async fn update_to_taken_login_name_is_rejected() {
		let repo = make_repo().await;
		repo.create_account(&new_account(1, "ari")).await.unwrap();
		repo.create_account(&new_account(2, "")).await.unwrap();

		let patch = AccountPatch {
			login_name: FieldPatch::Set("ari".to_string()),
			..Default::default()
		};
		let err = repo.update_account(CharacterId(2), &patch).await.unwrap_err();
		assert!(matches!(err, DbError::LoginNameTaken(_)));
	}

	#[tokio::test]
	async fn rotate_replaces_secret_and_owner() {
		let repo = make_repo().await;
		repo.create_account(&new_account(1, "ari")).await.unwrap();

		let rotated = repo
			.rotate_secret(CharacterId(1), "h2", &SecretString::new("fresh".to_string()))
			.await
			.unwrap();
		assert!(rotated);

		let account = repo.get_account(CharacterId(1)).await.unwrap().unwrap();
		assert_eq!(account.secret.expose(), "fresh");
		assert_eq!(account.owner_hash, "h2");
		assert_eq!(account.updated_at, account.created_at);
	}

	#[tokio::test]
	async fn update_secret_keeps_owner() {
		let repo = make_repo().await;
		repo.create_account(&new_account(1, "ari")).await.unwrap();

		assert!(repo
			.update_secret(CharacterId(1), &SecretString::new("reset".to_string()))
			.await
			.unwrap());
		assert!(!repo
			.update_secret(CharacterId(2), &SecretString::new("reset".to_string()))
			.await
			.unwrap());

		let account = repo.get_account(CharacterId(1)).await.unwrap().unwrap();
		assert_eq!(account.secret.expose(), "reset");
		assert_eq!(account.owner_hash, "h1");
		assert_eq!(account.updated_at, account.created_at);
	}

	#[tokio::test]
	async fn ids_are_listed_least_recently_updated_first() {
		let repo = make_repo().await;
		for (id, name) in [(1, "a"), (2, "b"), (3, "c")] {
			repo.create_account(&new_account(id, name)).await.unwrap();
		}
		tokio::time::sleep(std::time::Duration::from_millis(2)).await;
		repo.update_account(CharacterId(1), &AccountPatch::default())
			.await
			.unwrap();

		let ids = repo.list_account_ids().await.unwrap();
		assert_eq!(ids, vec![CharacterId(2), CharacterId(3), CharacterId(1)]);
	}
}
