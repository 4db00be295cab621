// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Registration and reconciliation of Mumble accounts.

use std::collections::HashMap;
use std::sync::Arc;

use mumble_common_secret::{GeneratedSecret, SecretGenerator, SecretString};
use mumble_core::{
	candidates, flatten_group_names, normalize, Character, CharacterId, Group, ServiceAccount,
	TickerScope, MAX_LOGIN_NAME_ATTEMPTS,
};
use mumble_db::{
	AccountPatch, AccountStore, DbError, FieldPatch, NewAccount, OrganizationFields,
};
use mumble_tags::TagConfig;
use tracing::{debug, error, info, warn};

use crate::error::{ProvisioningError, Result};
use crate::outcome::{PartialFailure, Reconciled};
use crate::policy::BanPolicy;

/// Log a store failure with its operation and convert it.
fn store_error(operation: &'static str) -> impl FnOnce(DbError) -> ProvisioningError {
	move |e| {
		error!(error = %e, operation, "account store operation failed");
		ProvisioningError::Store(e)
	}
}

/// Provisions Mumble accounts for directory characters.
///
/// Holds the store handle and the parsed tag configuration for its whole
/// lifetime. Operations on different characters are independent.
#[derive(Clone)]
pub struct ProvisioningService {
	store: Arc<dyn AccountStore>,
	tags: Arc<TagConfig>,
	bans: BanPolicy,
	generator: SecretGenerator,
}

impl ProvisioningService {
	pub fn new(store: Arc<dyn AccountStore>, tags: TagConfig, bans: BanPolicy) -> Self {
		Self {
			store,
			tags: Arc::new(tags),
			bans,
			generator: SecretGenerator::default(),
		}
	}

	/// Create the account for a character seen for the first time.
	///
	/// # Errors
	/// - `Validation` if the character has no name
	/// - `UniquenessExhausted` if every login name candidate is taken
	/// - `Store` on insert failure, including an already registered character
	#[tracing::instrument(skip(self, character, groups), fields(character_id = %character.id))]
	pub async fn register(
		&self,
		character: &Character,
		groups: &[Group],
	) -> Result<Reconciled<ServiceAccount>> {
		if !character.has_name() {
			return Err(ProvisioningError::Validation(format!(
				"character {} has no name",
				character.id
			)));
		}

		let mut failures = self.record_tickers(character).await;
		let ticker = self.organization_ticker(character, &mut failures).await;
		let display_name = display_name_for(&self.tags, character, groups, ticker.as_deref());

		let secret = checked_secret(character.id, self.generator.generate());
		failures.extend(secret.partial_failures);

		let base = login_name_base(character);
		let mut account = NewAccount {
			character_id: character.id,
			character_name: character.name().to_string(),
			login_name: String::new(),
			secret: secret.value,
			display_name,
			groups: flatten_group_names(groups),
			owner_hash: character.owner_hash().unwrap_or_default().to_string(),
			organization: organization_fields(character),
		};

		let mut next = 0;
		loop {
			let (index, login_name) = self.reserve_from(&base, next).await?;
			account.login_name = login_name;

			match self.store.create_account(&account).await {
				Ok(()) => break,
				Err(DbError::LoginNameTaken(name)) => {
					debug!(login_name = %name, "login name claimed concurrently, trying next");
					next = index + 1;
				}
				Err(e) => return Err(store_error("create account")(e)),
			}
		}

		info!(login_name = %account.login_name, "account registered");
		for failure in &failures {
			warn!(%failure, "registration side effect failed");
		}

		Ok(Reconciled::with_failures(
			ServiceAccount::new(account.character_id, account.login_name, account.secret),
			failures,
		))
	}

	/// Credentials for every requested character that has an account.
	///
	/// A character whose incoming owner marker differs from the stored one
	/// gets a fresh secret first. If that rotation fails the character is
	/// left out of the result. Output follows request order; characters
	/// without an account are absent. A rotated secret from the fallback
	/// generator is reported as [`PartialFailure::WeakSecret`].
	#[tracing::instrument(skip(self, characters), fields(requested = characters.len()))]
	pub async fn fetch_accounts(
		&self,
		characters: &[Character],
	) -> Result<Reconciled<Vec<ServiceAccount>>> {
		if characters.is_empty() {
			return Ok(Reconciled::clean(Vec::new()));
		}

		let ids: Vec<CharacterId> = characters.iter().map(|c| c.id).collect();
		let mut records: HashMap<CharacterId, _> = self
			.store
			.get_accounts(&ids)
			.await
			.map_err(store_error("fetch accounts"))?
			.into_iter()
			.map(|record| (record.character_id, record))
			.collect();

		let mut accounts = Vec::with_capacity(records.len());
		let mut failures = Vec::new();
		for character in characters {
			let Some(record) = records.remove(&character.id) else {
				continue;
			};

			match character.owner_hash() {
				Some(owner_hash) if owner_hash != record.owner_hash => {
					let secret = checked_secret(record.character_id, self.generator.generate());
					match self
						.store
						.rotate_secret(record.character_id, owner_hash, &secret.value)
						.await
					{
						Ok(true) => {
							info!(character_id = %record.character_id, "owner changed, secret rotated");
							failures.extend(secret.partial_failures);
							accounts.push(ServiceAccount::new(
								record.character_id,
								record.login_name,
								secret.value,
							));
						}
						Ok(false) => {
							warn!(character_id = %record.character_id, "account disappeared during rotation, skipping");
						}
						Err(e) => {
							error!(character_id = %record.character_id, error = %e, "secret rotation failed, skipping");
						}
					}
				}
				_ => accounts.push(record.to_service_account()),
			}
		}

		debug!(returned = accounts.len(), "accounts fetched");
		Ok(Reconciled::with_failures(accounts, failures))
	}

	/// Reconcile an existing account with fresh directory facts.
	///
	/// Values missing from `character` never overwrite stored ones; groups
	/// and organization columns always do. The ban row is synced after the
	/// account row.
	///
	/// # Errors
	/// - `AccountNotFound` if the character was never registered
	/// - `UniquenessExhausted` when a login name must be assigned and none is free
	/// - `Store` on update or ban failure
	#[tracing::instrument(skip(self, character, groups), fields(character_id = %character.id))]
	pub async fn update_account(
		&self,
		character: &Character,
		groups: &[Group],
	) -> Result<Reconciled<()>> {
		let existing = self
			.store
			.get_account(character.id)
			.await
			.map_err(store_error("load account"))?
			.ok_or(ProvisioningError::AccountNotFound(character.id))?;

		let mut failures = self.record_tickers(character).await;

		let display_name = if character.has_name() {
			let ticker = self.organization_ticker(character, &mut failures).await;
			FieldPatch::non_empty(display_name_for(
				&self.tags,
				character,
				groups,
				ticker.as_deref(),
			))
		} else {
			FieldPatch::Keep
		};

		let mut patch = AccountPatch {
			character_name: FieldPatch::non_empty(character.name()),
			login_name: FieldPatch::Keep,
			display_name,
			groups: flatten_group_names(groups),
			organization: organization_fields(character),
		};

		let base = (existing.login_name.is_empty() && character.has_name())
			.then(|| login_name_base(character));

		let mut next = 0;
		loop {
			let index = match &base {
				Some(base) => {
					let (index, login_name) = self.reserve_from(base, next).await?;
					patch.login_name = FieldPatch::Set(login_name);
					Some(index)
				}
				None => None,
			};

			match self.store.update_account(character.id, &patch).await {
				Ok(true) => break,
				Ok(false) => return Err(ProvisioningError::AccountNotFound(character.id)),
				Err(DbError::LoginNameTaken(name)) if index.is_some() => {
					debug!(login_name = %name, "login name claimed concurrently, trying next");
					next = index.map_or(0, |i| i + 1);
				}
				Err(e) => return Err(store_error("update account")(e)),
			}
		}

		if let Some(login_name) = patch.login_name.as_set() {
			info!(%login_name, "login name assigned");
		}

		self.sync_ban(character.id, groups).await?;

		for failure in &failures {
			warn!(%failure, "reconciliation side effect failed");
		}
		debug!("account reconciled");
		Ok(Reconciled::with_failures((), failures))
	}

	/// Replace the secret of an existing account.
	///
	/// A secret from the fallback generator is still stored and returned,
	/// flagged with [`PartialFailure::WeakSecret`].
	#[tracing::instrument(skip(self), fields(character_id = %id))]
	pub async fn reset_password(&self, id: CharacterId) -> Result<Reconciled<SecretString>> {
		let secret = checked_secret(id, self.generator.generate());
		let updated = self
			.store
			.update_secret(id, &secret.value)
			.await
			.map_err(store_error("reset password"))?;

		if !updated {
			return Err(ProvisioningError::AccountNotFound(id));
		}

		info!("password reset");
		Ok(secret)
	}

	/// Every account id, least recently updated first.
	#[tracing::instrument(skip(self))]
	pub async fn list_all_account_ids(&self) -> Result<Vec<CharacterId>> {
		self.store
			.list_account_ids()
			.await
			.map_err(store_error("list account ids"))
	}

	/// First unused login name derived from `base`.
	#[tracing::instrument(skip(self))]
	pub async fn reserve_unique_login_name(&self, base: &str) -> Result<String> {
		self.reserve_from(base, 0).await.map(|(_, name)| name)
	}

	/// Check candidates starting at position `skip`, returning the first free
	/// one with its position.
	async fn reserve_from(&self, base: &str, skip: usize) -> Result<(usize, String)> {
		for (index, candidate) in candidates(base).enumerate().skip(skip) {
			let taken = self
				.store
				.is_login_name_taken(&candidate)
				.await
				.map_err(store_error("check login name"))?;
			if !taken {
				return Ok((index, candidate));
			}
		}

		warn!(%base, "login name candidates exhausted");
		Err(ProvisioningError::UniquenessExhausted {
			base: base.to_string(),
			attempts: MAX_LOGIN_NAME_ATTEMPTS,
		})
	}

	async fn record_tickers(&self, character: &Character) -> Vec<PartialFailure> {
		let mut failures = Vec::new();
		for (scope, organization_id, ticker) in character.tickers() {
			if let Err(e) = self.store.upsert_ticker(scope, organization_id, ticker).await {
				warn!(%scope, organization_id, error = %e, "failed to store ticker");
				failures.push(PartialFailure::TickerUpsert {
					scope,
					organization_id,
					error: e.to_string(),
				});
			}
		}
		failures
	}

	/// The incoming organization ticker, or the last one stored for the
	/// organization when the directory omitted it.
	async fn organization_ticker(
		&self,
		character: &Character,
		failures: &mut Vec<PartialFailure>,
	) -> Option<String> {
		if let Some(ticker) = character
			.organization_ticker
			.as_deref()
			.filter(|t| !t.is_empty())
		{
			return Some(ticker.to_string());
		}

		let organization_id = character.organization_id.filter(|id| *id != 0)?;
		match self
			.store
			.get_ticker(TickerScope::Organization, organization_id)
			.await
		{
			Ok(ticker) => ticker,
			Err(e) => {
				failures.push(PartialFailure::TickerLookup {
					organization_id,
					error: e.to_string(),
				});
				None
			}
		}
	}

	async fn sync_ban(&self, id: CharacterId, groups: &[Group]) -> Result<()> {
		match self.bans.evaluate(groups) {
			Some(true) => {
				if self
					.store
					.ensure_ban(id, &self.bans.reason)
					.await
					.map_err(store_error("add ban"))?
				{
					info!(character_id = %id, "character banned");
				}
			}
			Some(false) => {
				if self
					.store
					.remove_ban(id)
					.await
					.map_err(store_error("remove ban"))?
				{
					info!(character_id = %id, "ban lifted");
				}
			}
			None => {}
		}
		Ok(())
	}
}

/// Display name `character` would get with `groups`, using only the
/// ticker carried by `character`. Nothing is read from the store.
pub fn preview_display_name(tags: &TagConfig, character: &Character, groups: &[Group]) -> String {
	display_name_for(
		tags,
		character,
		groups,
		character.organization_ticker.as_deref(),
	)
}

fn display_name_for(
	tags: &TagConfig,
	character: &Character,
	groups: &[Group],
	ticker: Option<&str>,
) -> String {
	tags.display_name(
		character.name(),
		groups.iter().map(|g| g.name.as_str()),
		ticker,
	)
}

/// Flag a secret from the fallback generator for the caller.
fn checked_secret(id: CharacterId, generated: GeneratedSecret) -> Reconciled<SecretString> {
	if generated.is_weak() {
		let failures = vec![PartialFailure::WeakSecret { character_id: id }];
		Reconciled::with_failures(generated.value, failures)
	} else {
		Reconciled::clean(generated.value)
	}
}

/// Normalized name, or `character_<id>` when nothing of the name survives.
fn login_name_base(character: &Character) -> String {
	let slug = normalize(character.name());
	if slug.is_empty() {
		format!("character_{}", character.id)
	} else {
		slug
	}
}

fn organization_fields(character: &Character) -> OrganizationFields {
	OrganizationFields {
		organization_id: character.organization_id,
		organization_name: character.organization_name.clone(),
		parent_organization_id: character.parent_organization_id,
		parent_organization_name: character.parent_organization_name.clone(),
	}
}
