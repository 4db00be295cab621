// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Synchronous wrapper for callers without an async runtime.

use std::sync::Arc;

use mumble_common_secret::SecretString;
use mumble_core::{Character, CharacterId, Group, ServiceAccount};
use mumble_db::{create_pool, run_migrations, AccountRepository};
use mumble_tags::TagConfig;
use tokio::runtime::{Builder, Runtime};

use crate::error::{ProvisioningError, Result};
use crate::outcome::Reconciled;
use crate::policy::BanPolicy;
use crate::service::ProvisioningService;

/// Runs every [`ProvisioningService`] operation to completion on the calling
/// thread.
///
/// Must not be used from inside another Tokio runtime.
pub struct BlockingProvisioningService {
	service: ProvisioningService,
	runtime: Runtime,
}

impl BlockingProvisioningService {
	pub fn new(service: ProvisioningService) -> Result<Self> {
		let runtime = Builder::new_current_thread()
			.enable_all()
			.build()
			.map_err(ProvisioningError::Runtime)?;
		Ok(Self { service, runtime })
	}

	/// Open the database at `database_url`, apply migrations and build a
	/// service over it.
	pub fn open(
		database_url: &str,
		max_connections: u32,
		tags: TagConfig,
		bans: BanPolicy,
	) -> Result<Self> {
		let runtime = Builder::new_current_thread()
			.enable_all()
			.build()
			.map_err(ProvisioningError::Runtime)?;

		let pool = runtime.block_on(async {
			let pool = create_pool(database_url, max_connections).await?;
			run_migrations(&pool).await?;
			Ok::<_, mumble_db::DbError>(pool)
		})?;

		let service = ProvisioningService::new(Arc::new(AccountRepository::new(pool)), tags, bans);
		Ok(Self { service, runtime })
	}

	pub fn register(
		&self,
		character: &Character,
		groups: &[Group],
	) -> Result<Reconciled<ServiceAccount>> {
		self.runtime.block_on(self.service.register(character, groups))
	}

	pub fn fetch_accounts(
		&self,
		characters: &[Character],
	) -> Result<Reconciled<Vec<ServiceAccount>>> {
		self.runtime.block_on(self.service.fetch_accounts(characters))
	}

	pub fn update_account(&self, character: &Character, groups: &[Group]) -> Result<Reconciled<()>> {
		self.runtime
			.block_on(self.service.update_account(character, groups))
	}

	pub fn reset_password(&self, id: CharacterId) -> Result<Reconciled<SecretString>> {
		self.runtime.block_on(self.service.reset_password(id))
	}

	pub fn list_all_account_ids(&self) -> Result<Vec<CharacterId>> {
		self.runtime.block_on(self.service.list_all_account_ids())
	}
}
