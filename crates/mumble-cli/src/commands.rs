// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::sync::Arc;

use anyhow::Context;
use mumble_config::{load_tag_config, SyncConfig};
use mumble_core::{CharacterId, ServiceAccount};
use mumble_db::{create_pool, run_migrations, AccountRepository};
use mumble_provisioning::{preview_display_name, BanPolicy, PartialFailure, ProvisioningService};
use serde::Serialize;

use crate::input::{read_character, read_characters, read_groups};
use crate::Command;

/// Credentials as printed for the operator. Unlike [`ServiceAccount`], the
/// password is written out in clear.
#[derive(Debug, Serialize)]
struct Credentials<'a> {
	character_id: CharacterId,
	login_name: &'a str,
	password: &'a str,
}

impl<'a> From<&'a ServiceAccount> for Credentials<'a> {
	fn from(account: &'a ServiceAccount) -> Self {
		Self {
			character_id: account.character_id,
			login_name: &account.login_name,
			password: account.secret.expose(),
		}
	}
}

#[derive(Debug, Serialize)]
struct Outcome<T: Serialize> {
	#[serde(flatten)]
	value: T,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	warnings: Vec<String>,
}

impl<T: Serialize> Outcome<T> {
	fn new(value: T, failures: &[PartialFailure]) -> Self {
		Self {
			value,
			warnings: failures.iter().map(ToString::to_string).collect(),
		}
	}
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
	println!("{}", serde_json::to_string_pretty(value)?);
	Ok(())
}

fn ban_policy(config: &SyncConfig) -> BanPolicy {
	match config.bans.group_id {
		Some(group_id) => BanPolicy::new(group_id, config.bans.reason.clone()),
		None => BanPolicy::disabled(),
	}
}

async fn connect(config: &SyncConfig) -> anyhow::Result<ProvisioningService> {
	let pool = create_pool(&config.database.url, config.database.max_connections)
		.await
		.with_context(|| format!("failed to open database {}", config.database.url))?;
	run_migrations(&pool)
		.await
		.context("failed to apply migrations")?;

	let tags = load_tag_config(&config.tags)?;
	tracing::debug!(tags = tags.len(), "tag configuration loaded");

	Ok(ProvisioningService::new(
		Arc::new(AccountRepository::new(pool)),
		tags,
		ban_policy(config),
	))
}

pub async fn run(command: Command, config: &SyncConfig) -> anyhow::Result<()> {
	match command {
		Command::Migrate => {
			let pool = create_pool(&config.database.url, config.database.max_connections)
				.await
				.with_context(|| format!("failed to open database {}", config.database.url))?;
			run_migrations(&pool)
				.await
				.context("failed to apply migrations")?;
			tracing::info!(database = %config.database.url, "schema up to date");
		}

		Command::Register { character, groups } => {
			let character = read_character(&character)?;
			let groups = read_groups(groups.as_deref())?;
			let service = connect(config).await?;

			let outcome = service.register(&character, &groups).await?;
			print_json(&Outcome::new(
				Credentials::from(&outcome.value),
				&outcome.partial_failures,
			))?;
		}

		Command::Update { character, groups } => {
			let character = read_character(&character)?;
			let groups = read_groups(groups.as_deref())?;
			let service = connect(config).await?;

			let outcome = service.update_account(&character, &groups).await?;
			print_json(&Outcome::new(
				serde_json::json!({ "character_id": character.id }),
				&outcome.partial_failures,
			))?;
		}

		Command::Fetch { characters } => {
			let characters = read_characters(&characters)?;
			let service = connect(config).await?;

			let outcome = service.fetch_accounts(&characters).await?;
			for failure in &outcome.partial_failures {
				tracing::warn!(%failure, "fetched credentials are weaker than usual");
			}
			let credentials: Vec<Credentials<'_>> =
				outcome.value.iter().map(Credentials::from).collect();
			print_json(&credentials)?;
		}

		Command::ResetPassword { id } => {
			let service = connect(config).await?;
			let id = CharacterId(id);

			let outcome = service.reset_password(id).await?;
			print_json(&Outcome::new(
				serde_json::json!({
					"character_id": id,
					"password": outcome.value.expose(),
				}),
				&outcome.partial_failures,
			))?;
		}

		Command::List => {
			let service = connect(config).await?;
			print_json(&service.list_all_account_ids().await?)?;
		}

		Command::Preview { character, groups } => {
			let character = read_character(&character)?;
			let groups = read_groups(groups.as_deref())?;
			let tags = load_tag_config(&config.tags)?;

			println!("{}", preview_display_name(&tags, &character, &groups));
		}
	}

	Ok(())
}
