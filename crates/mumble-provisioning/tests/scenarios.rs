// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! End-to-end provisioning behaviour against an in-memory store.

use std::sync::Arc;

use mumble_core::{normalize, Character, CharacterId, Group};
use mumble_db::testing::create_test_pool;
use mumble_db::{AccountPatch, AccountRepository, FieldPatch};
use mumble_provisioning::{BanPolicy, ProvisioningService};
use mumble_tags::TagConfig;
use proptest::prelude::*;

const BANNED_GROUP: i64 = 666;

async fn setup(tags: &str) -> (ProvisioningService, AccountRepository) {
	let repo = AccountRepository::new(create_test_pool().await.unwrap());
	let service = ProvisioningService::new(
		Arc::new(repo.clone()),
		TagConfig::parse(tags),
		BanPolicy::new(BANNED_GROUP, "banned by directory group"),
	);
	(service, repo)
}

#[test]
fn normalizes_punctuated_name() {
	assert_eq!(normalize("Jean Luc O'Brien"), "jean_luc_o_brien");
}

#[tokio::test]
async fn same_name_registrations_get_suffixes() {
	let (service, _) = setup("").await;

	let first = service
		.register(&Character::new(1, "X Æ A-12"), &[])
		.await
		.unwrap();
	let second = service
		.register(&Character::new(2, "X Æ A-12"), &[])
		.await
		.unwrap();

	assert_eq!(first.value.login_name, "x__a-12");
	assert_eq!(second.value.login_name, "x__a-12_1");
}

#[tokio::test]
async fn ceo_tag_with_ticker_fallback() {
	let (service, repo) = setup("Leadership: CEO\nFleet: Scout").await;
	let character = Character::new(1, "Ari").with_organization(98000001, "Org", "ABC");

	service
		.register(&character, &[Group::new(10, "Leadership")])
		.await
		.unwrap();

	let stored = repo.get_account(CharacterId(1)).await.unwrap().unwrap();
	assert_eq!(stored.display_name, "Ari (CEO) [ABC]");
}

#[tokio::test]
async fn empty_name_update_keeps_login_and_display_name() {
	let (service, repo) = setup("").await;
	service
		.register(&Character::new(1, "Old"), &[])
		.await
		.unwrap();
	repo.update_account(
		CharacterId(1),
		&AccountPatch {
			login_name: FieldPatch::Set("old".to_string()),
			display_name: FieldPatch::Set("Old [OLD]".to_string()),
			..Default::default()
		},
	)
	.await
	.unwrap();

	let outcome = service
		.update_account(&Character::new(1, ""), &[Group::new(3, "Fleet")])
		.await
		.unwrap();
	assert!(outcome.is_clean());

	let stored = repo.get_account(CharacterId(1)).await.unwrap().unwrap();
	assert_eq!(stored.login_name, "old");
	assert_eq!(stored.display_name, "Old [OLD]");
	assert_eq!(stored.character_name, "Old");
	assert_eq!(stored.groups, "Fleet");
}

#[tokio::test]
async fn owner_change_rotates_secret_once() {
	let (service, repo) = setup("").await;
	let registered = service
		.register(&Character::new(1, "Ari").with_owner_hash("h1"), &[])
		.await
		.unwrap()
		.into_value();

	let rotated = service
		.fetch_accounts(&[Character::new(1, "Ari").with_owner_hash("h2")])
		.await
		.unwrap()
		.into_value();
	assert_eq!(rotated.len(), 1);
	assert_ne!(rotated[0].secret, registered.secret);

	let stored = repo.get_account(CharacterId(1)).await.unwrap().unwrap();
	assert_eq!(stored.owner_hash, "h2");
	assert_eq!(stored.secret, rotated[0].secret);

	let again = service
		.fetch_accounts(&[Character::new(1, "Ari").with_owner_hash("h2")])
		.await
		.unwrap()
		.into_value();
	assert_eq!(again[0].secret, rotated[0].secret);
}

#[tokio::test]
async fn missing_owner_marker_never_rotates() {
	let (service, _) = setup("").await;
	let registered = service
		.register(&Character::new(1, "Ari").with_owner_hash("h1"), &[])
		.await
		.unwrap()
		.into_value();

	let fetched = service
		.fetch_accounts(&[Character::new(1, "Ari"), Character::new(1, "Ari").with_owner_hash("")])
		.await
		.unwrap()
		.into_value();
	assert_eq!(fetched.len(), 1);
	assert_eq!(fetched[0].secret, registered.secret);
}

#[tokio::test]
async fn pronoun_precedes_organization_tag() {
	let (service, repo) = setup("Fleet: Scout\nPronouns: they/them").await;
	service
		.register(
			&Character::new(1, "Ari").with_organization(5, "Org", "ABC"),
			&[Group::new(1, "Fleet"), Group::new(2, "Pronouns")],
		)
		.await
		.unwrap();

	let stored = repo.get_account(CharacterId(1)).await.unwrap().unwrap();
	assert_eq!(stored.display_name, "Ari (they/them) (Scout)");
}

#[tokio::test]
async fn repeated_banned_updates_leave_one_ban() {
	let (service, repo) = setup("").await;
	let character = Character::new(1, "Ari");
	service.register(&character, &[]).await.unwrap();

	let groups = [Group::new(BANNED_GROUP, "Banned")];
	service.update_account(&character, &groups).await.unwrap();
	service.update_account(&character, &groups).await.unwrap();

	let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM bans WHERE character_id = 1")
		.fetch_one(repo.pool())
		.await
		.unwrap();
	assert_eq!(count, 1);
}

#[tokio::test]
async fn list_orders_by_last_update() {
	let (service, _) = setup("").await;
	for (id, name) in [(1, "Ari"), (2, "Bo")] {
		service
			.register(&Character::new(id, name), &[])
			.await
			.unwrap();
	}
	tokio::time::sleep(std::time::Duration::from_millis(2)).await;
	service
		.update_account(&Character::new(1, "Ari"), &[])
		.await
		.unwrap();

	assert_eq!(
		service.list_all_account_ids().await.unwrap(),
		vec![CharacterId(2), CharacterId(1)]
	);
}

#[tokio::test]
async fn secret_changes_keep_list_position() {
	let (service, _) = setup("").await;
	for (id, name) in [(1, "Ari"), (2, "Bo"), (3, "Cy")] {
		service
			.register(&Character::new(id, name).with_owner_hash("h1"), &[])
			.await
			.unwrap();
		tokio::time::sleep(std::time::Duration::from_millis(2)).await;
	}
	let before = service.list_all_account_ids().await.unwrap();
	assert_eq!(before, vec![CharacterId(1), CharacterId(2), CharacterId(3)]);

	service.reset_password(CharacterId(1)).await.unwrap();
	let rotated = service
		.fetch_accounts(&[Character::new(2, "Bo").with_owner_hash("h2")])
		.await
		.unwrap()
		.into_value();
	assert_eq!(rotated.len(), 1);

	assert_eq!(service.list_all_account_ids().await.unwrap(), before);
}

proptest! {
	#![proptest_config(ProptestConfig::with_cases(16))]

	#[test]
	fn registered_login_names_are_unique(
		names in proptest::collection::vec("[A-Za-z '.-]{1,8}", 1..12),
	) {
		let logins = tokio_test::block_on(async {
			let (service, _) = setup("").await;
			let mut logins = Vec::new();
			for (i, name) in names.iter().enumerate() {
				let character = Character::new(i as i64 + 1, name.as_str());
				let outcome = service.register(&character, &[]).await.unwrap();
				logins.push(outcome.value.login_name);
			}
			logins
		});

		let mut unique = logins.clone();
		unique.sort();
		unique.dedup();
		prop_assert_eq!(unique.len(), logins.len());
	}
}
