// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Organization ticker relation. Latest write wins.

use chrono::Utc;
use mumble_core::TickerScope;

use crate::account::AccountRepository;
use crate::error::DbError;
use crate::types::format_timestamp;

impl AccountRepository {
	#[tracing::instrument(skip(self, scope), fields(scope = %scope))]
	pub async fn upsert_ticker(
		&self,
		scope: TickerScope,
		organization_id: i64,
		ticker: &str,
	) -> Result<(), DbError> {
		sqlx::query(
			r#"
			INSERT INTO tickers (scope, organization_id, ticker, updated_at)
			VALUES (?, ?, ?, ?)
			ON CONFLICT(scope, organization_id) DO UPDATE SET
				ticker = excluded.ticker,
				updated_at = excluded.updated_at
			"#,
		)
		.bind(scope.to_string())
		.bind(organization_id)
		.bind(ticker)
		.bind(format_timestamp(Utc::now()))
		.execute(&self.pool)
		.await?;

		tracing::debug!("ticker stored");
		Ok(())
	}

	#[tracing::instrument(skip(self, scope), fields(scope = %scope))]
	pub async fn get_ticker(
		&self,
		scope: TickerScope,
		organization_id: i64,
	) -> Result<Option<String>, DbError> {
		let row: Option<(String,)> =
			sqlx::query_as("SELECT ticker FROM tickers WHERE scope = ? AND organization_id = ?")
				.bind(scope.to_string())
				.bind(organization_id)
				.fetch_optional(&self.pool)
				.await?;

		Ok(row.map(|(ticker,)| ticker))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::create_test_pool;

	#[tokio::test]
	async fn latest_write_wins() {
		let repo = AccountRepository::new(create_test_pool().await.unwrap());
		repo.upsert_ticker(TickerScope::Organization, 10, "OLD")
			.await
			.unwrap();
		repo.upsert_ticker(TickerScope::Organization, 10, "NEW")
			.await
			.unwrap();

		assert_eq!(
			repo.get_ticker(TickerScope::Organization, 10)
				.await
				.unwrap()
				.as_deref(),
			Some("NEW")
		);
	}

	#[tokio::test]
	async fn scopes_are_independent() {
		let repo = AccountRepository::new(create_test_pool().await.unwrap());
		repo.upsert_ticker(TickerScope::Organization, 10, "ORG")
			.await
			.unwrap();
		repo.upsert_ticker(TickerScope::ParentOrganization, 10, "PAR")
			.await
			.unwrap();

		assert_eq!(
			repo.get_ticker(TickerScope::Organization, 10)
				.await
				.unwrap()
				.as_deref(),
			Some("ORG")
		);
		assert_eq!(
			repo.get_ticker(TickerScope::ParentOrganization, 10)
				.await
				.unwrap()
				.as_deref(),
			Some("PAR")
		);
		assert!(repo
			.get_ticker(TickerScope::Organization, 11)
			.await
			.unwrap()
			.is_none());
	}
}
