// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! SQLite persistence for Mumble accounts.
//!
//! The [`AccountStore`] trait is the seam the provisioning engine depends on;
//! [`AccountRepository`] implements it over a `sqlx` pool. Schema lives in
//! `migrations/` and is applied by [`run_migrations`].

pub mod account;
pub mod ban;
pub mod error;
pub mod pool;
pub mod testing;
pub mod ticker;
pub mod types;

pub use account::{AccountRepository, AccountStore};
pub use error::{DbError, Result};
pub use pool::{create_pool, run_migrations};
pub use types::{AccountPatch, AccountRecord, BanRecord, FieldPatch, NewAccount, OrganizationFields};
