// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use mumble_core::CharacterId;
use mumble_db::DbError;

/// Errors that can occur during account provisioning.
#[derive(Debug, thiserror::Error)]
pub enum ProvisioningError {
	#[error("invalid request: {0}")]
	Validation(String),

	#[error("store error: {0}")]
	Store(#[from] DbError),

	#[error("no free login name derived from {base:?} after {attempts} attempts")]
	UniquenessExhausted { base: String, attempts: u32 },

	#[error("account not found: {0}")]
	AccountNotFound(CharacterId),

	#[error("failed to start runtime: {0}")]
	Runtime(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ProvisioningError>;
