// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

#[derive(Debug, thiserror::Error)]
pub enum DbError {
	#[error("Database error: {0}")]
	Sqlx(#[from] sqlx::Error),

	#[error("Conflict: {0}")]
	Conflict(String),

	/// Another account already holds this login name.
	#[error("Login name taken: {0}")]
	LoginNameTaken(String),

	#[error("Invalid stored data: {0}")]
	InvalidData(String),

	#[error("Internal: {0}")]
	Internal(String),
}

pub type Result<T> = std::result::Result<T, DbError>;

/// Map an insert/update failure, singling out collisions on the login name
/// index.
pub(crate) fn map_write_error(e: sqlx::Error, login_name: Option<&str>) -> DbError {
	match e {
		sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
			match login_name {
				Some(name) if db_err.message().contains("login_name") => {
					DbError::LoginNameTaken(name.to_string())
				}
				_ => DbError::Conflict(db_err.message().to_string()),
			}
		}
		_ => DbError::Sqlx(e),
	}
}
