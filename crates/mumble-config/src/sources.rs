// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: environment variables and TOML files.

use std::path::PathBuf;

use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::layer::SyncConfigLayer;
use crate::sections::{BansConfigLayer, DatabaseConfigLayer, LoggingConfigLayer, TagsConfigLayer};

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<SyncConfigLayer, ConfigError>;
}

/// Built-in defaults source.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<SyncConfigLayer, ConfigError> {
		debug!("loading defaults");
		Ok(SyncConfigLayer::default())
	}
}

/// TOML file configuration source. A missing file contributes nothing.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new("/etc/mumble-sync/config.toml")
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<SyncConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(SyncConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: SyncConfigLayer = toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
			path: self.path.clone(),
			source: e,
		})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Convention: MUMBLE_SYNC_<SECTION>_<FIELD>
pub struct EnvSource;

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<SyncConfigLayer, ConfigError> {
		debug!("loading environment variables");
		load_from_lookup(|name| std::env::var(name).ok())
	}
}

/// Build a layer from `lookup`; empty values count as unset.
pub(crate) fn load_from_lookup<F>(lookup: F) -> Result<SyncConfigLayer, ConfigError>
where
	F: Fn(&str) -> Option<String>,
{
	let var = |name: &str| lookup(name).filter(|s| !s.is_empty());

	let parse_u32 = |name: &str| -> Result<Option<u32>, ConfigError> {
		match var(name) {
			Some(v) => v.parse().map(Some).map_err(|_| ConfigError::InvalidValue {
				key: name.to_string(),
				message: format!("invalid u32 value '{v}'"),
			}),
			None => Ok(None),
		}
	};

	let parse_bool =
		|name: &str| var(name).map(|v| v.eq_ignore_ascii_case("true") || v == "1");

	let parse_i64 = |name: &str| -> Result<Option<i64>, ConfigError> {
		match var(name) {
			Some(v) => v.parse().map(Some).map_err(|_| ConfigError::InvalidValue {
				key: name.to_string(),
				message: format!("invalid integer value '{v}'"),
			}),
			None => Ok(None),
		}
	};

	Ok(SyncConfigLayer {
		database: Some(DatabaseConfigLayer {
			url: var("MUMBLE_SYNC_DATABASE_URL"),
			max_connections: parse_u32("MUMBLE_SYNC_DATABASE_MAX_CONNECTIONS")?,
		}),
		tags: Some(TagsConfigLayer {
			file: var("MUMBLE_SYNC_TAGS_FILE").map(PathBuf::from),
		}),
		bans: Some(BansConfigLayer {
			group_id: parse_i64("MUMBLE_SYNC_BANNED_GROUP_ID")?,
			reason: var("MUMBLE_SYNC_BAN_REASON"),
		}),
		logging: Some(LoggingConfigLayer {
			level: var("MUMBLE_SYNC_LOG_LEVEL"),
			json: parse_bool("MUMBLE_SYNC_LOG_JSON"),
		}),
	})
}
