// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration for Mumble account sync.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file, environment)
//! - Consistent environment variable naming (`MUMBLE_SYNC_*`)
//! - Loading of the tag file named by the configuration
//!
//! # Usage
//!
//! ```ignore
//! use mumble_config::{load_config, load_tag_config};
//!
//! let config = load_config()?;
//! let tags = load_tag_config(&config.tags)?;
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::SyncConfigLayer;
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

use mumble_tags::TagConfig;
use tracing::{debug, info};

/// Fully resolved configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncConfig {
	pub database: DatabaseConfig,
	pub tags: TagsConfig,
	pub bans: BansConfig,
	pub logging: LoggingConfig,
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`MUMBLE_SYNC_*`)
/// 2. Config file (`/etc/mumble-sync/config.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<SyncConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<SyncConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

pub fn load_from_sources(mut sources: Vec<Box<dyn ConfigSource>>) -> Result<SyncConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = SyncConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	finalize(merged)
}

fn finalize(layer: SyncConfigLayer) -> Result<SyncConfig, ConfigError> {
	let config = SyncConfig {
		database: layer.database.unwrap_or_default().finalize(),
		tags: layer.tags.unwrap_or_default().finalize(),
		bans: layer.bans.unwrap_or_default().finalize(),
		logging: layer.logging.unwrap_or_default().finalize(),
	};

	validate_config(&config)?;

	info!(
		database = %config.database.url,
		tags_file = ?config.tags.file,
		banned_group = ?config.bans.group_id,
		"configuration loaded"
	);
	Ok(config)
}

fn validate_config(config: &SyncConfig) -> Result<(), ConfigError> {
	if config.database.max_connections == 0 {
		return Err(ConfigError::Validation(
			"database.max_connections must be at least 1".to_string(),
		));
	}
	if config.bans.group_id.is_some() && config.bans.reason.trim().is_empty() {
		return Err(ConfigError::Validation(
			"bans.reason must not be empty when bans.group_id is set".to_string(),
		));
	}
	Ok(())
}

/// Read the tag file named by `tags`, or an empty configuration when none
/// is configured.
pub fn load_tag_config(tags: &TagsConfig) -> Result<TagConfig, ConfigError> {
	match &tags.file {
		Some(path) => Ok(TagConfig::from_file(path)?),
		None => {
			debug!("no tag file configured");
			Ok(TagConfig::default())
		}
	}
}
