// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Maintenance CLI for Mumble account sync.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use mumble_config::{ConfigError, SyncConfig};
use tracing_subscriber::{
	fmt::MakeWriter, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

mod commands;
mod input;

/// mumble-sync - provision and reconcile Mumble accounts from directory facts.
#[derive(Parser, Debug)]
#[command(name = "mumble-sync", about = "Mumble account provisioning", version)]
struct Args {
	/// Config file (defaults to /etc/mumble-sync/config.toml)
	#[arg(long, global = true, env = "MUMBLE_SYNC_CONFIG")]
	config: Option<PathBuf>,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
	/// Create or upgrade the database schema
	Migrate,

	/// Register a character seen for the first time
	Register {
		/// JSON file with the character
		#[arg(long)]
		character: PathBuf,
		/// JSON file with the character's groups
		#[arg(long)]
		groups: Option<PathBuf>,
	},

	/// Reconcile an existing account with fresh directory facts
	Update {
		#[arg(long)]
		character: PathBuf,
		#[arg(long)]
		groups: Option<PathBuf>,
	},

	/// Print credentials for characters, rotating on owner change
	Fetch {
		/// JSON file with an array of characters
		#[arg(long)]
		characters: PathBuf,
	},

	/// Generate and store a new password
	ResetPassword {
		#[arg(long)]
		id: i64,
	},

	/// List account ids, least recently updated first
	List,

	/// Show the display name a character would get, without touching the database
	Preview {
		#[arg(long)]
		character: PathBuf,
		#[arg(long)]
		groups: Option<PathBuf>,
	},
}

/// Subscriber used until the configured one is installed, so that config
/// loading itself is logged.
fn bootstrap_subscriber<W>(filter: EnvFilter, writer: W) -> impl tracing::Subscriber + Send + Sync
where
	W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(writer)
		.finish()
}

fn load_config(path: Option<&Path>) -> Result<SyncConfig, ConfigError> {
	match path {
		Some(path) => mumble_config::load_config_with_file(path),
		None => mumble_config::load_config(),
	}
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let args = Args::parse();

	dotenvy::dotenv().ok();

	let bootstrap = bootstrap_subscriber(
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
		std::io::stderr,
	);
	let config = tracing::subscriber::with_default(bootstrap, || {
		load_config(args.config.as_deref())
	})?;

	tracing_subscriber::registry()
		.with(
			EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| config.logging.level.clone().into()),
		)
		.with(
			config
				.logging
				.json
				.then(|| tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)),
		)
		.with(
			(!config.logging.json)
				.then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)),
		)
		.init();

	commands::run(args.command, &config).await
}
