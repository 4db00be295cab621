// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

mod bans;
mod database;
mod logging;
mod tags;

pub use bans::{BansConfig, BansConfigLayer, DEFAULT_BAN_REASON};
pub use database::{DatabaseConfig, DatabaseConfigLayer};
pub use logging::{LoggingConfig, LoggingConfigLayer};
pub use tags::{TagsConfig, TagsConfigLayer};
