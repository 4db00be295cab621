// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core types for Mumble account provisioning.
//!
//! This crate provides:
//! - [`Character`] and [`Group`] - the facts supplied by the external directory
//! - [`ServiceAccount`] - the credentials handed back to the directory
//! - [`TickerScope`] - which organization level a ticker belongs to
//! - [`login_name`] - display name to login name normalization

pub mod account;
pub mod character;
pub mod login_name;

pub use account::ServiceAccount;
pub use character::{flatten_group_names, Character, CharacterId, Group, TickerScope};
pub use login_name::{candidates, normalize, MAX_LOGIN_NAME_ATTEMPTS};
