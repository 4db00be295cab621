// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Mumble account credentials.
//!
//! This crate provides:
//! - [`Secret<T>`] - a wrapper that keeps passwords out of logs and serialized output
//! - [`SecretGenerator`] - fixed-length passwords drawn from an unambiguous alphabet
//!
//! # Example
//!
//! ```
//! use mumble_common_secret::{SecretGenerator, SecretStrength};
//!
//! let generated = SecretGenerator::default().generate();
//! assert_eq!(generated.value.expose().len(), 10);
//! assert_eq!(format!("{}", generated.value), "[REDACTED]");
//! # let _ = generated.strength == SecretStrength::Cryptographic;
//! ```

mod generator;
mod secret;

pub use generator::{
	GeneratedSecret, SecretGenerator, SecretStrength, ALPHABET, DEFAULT_SECRET_LENGTH,
};
pub use secret::{Secret, SecretString, REDACTED};
