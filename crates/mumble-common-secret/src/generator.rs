// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Password generation for Mumble accounts.
//!
//! Passwords are typed by hand into voice clients, so the alphabet drops
//! characters that are easy to confuse (`0 O o I i l L 1`).

use rand::{rngs::OsRng, RngCore};

use crate::secret::SecretString;

/// The 54 characters a generated password may contain.
pub const ALPHABET: &[u8] = b"abcdefghjkmnpqrstuvwxyzABCDEFGHJKMNPQRSTUVWXYZ23456789";

/// Length used by registration, rotation and reset.
pub const DEFAULT_SECRET_LENGTH: usize = 10;

/// Bytes at or above this value are rejected so every alphabet index is
/// equally likely.
const ACCEPT_BELOW: usize = (256 / ALPHABET.len()) * ALPHABET.len();

/// Which random source produced a password.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretStrength {
	/// Drawn from the operating system CSPRNG.
	Cryptographic,
	/// The OS source failed and a non-cryptographic PRNG was used instead.
	/// Callers that care should rotate the credential once the OS source
	/// recovers.
	Weak,
}

/// A freshly generated password and the guarantee it was produced with.
#[derive(Debug, Clone)]
pub struct GeneratedSecret {
	pub value: SecretString,
	pub strength: SecretStrength,
}

impl GeneratedSecret {
	pub fn is_weak(&self) -> bool {
		self.strength == SecretStrength::Weak
	}
}

#[derive(Debug, Clone, Copy)]
pub struct SecretGenerator {
	length: usize,
}

impl Default for SecretGenerator {
	fn default() -> Self {
		Self {
			length: DEFAULT_SECRET_LENGTH,
		}
	}
}

impl SecretGenerator {
	/// Generate a password from the OS random source, falling back to a
	/// weaker PRNG only if the OS source reports an error.
	pub fn generate(&self) -> GeneratedSecret {
		self.generate_from(&mut OsRng)
	}

	pub(crate) fn generate_from<R: RngCore>(&self, rng: &mut R) -> GeneratedSecret {
		match sample(rng, self.length) {
			Ok(value) => GeneratedSecret {
				value: SecretString::new(value),
				strength: SecretStrength::Cryptographic,
			},
			Err(e) => {
				tracing::warn!(
					error = %e,
					"OS random source unavailable, generating password with non-cryptographic fallback"
				);
				GeneratedSecret {
					value: SecretString::new(sample_weak(self.length)),
					strength: SecretStrength::Weak,
				}
			}
		}
	}
}

fn sample<R: RngCore>(rng: &mut R, length: usize) -> Result<String, rand::Error> {
	let mut out = String::with_capacity(length);
	let mut buf = [0u8; 32];
	while out.len() < length {
		rng.try_fill_bytes(&mut buf)?;
		for byte in buf.iter().map(|b| *b as usize) {
			if byte < ACCEPT_BELOW {
				out.push(ALPHABET[byte % ALPHABET.len()] as char);
				if out.len() == length {
					break;
				}
			}
		}
	}
	Ok(out)
}

fn sample_weak(length: usize) -> String {
	(0..length)
		.map(|_| ALPHABET[fastrand::usize(..ALPHABET.len())] as char)
		.collect()
}
