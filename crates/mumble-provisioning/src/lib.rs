// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Mumble account provisioning engine.
//!
//! [`ProvisioningService`] registers characters, hands out their credentials,
//! rotates secrets when a character changes owner and keeps the display name,
//! ticker and ban relations in step with directory facts.
//!
//! Operations whose cosmetic side effects may fail on their own return a
//! [`Reconciled`] value listing those failures; anything that prevents the
//! operation itself is an [`ProvisioningError`].

pub mod blocking;
pub mod error;
pub mod outcome;
pub mod policy;
pub mod service;

pub use blocking::BlockingProvisioningService;
pub use error::{ProvisioningError, Result};
pub use outcome::{PartialFailure, Reconciled};
pub use policy::BanPolicy;
pub use service::{preview_display_name, ProvisioningService};
