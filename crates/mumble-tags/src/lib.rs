// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Display name tags for Mumble accounts.
//!
//! A tag configuration maps directory groups to short tags, one `group: tag`
//! pair per line. Each tag plays one role when building the Mumble display
//! name:
//!
//! - `pronoun` - a fixed vocabulary such as `they/them`; the first held one is shown
//! - `CEO` - shown in addition to everything else
//! - anything else is an organization tag; the first held one replaces the ticker
//!
//! # Example
//!
//! ```
//! use mumble_tags::TagConfig;
//!
//! let config = TagConfig::parse("Leadership: CEO\nFleet: Scout");
//! let name = config.display_name("Ari", ["Leadership"], Some("ABC"));
//! assert_eq!(name, "Ari (CEO) [ABC]");
//! ```

pub mod config;
pub mod error;
pub mod resolve;

pub use config::{TagConfig, TagMapping, TagRole, CEO_TAG, PRONOUN_TAGS};
pub use error::{Result, TagsError};
pub use resolve::ticker_suffix;
