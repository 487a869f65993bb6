// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Flag keys and flag sets.

use std::collections::HashMap;

use crate::error::{FlagsError, Result};

/// A mapping from flag key to its boolean value.
///
/// This is the unit exchanged between a provider's backing source and the cache.
/// Keys are case-sensitive and opaque.
pub type FlagSet = HashMap<String, bool>;

/// Checks that `key` can identify a flag.
///
/// Keys are opaque apart from one rule: they may not be empty.
pub fn validate_flag_key(key: &str) -> Result<()> {
	if key.is_empty() {
		return Err(FlagsError::InvalidFlagKey(key.to_string()));
	}
	Ok(())
}

/// Checks every key in `flags`, failing on the first invalid one.
pub fn validate_flag_set(flags: &FlagSet) -> Result<()> {
	flags.keys().try_for_each(|key| validate_flag_key(key))
}
