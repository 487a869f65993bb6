// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Provider configuration.
//!
//! The map-based provider can be configured from a TOML document:
//!
//! ```toml
//! fetch_delay_ms = 100
//!
//! [flags]
//! show_greeting = true
//! new_ui_enabled = false
//! ```
//!
//! `FLAGKIT_FETCH_DELAY_MS` overrides the delay from the file.

use std::path::Path;
use std::time::Duration;

use flagkit_core::{validate_flag_set, FlagSet, FlagsError, Result};
use serde::Deserialize;
use tracing::debug;

use crate::provider::map::delay_millis;
use crate::provider::DEFAULT_FETCH_DELAY;

/// Environment variable overriding [`MapProviderConfig::fetch_delay_ms`].
pub const FETCH_DELAY_ENV: &str = "FLAGKIT_FETCH_DELAY_MS";

/// Options for [`MapBasedFlagProvider`](crate::MapBasedFlagProvider).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapProviderConfig {
	/// Simulated latency of every fetch, in milliseconds.
	pub fetch_delay_ms: u64,
	/// The flag set served as the "remote" response.
	pub flags: FlagSet,
}

impl Default for MapProviderConfig {
	fn default() -> Self {
		Self {
			fetch_delay_ms: delay_millis(DEFAULT_FETCH_DELAY),
			flags: FlagSet::new(),
		}
	}
}

impl MapProviderConfig {
	/// Parses and validates a TOML document.
	pub fn from_toml_str(content: &str) -> Result<Self> {
		let config: Self = toml::from_str(content)
			.map_err(|e| FlagsError::configuration(format!("invalid provider config: {e}")))?;
		validate_flag_set(&config.flags)?;
		Ok(config)
	}

	/// Reads, parses and validates a TOML file.
	pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let content = std::fs::read_to_string(path)?;
		let config: Self = toml::from_str(&content).map_err(|e| FlagsError::Config {
			path: path.to_path_buf(),
			message: e.to_string(),
		})?;
		validate_flag_set(&config.flags)?;
		debug!(path = %path.display(), flags = config.flags.len(), "Loaded provider config");
		Ok(config)
	}

	/// Applies overrides from the process environment.
	pub fn apply_env_overrides(&mut self) -> Result<()> {
		self.apply_overrides_from(|name| std::env::var(name).ok())
	}

	/// Applies overrides using `lookup` to resolve variable names.
	pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<()>
	where
		F: Fn(&str) -> Option<String>,
	{
		if let Some(raw) = lookup(FETCH_DELAY_ENV) {
			self.fetch_delay_ms = raw.trim().parse().map_err(|_| {
				FlagsError::configuration(format!("{FETCH_DELAY_ENV} must be a number of milliseconds, got {raw:?}"))
			})?;
		}
		Ok(())
	}

	pub fn fetch_delay(&self) -> Duration {
		Duration::from_millis(self.fetch_delay_ms)
	}
}
