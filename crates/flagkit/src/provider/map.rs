// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use flagkit_core::{validate_flag_set, FlagSet, Result};
use tracing::debug;

use super::cached::{CachedFlagProvider, RemoteFlagSource};
use crate::cache::FlagCache;
use crate::config::MapProviderConfig;

/// Simulated latency of a [`MapFlagSource`] fetch.
pub const DEFAULT_FETCH_DELAY: Duration = Duration::from_millis(100);

/// Converts a delay to whole milliseconds, saturating at `u64::MAX`.
pub(crate) fn delay_millis(delay: Duration) -> u64 {
	u64::try_from(delay.as_millis()).unwrap_or(u64::MAX)
}

/// A "remote" flag source backed by an in-memory map.
///
/// Fetches wait out the simulated delay with [`tokio::time::sleep`], so they must be
/// polled inside a Tokio runtime with the time driver enabled. With a zero delay no
/// timer is touched.
#[derive(Debug)]
pub struct MapFlagSource {
	remote_flags: RwLock<FlagSet>,
	fetch_delay_ms: AtomicU64,
}

impl MapFlagSource {
	pub fn new(remote_flags: FlagSet) -> Self {
		Self {
			remote_flags: RwLock::new(remote_flags),
			fetch_delay_ms: AtomicU64::new(delay_millis(DEFAULT_FETCH_DELAY)),
		}
	}

	/// Replaces the set returned by the next fetch.
	pub fn set_remote_flags(&self, flags: FlagSet) {
		*self
			.remote_flags
			.write()
			.unwrap_or_else(PoisonError::into_inner) = flags;
	}

	pub fn remote_flags(&self) -> FlagSet {
		self.remote_flags
			.read()
			.unwrap_or_else(PoisonError::into_inner)
			.clone()
	}

	pub fn set_fetch_delay(&self, delay: Duration) {
		self.fetch_delay_ms
			.store(delay_millis(delay), Ordering::SeqCst);
	}

	pub fn fetch_delay(&self) -> Duration {
		Duration::from_millis(self.fetch_delay_ms.load(Ordering::SeqCst))
	}
}

impl Default for MapFlagSource {
	fn default() -> Self {
		Self::new(FlagSet::new())
	}
}

#[async_trait]
impl RemoteFlagSource for MapFlagSource {
	type Options = MapProviderConfig;

	async fn fetch_flags_from_remote(&self) -> Result<FlagSet> {
		let delay = self.fetch_delay();
		if !delay.is_zero() {
			tokio::time::sleep(delay).await;
		}
		let flags = self.remote_flags();
		debug!(count = flags.len(), "Served flags from in-memory map");
		Ok(flags)
	}

	fn configure(&self, options: MapProviderConfig) -> Result<()> {
		validate_flag_set(&options.flags)?;
		self.set_fetch_delay(options.fetch_delay());
		self.set_remote_flags(options.flags);
		Ok(())
	}
}

/// Cached provider whose backing source is an in-memory map.
///
/// In a real provider the remote values change through the backend SDK; here they
/// are set with [`set_remote_flags`](MapBasedFlagProvider::set_remote_flags).
///
/// `fetch_and_activate` needs a Tokio runtime with the time driver enabled unless the
/// fetch delay is zero; see [`MapFlagSource`].
pub type MapBasedFlagProvider = CachedFlagProvider<MapFlagSource>;

impl CachedFlagProvider<MapFlagSource> {
	/// Creates a map-based provider with an empty remote set.
	pub fn map_based(cache: Arc<dyn FlagCache>) -> Self {
		Self::new(cache, MapFlagSource::default())
	}

	/// Creates a map-based provider that will serve `remote_flags` on fetch.
	pub fn with_flags(cache: Arc<dyn FlagCache>, remote_flags: FlagSet) -> Self {
		Self::new(cache, MapFlagSource::new(remote_flags))
	}

	pub fn with_fetch_delay(self, delay: Duration) -> Self {
		self.source().set_fetch_delay(delay);
		self
	}

	/// Updates the "remote" flags. The cache only sees them after the next fetch.
	pub fn set_remote_flags(&self, flags: FlagSet) {
		self.source().set_remote_flags(flags);
	}

	pub fn remote_flags(&self) -> FlagSet {
		self.source().remote_flags()
	}
}
