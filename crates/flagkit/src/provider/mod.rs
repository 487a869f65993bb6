// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Flag providers.
//!
//! A provider is wherever flag values come from. Reads are always served locally;
//! [`FlagProvider::fetch_and_activate`] pulls the latest values from the provider's
//! backing source.
//!
//! - [`CachedFlagProvider`] serves reads from a [`FlagCache`](crate::FlagCache) and
//!   merges whatever its [`RemoteFlagSource`] returns into that cache.
//! - [`MapBasedFlagProvider`] is a cached provider whose "remote" side is an in-memory
//!   map, for tests, demos and offline builds.

mod cached;
pub(crate) mod map;

use async_trait::async_trait;
use flagkit_core::Result;

use crate::cache::FlagStream;

pub use cached::{CachedFlagProvider, RemoteFlagSource};
pub use map::{MapBasedFlagProvider, MapFlagSource, DEFAULT_FETCH_DELAY};

/// Contract every flag backend implements.
///
/// The application stays agnostic to the concrete backend; swap providers at
/// composition time through [`FlagKitBuilder`](crate::FlagKitBuilder).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FlagProvider: Send + Sync {
	/// Returns the current value of a flag without performing I/O.
	fn get_boolean(&self, key: &str, default_value: bool) -> bool;

	/// Observes the value of a flag as it changes.
	fn observe_boolean(&self, key: &str, default_value: bool) -> FlagStream;

	/// Fetches the latest flags from the backing source and activates them.
	///
	/// Errors from the backing source are returned unchanged.
	async fn fetch_and_activate(&self) -> Result<()>;
}

/// A provider that accepts one-time, implementation-specific setup.
///
/// Each provider chooses its own [`Options`](ConfigurableProvider::Options) type, e.g.
/// credentials or an SDK client handle. Providers with nothing to configure use `()`.
pub trait ConfigurableProvider: FlagProvider {
	type Options;

	/// Applies `options`. The default implementation does nothing.
	fn configure(&self, options: Self::Options) -> Result<()> {
		let _ = options;
		Ok(())
	}
}
