// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::sync::Arc;

use async_trait::async_trait;
use flagkit_core::{FlagSet, Result};
use tracing::{debug, info, warn};

use super::{ConfigurableProvider, FlagProvider};
use crate::cache::{FlagCache, FlagStream};

/// The backend half of a [`CachedFlagProvider`].
///
/// Implement this against a static map, a remote config service, an experimentation
/// platform, and so on. The wire protocol belongs entirely to the implementation.
#[async_trait]
pub trait RemoteFlagSource: Send + Sync {
	/// Setup accepted by [`RemoteFlagSource::configure`].
	type Options: Send;

	/// Returns every flag the backend currently knows about.
	///
	/// A flag the backend does not know is simply left out of the set. Transport
	/// or backend failures should be wrapped with
	/// [`FlagsError::remote`](flagkit_core::FlagsError::remote).
	async fn fetch_flags_from_remote(&self) -> Result<FlagSet>;

	/// One-time setup hook. Does nothing unless overridden.
	fn configure(&self, options: Self::Options) -> Result<()> {
		let _ = options;
		Ok(())
	}
}

/// Provider that reads from a [`FlagCache`] and refreshes it from a [`RemoteFlagSource`].
///
/// - Reads (`get_boolean`, `observe_boolean`) always come from the cache.
/// - `fetch_and_activate` fetches the full set and merges it into the cache. The
///   cache is not cleared first: flags missing from the latest response keep their
///   last known value.
///
/// The cache may be shared with other components; the provider does not own its
/// lifecycle.
pub struct CachedFlagProvider<S> {
	cache: Arc<dyn FlagCache>,
	source: S,
}

impl<S: RemoteFlagSource> CachedFlagProvider<S> {
	pub fn new(cache: Arc<dyn FlagCache>, source: S) -> Self {
		Self { cache, source }
	}

	pub fn cache(&self) -> &Arc<dyn FlagCache> {
		&self.cache
	}

	pub fn source(&self) -> &S {
		&self.source
	}
}

#[async_trait]
impl<S: RemoteFlagSource> FlagProvider for CachedFlagProvider<S> {
	fn get_boolean(&self, key: &str, default_value: bool) -> bool {
		self.cache.get(key, default_value)
	}

	fn observe_boolean(&self, key: &str, default_value: bool) -> FlagStream {
		self.cache.observe(key, default_value)
	}

	async fn fetch_and_activate(&self) -> Result<()> {
		debug!("Fetching flags from remote source");

		// Nothing touches the cache until the fetch has fully succeeded.
		let flags = match self.source.fetch_flags_from_remote().await {
			Ok(flags) => flags,
			Err(e) => {
				warn!(error = %e, "Failed to fetch flags from remote source");
				return Err(e);
			}
		};

		let count = flags.len();
		self.cache.put_all(flags);
		info!(count, "Remote flags activated");
		Ok(())
	}
}

impl<S: RemoteFlagSource> ConfigurableProvider for CachedFlagProvider<S> {
	type Options = S::Options;

	fn configure(&self, options: Self::Options) -> Result<()> {
		self.source.configure(options)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::cache::{InMemoryFlagCache, MockFlagCache};
	use flagkit_core::FlagsError;
	use futures::StreamExt;
	use mockall::predicate::eq;
	use std::sync::Mutex;

	struct StubSource {
		result: Mutex<Option<Result<FlagSet>>>,
	}

	impl StubSource {
		fn returning(result: Result<FlagSet>) -> Self {
			Self {
				result: Mutex::new(Some(result)),
			}
		}
	}

	#[async_trait]
	impl RemoteFlagSource for StubSource {
		type Options = ();

		async fn fetch_flags_from_remote(&self) -> Result<FlagSet> {
			self.result
				.lock()
				.unwrap()
				.take()
				.unwrap_or_else(|| Ok(FlagSet::new()))
		}
	}

	#[test]
	fn get_boolean_delegates_to_cache() {
		let mut cache = MockFlagCache::new();
		cache
			.expect_get()
			.with(eq("key"), eq(false))
			.times(1)
			.return_const(true);

		let provider = CachedFlagProvider::new(Arc::new(cache), StubSource::returning(Ok(FlagSet::new())));

		assert!(provider.get_boolean("key", false));
	}

	#[tokio::test]
	async fn observe_boolean_delegates_to_cache() {
		let mut cache = MockFlagCache::new();
		cache
			.expect_observe()
			.with(eq("key"), eq(false))
			.times(1)
			.returning(|_, _| futures::stream::iter(vec![true]).boxed());

		let provider = CachedFlagProvider::new(Arc::new(cache), StubSource::returning(Ok(FlagSet::new())));

		let first = provider.observe_boolean("key", false).next().await;
		assert_eq!(first, Some(true));
	}

	#[tokio::test]
	async fn fetch_and_activate_fetches_from_remote_and_updates_cache() {
		let new_flags = FlagSet::from([("key1".to_string(), true), ("key2".to_string(), false)]);

		let mut cache = MockFlagCache::new();
		cache
			.expect_put_all()
			.with(eq(new_flags.clone()))
			.times(1)
			.return_const(());

		let provider = CachedFlagProvider::new(Arc::new(cache), StubSource::returning(Ok(new_flags)));

		provider.fetch_and_activate().await.unwrap();
	}

	#[tokio::test]
	async fn fetch_failure_leaves_cache_untouched() {
		let mut cache = MockFlagCache::new();
		cache.expect_put_all().never();
		cache.expect_clear().never();

		let provider = CachedFlagProvider::new(
			Arc::new(cache),
			StubSource::returning(Err(FlagsError::remote("connection refused"))),
		);

		let err = provider.fetch_and_activate().await.unwrap_err();
		assert!(err.is_remote());
		assert_eq!(err.to_string(), "remote fetch failed: connection refused");
	}

	#[tokio::test]
	async fn fetch_keeps_flags_missing_from_response() {
		let cache = InMemoryFlagCache::new();
		cache.put("a", true);

		let provider = CachedFlagProvider::new(
			Arc::new(cache.clone()),
			StubSource::returning(Ok(FlagSet::from([("b".to_string(), false)]))),
		);
		provider.fetch_and_activate().await.unwrap();

		assert_eq!(
			cache.snapshot(),
			FlagSet::from([("a".to_string(), true), ("b".to_string(), false)])
		);
	}

	#[test]
	fn default_configure_is_a_no_op() {
		let cache = InMemoryFlagCache::new();
		let provider = CachedFlagProvider::new(Arc::new(cache.clone()), StubSource::returning(Ok(FlagSet::new())));

		provider.configure(()).unwrap();
		assert_eq!(cache.version(), 0);
	}
}
