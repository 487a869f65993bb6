// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::sync::Arc;

use flagkit_core::{FlagsError, Result};
use tracing::debug;

use crate::manager::FlagKitManager;
use crate::provider::FlagProvider;
use crate::repository::{FlagRepository, ProviderFlagRepository};
use crate::usecase::{FetchFlagsUseCase, GetFlagStatusUseCase, ObserveFlagStatusUseCase};

/// Builder for [`FlagKitManager`].
///
/// A provider is mandatory; [`build`](FlagKitBuilder::build) fails without one.
///
/// ```
/// use std::sync::Arc;
/// use flagkit::{FlagKitBuilder, InMemoryFlagCache, MapBasedFlagProvider};
///
/// let cache = InMemoryFlagCache::new();
/// let provider = MapBasedFlagProvider::map_based(Arc::new(cache));
///
/// let manager = FlagKitBuilder::new().with_provider(provider).build().unwrap();
/// assert!(!manager.is_feature_enabled("show_greeting"));
/// ```
#[derive(Default)]
pub struct FlagKitBuilder {
	provider: Option<Arc<dyn FlagProvider>>,
}

impl FlagKitBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the flag provider. Replaces any provider set earlier.
	pub fn with_provider<P>(self, provider: P) -> Self
	where
		P: FlagProvider + 'static,
	{
		self.with_shared_provider(Arc::new(provider))
	}

	/// Sets a provider the caller keeps a handle to, e.g. to push new remote values.
	pub fn with_shared_provider(mut self, provider: Arc<dyn FlagProvider>) -> Self {
		self.provider = Some(provider);
		self
	}

	/// Wires provider → repository → use cases → manager.
	pub fn build(self) -> Result<FlagKitManager> {
		let provider = self
			.provider
			.ok_or_else(|| FlagsError::configuration("a flag provider must be set with with_provider()"))?;

		let repository: Arc<dyn FlagRepository> = Arc::new(ProviderFlagRepository::new(provider));

		let manager = FlagKitManager::new(
			GetFlagStatusUseCase::new(repository.clone()),
			ObserveFlagStatusUseCase::new(repository.clone()),
			FetchFlagsUseCase::new(repository),
		);
		debug!("Flag manager built");
		Ok(manager)
	}
}

impl std::fmt::Debug for FlagKitBuilder {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("FlagKitBuilder")
			.field("provider", &self.provider.is_some())
			.finish()
	}
}
