// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Domain-facing access to flags.

use std::sync::Arc;

use async_trait::async_trait;
use flagkit_core::Result;

use crate::cache::FlagStream;
use crate::provider::FlagProvider;

/// Single source of truth for flag values as seen by the use cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FlagRepository: Send + Sync {
	/// Gets the current value of a flag.
	fn get_flag_value(&self, key: &str, default_value: bool) -> bool;

	/// Observes changes of a flag value.
	fn observe_flag_value(&self, key: &str, default_value: bool) -> FlagStream;

	/// Refreshes the flags from the remote source.
	async fn refresh_flags(&self) -> Result<()>;
}

/// [`FlagRepository`] that delegates everything to a [`FlagProvider`].
#[derive(Clone)]
pub struct ProviderFlagRepository {
	provider: Arc<dyn FlagProvider>,
}

impl ProviderFlagRepository {
	pub fn new(provider: Arc<dyn FlagProvider>) -> Self {
		Self { provider }
	}
}

#[async_trait]
impl FlagRepository for ProviderFlagRepository {
	fn get_flag_value(&self, key: &str, default_value: bool) -> bool {
		self.provider.get_boolean(key, default_value)
	}

	fn observe_flag_value(&self, key: &str, default_value: bool) -> FlagStream {
		self.provider.observe_boolean(key, default_value)
	}

	async fn refresh_flags(&self) -> Result<()> {
		self.provider.fetch_and_activate().await
	}
}
