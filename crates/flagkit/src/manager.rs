// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use flagkit_core::Result;
use tracing::instrument;

use crate::cache::FlagStream;
use crate::usecase::{FetchFlagsUseCase, GetFlagStatusUseCase, ObserveFlagStatusUseCase};

/// Facade the application uses to work with feature flags.
///
/// Obtain one from [`FlagKitBuilder`](crate::FlagKitBuilder). Cloning is cheap; every
/// clone talks to the same provider.
///
/// Methods without an `_or` suffix resolve unknown flags to `false`.
#[derive(Clone)]
pub struct FlagKitManager {
	get_flag_status: GetFlagStatusUseCase,
	observe_flag_status: ObserveFlagStatusUseCase,
	fetch_flags: FetchFlagsUseCase,
}

impl FlagKitManager {
	pub fn new(
		get_flag_status: GetFlagStatusUseCase,
		observe_flag_status: ObserveFlagStatusUseCase,
		fetch_flags: FetchFlagsUseCase,
	) -> Self {
		Self {
			get_flag_status,
			observe_flag_status,
			fetch_flags,
		}
	}

	/// Returns true if the feature is enabled, reading from the local cache.
	pub fn is_feature_enabled(&self, key: &str) -> bool {
		self.is_feature_enabled_or(key, false)
	}

	/// Like [`is_feature_enabled`](Self::is_feature_enabled) with an explicit default
	/// for unknown flags.
	pub fn is_feature_enabled_or(&self, key: &str, default_value: bool) -> bool {
		self.get_flag_status.execute(key, default_value)
	}

	/// Observes a feature flag. The stream yields the current value, then every
	/// re-evaluation after a change.
	pub fn observe_feature(&self, key: &str) -> FlagStream {
		self.observe_feature_or(key, false)
	}

	pub fn observe_feature_or(&self, key: &str, default_value: bool) -> FlagStream {
		self.observe_flag_status.execute(key, default_value)
	}

	/// Fetches the latest flags from the remote source and activates them.
	///
	/// Concurrent calls are neither deduplicated nor ordered; the last merge to land
	/// wins for each key.
	#[instrument(skip(self))]
	pub async fn fetch_and_activate(&self) -> Result<()> {
		self.fetch_flags.execute().await
	}
}

impl std::fmt::Debug for FlagKitManager {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("FlagKitManager").finish_non_exhaustive()
	}
}
