// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Use cases the manager is composed of.
//!
//! Each one wraps exactly one repository operation so it can be tested and
//! replaced on its own.

use std::sync::Arc;

use flagkit_core::Result;

use crate::cache::FlagStream;
use crate::repository::FlagRepository;

/// Retrieves the current status of a flag synchronously.
#[derive(Clone)]
pub struct GetFlagStatusUseCase {
	repository: Arc<dyn FlagRepository>,
}

impl GetFlagStatusUseCase {
	pub fn new(repository: Arc<dyn FlagRepository>) -> Self {
		Self { repository }
	}

	pub fn execute(&self, key: &str, default_value: bool) -> bool {
		self.repository.get_flag_value(key, default_value)
	}
}

/// Observes the status of a flag reactively.
#[derive(Clone)]
pub struct ObserveFlagStatusUseCase {
	repository: Arc<dyn FlagRepository>,
}

impl ObserveFlagStatusUseCase {
	pub fn new(repository: Arc<dyn FlagRepository>) -> Self {
		Self { repository }
	}

	pub fn execute(&self, key: &str, default_value: bool) -> FlagStream {
		self.repository.observe_flag_value(key, default_value)
	}
}

/// Forces a fetch of flags from the remote source.
#[derive(Clone)]
pub struct FetchFlagsUseCase {
	repository: Arc<dyn FlagRepository>,
}

impl FetchFlagsUseCase {
	pub fn new(repository: Arc<dyn FlagRepository>) -> Self {
		Self { repository }
	}

	pub async fn execute(&self) -> Result<()> {
		self.repository.refresh_flags().await
	}
}
