// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Boolean feature flags for Rust applications.
//!
//! Flags are read synchronously from a local cache, observed as streams that
//! re-emit on every cache change, and refreshed from a remote source on demand.
//!
//! # Architecture
//!
//! ```text
//! FlagKitManager ──▶ use cases ──▶ FlagRepository ──▶ FlagProvider ──▶ FlagCache
//!                                                         │
//!                                                         └──▶ RemoteFlagSource
//! ```
//!
//! [`FlagKitBuilder`] wires these together; the only thing it needs is a provider.
//! Refreshing runs fetch-then-merge: the provider asks its source for the full flag
//! set and merges it into the cache, which wakes every observer.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use flagkit::{FlagKitBuilder, FlagSet, InMemoryFlagCache, MapBasedFlagProvider};
//!
//! # tokio_test::block_on(async {
//! let cache = InMemoryFlagCache::new();
//! let provider = MapBasedFlagProvider::with_flags(
//!     Arc::new(cache),
//!     FlagSet::from([("show_greeting".to_string(), true)]),
//! );
//!
//! let manager = FlagKitBuilder::new().with_provider(provider).build()?;
//! assert!(!manager.is_feature_enabled("show_greeting"));
//!
//! manager.fetch_and_activate().await?;
//! assert!(manager.is_feature_enabled("show_greeting"));
//! # Ok::<(), flagkit::FlagsError>(())
//! # }).unwrap();
//! ```

mod builder;
mod cache;
pub mod config;
mod manager;
pub mod provider;
mod repository;
mod usecase;

pub use builder::FlagKitBuilder;
pub use cache::{FlagCache, FlagStream, InMemoryFlagCache};
pub use config::MapProviderConfig;
pub use manager::FlagKitManager;
pub use provider::{
	CachedFlagProvider, ConfigurableProvider, FlagProvider, MapBasedFlagProvider, MapFlagSource,
	RemoteFlagSource,
};
pub use repository::{FlagRepository, ProviderFlagRepository};
pub use usecase::{FetchFlagsUseCase, GetFlagStatusUseCase, ObserveFlagStatusUseCase};

// Re-export core types for convenience
pub use flagkit_core::{validate_flag_key, BoxError, FlagSet, FlagsError, Result};
