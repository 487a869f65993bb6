// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Local flag cache.
//!
//! The cache is the authoritative in-process copy of the last known flag values.
//! Reads are synchronous and never touch the network. Every mutation advances a
//! logical version carried on a [`tokio::sync::watch`] channel; observers wake on
//! any change and re-read their own key.
//!
//! ```text
//!   put / put_all / clear
//!          │
//!          ▼
//!   ┌──────────────┐   version += 1   ┌───────────────────┐
//!   │ RwLock<map>  │ ───────────────▶ │ watch::Sender<u64> │
//!   └──────────────┘                  └───────────────────┘
//!          ▲                            │      │      │
//!          │ get(key, default)          ▼      ▼      ▼
//!          └──────────────────────── observer observer observer
//! ```
//!
//! Fan-out cost per mutation is O(observers), independent of which keys changed.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use flagkit_core::FlagSet;
use futures::stream::{self, BoxStream, StreamExt};
use tokio::sync::watch;
use tracing::{debug, warn};

/// A live sequence of values for one flag.
///
/// The stream is infinite; dropping it ends the subscription.
pub type FlagStream = BoxStream<'static, bool>;

/// Contract for a local cache of flag values.
///
/// Implementations must be safe to read and write from many threads at once
/// without external locking.
#[cfg_attr(test, mockall::automock)]
pub trait FlagCache: Send + Sync {
	/// Returns the stored value for `key`, or `default_value` if the key is unknown.
	fn get(&self, key: &str, default_value: bool) -> bool;

	/// Inserts or replaces one entry and notifies observers.
	fn put(&self, key: &str, value: bool);

	/// Merges `flags` into the cache and notifies observers once.
	///
	/// Keys absent from `flags` keep their current value.
	fn put_all(&self, flags: FlagSet);

	/// Observes the resolved value of `key`.
	///
	/// The stream yields the current value immediately, then re-reads the key after
	/// every mutation anywhere in the cache.
	fn observe(&self, key: &str, default_value: bool) -> FlagStream;

	/// Removes every entry and notifies observers once.
	fn clear(&self);
}

/// In-memory [`FlagCache`] backed by a read-write locked map.
///
/// Cloning is cheap and every clone shares the same storage and change signal.
#[derive(Debug, Clone)]
pub struct InMemoryFlagCache {
	inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
	flags: RwLock<FlagSet>,
	version: watch::Sender<u64>,
}

impl InMemoryFlagCache {
	/// Creates an empty cache.
	pub fn new() -> Self {
		let (version, _) = watch::channel(0);
		Self {
			inner: Arc::new(Inner {
				flags: RwLock::new(FlagSet::new()),
				version,
			}),
		}
	}

	/// Returns the number of cached flags.
	pub fn len(&self) -> usize {
		self.read().len()
	}

	/// Returns true if no flags are cached.
	pub fn is_empty(&self) -> bool {
		self.read().is_empty()
	}

	/// Returns a copy of every cached flag.
	pub fn snapshot(&self) -> FlagSet {
		self.read().clone()
	}

	/// Returns the logical clock advanced by every mutation.
	///
	/// The value only signals that something changed; it carries no other meaning.
	pub fn version(&self) -> u64 {
		*self.inner.version.borrow()
	}

	fn read(&self) -> RwLockReadGuard<'_, FlagSet> {
		self.inner
			.flags
			.read()
			.unwrap_or_else(PoisonError::into_inner)
	}

	fn write(&self) -> RwLockWriteGuard<'_, FlagSet> {
		self.inner
			.flags
			.write()
			.unwrap_or_else(PoisonError::into_inner)
	}

	// Called after the write guard is released so observers never wake into a
	// half-applied mutation.
	fn notify_update(&self) {
		self.inner.version.send_modify(|version| *version += 1);
	}
}

impl Default for InMemoryFlagCache {
	fn default() -> Self {
		Self::new()
	}
}

impl FlagCache for InMemoryFlagCache {
	fn get(&self, key: &str, default_value: bool) -> bool {
		self.read().get(key).copied().unwrap_or(default_value)
	}

	fn put(&self, key: &str, value: bool) {
		if key.is_empty() {
			warn!("Provided flag key is empty. Ignoring.");
			return;
		}
		self.write().insert(key.to_string(), value);
		debug!(flag_key = %key, value, "Flag cached");
		self.notify_update();
	}

	fn put_all(&self, flags: FlagSet) {
		let count = flags.len();
		{
			let mut cached = self.write();
			for (key, value) in flags {
				if key.is_empty() {
					warn!("Provided flag key is empty. Ignoring.");
					continue;
				}
				cached.insert(key, value);
			}
		}
		debug!(count, "Flags merged into cache");
		self.notify_update();
	}

	fn observe(&self, key: &str, default_value: bool) -> FlagStream {
		let observation = Observation {
			cache: self.clone(),
			key: key.to_string(),
			default_value,
			updates: self.inner.version.subscribe(),
			primed: false,
		};

		stream::unfold(observation, |mut observation| async move {
			if observation.primed {
				observation.updates.changed().await.ok()?;
			} else {
				observation.primed = true;
			}
			let value = observation
				.cache
				.get(&observation.key, observation.default_value);
			Some((value, observation))
		})
		.boxed()
	}

	fn clear(&self) {
		self.write().clear();
		debug!("Flag cache cleared");
		self.notify_update();
	}
}

/// State carried by one observer between ticks.
struct Observation {
	cache: InMemoryFlagCache,
	key: String,
	default_value: bool,
	updates: watch::Receiver<u64>,
	primed: bool,
}
