// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::path::PathBuf;

use thiserror::Error;

/// Boxed error produced by a remote flag backend.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur in the feature flags client.
///
/// A missing flag is never an error: every read takes a caller-supplied default.
#[derive(Debug, Error)]
pub enum FlagsError {
	/// The client was assembled without a required dependency, or a provider
	/// rejected its options.
	#[error("configuration error: {0}")]
	Configuration(String),

	#[error("invalid flag key: {0:?}")]
	InvalidFlagKey(String),

	/// The backing source of a provider failed to produce a flag set.
	#[error("remote fetch failed: {0}")]
	RemoteFetch(#[source] BoxError),

	#[error("invalid config file {}: {message}", .path.display())]
	Config { path: PathBuf, message: String },

	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),
}

impl FlagsError {
	/// Create a configuration error
	pub fn configuration(msg: impl Into<String>) -> Self {
		Self::Configuration(msg.into())
	}

	/// Wrap a backend failure so it can travel through the provider layers.
	pub fn remote<E>(err: E) -> Self
	where
		E: Into<BoxError>,
	{
		Self::RemoteFetch(err.into())
	}

	/// Returns true if this error came from a provider's backing source.
	pub fn is_remote(&self) -> bool {
		matches!(self, Self::RemoteFetch(_))
	}
}

pub type Result<T> = std::result::Result<T, FlagsError>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn remote_error_keeps_source() {
		let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "backend timed out");
		let err = FlagsError::remote(io);

		assert!(err.is_remote());
		assert_eq!(err.to_string(), "remote fetch failed: backend timed out");
		let source = std::error::Error::source(&err).unwrap();
		assert_eq!(source.to_string(), "backend timed out");
	}

	#[test]
	fn remote_error_from_message() {
		let err = FlagsError::remote("service unavailable");
		assert!(err.is_remote());
		assert_eq!(err.to_string(), "remote fetch failed: service unavailable");
	}

	#[test]
	fn configuration_error_display() {
		let err = FlagsError::configuration("provider must be set");
		assert!(!err.is_remote());
		assert_eq!(err.to_string(), "configuration error: provider must be set");
	}

	#[test]
	fn config_file_error_display() {
		let err = FlagsError::Config {
			path: PathBuf::from("/etc/flagkit/flags.toml"),
			message: "expected a boolean".to_string(),
		};
		assert_eq!(
			err.to_string(),
			"invalid config file /etc/flagkit/flags.toml: expected a boolean"
		);
	}
}
