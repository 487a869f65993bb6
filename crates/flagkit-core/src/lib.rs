// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core types for FlagKit boolean feature flags.
//!
//! This crate holds the vocabulary shared by the client library (`flagkit`) and
//! anything implementing a flag backend for it: the [`FlagSet`] exchanged between a
//! provider and its cache, flag key validation, and the [`FlagsError`] taxonomy.
//!
//! # Example
//!
//! ```
//! use flagkit_core::{validate_flag_key, FlagSet};
//!
//! let mut flags = FlagSet::new();
//! flags.insert("show_greeting".to_string(), true);
//!
//! assert!(validate_flag_key("show_greeting").is_ok());
//! assert!(validate_flag_key("").is_err());
//! ```

pub mod error;
pub mod flag;

pub use error::{BoxError, FlagsError, Result};
pub use flag::{validate_flag_key, validate_flag_set, FlagSet};
