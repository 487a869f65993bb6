// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Example host for FlagKit.
//!
//! Builds a cache, a map-based provider and a manager, optionally activates the
//! "remote" flags, and prints the resolved values.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use flagkit::{
	ConfigurableProvider, FlagKitBuilder, FlagKitManager, FlagSet, InMemoryFlagCache, MapBasedFlagProvider,
	MapProviderConfig,
};
use futures::StreamExt;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
enum LogFormat {
	#[default]
	Pretty,
	Compact,
	Json,
}

#[derive(Parser, Debug)]
#[command(name = "flagkit-demo", version, about, long_about = None)]
struct Args {
	/// TOML file holding the remote flag set and fetch delay
	#[arg(long, env = "FLAGKIT_FLAGS")]
	flags: Option<PathBuf>,

	/// Print cached values without fetching
	#[arg(long)]
	no_fetch: bool,

	/// Print the cache contents as JSON after activation
	#[arg(long)]
	json: bool,

	/// Log output format
	#[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
	log_format: LogFormat,

	/// Flag keys to print
	#[arg(default_values_t = [String::from("show_greeting"), String::from("new_ui_enabled")])]
	keys: Vec<String>,
}

fn init_tracing(format: LogFormat) {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("flagkit=info,flagkit_demo=info"));

	match format {
		LogFormat::Json => {
			tracing_subscriber::registry()
				.with(filter)
				.with(fmt::layer().json().with_writer(std::io::stderr))
				.init();
		}
		LogFormat::Compact => {
			tracing_subscriber::registry()
				.with(filter)
				.with(fmt::layer().compact().with_writer(std::io::stderr))
				.init();
		}
		LogFormat::Pretty => {
			tracing_subscriber::registry()
				.with(filter)
				.with(fmt::layer().with_writer(std::io::stderr))
				.init();
		}
	}
}

/// Remote set used when no flags file is given.
fn demo_remote_flags() -> FlagSet {
	FlagSet::from([
		("show_greeting".to_string(), true),
		("new_ui_enabled".to_string(), false),
	])
}

fn load_config(path: Option<&PathBuf>) -> Result<MapProviderConfig> {
	let mut config = match path {
		Some(path) => MapProviderConfig::from_file(path)
			.with_context(|| format!("Failed to load flags from {}", path.display()))?,
		None => MapProviderConfig {
			flags: demo_remote_flags(),
			..MapProviderConfig::default()
		},
	};
	config.apply_env_overrides()?;
	Ok(config)
}

fn build(config: MapProviderConfig) -> Result<(FlagKitManager, InMemoryFlagCache)> {
	let cache = InMemoryFlagCache::new();
	let provider = MapBasedFlagProvider::map_based(Arc::new(cache.clone()));
	provider.configure(config)?;

	let manager = FlagKitBuilder::new().with_provider(provider).build()?;
	Ok((manager, cache))
}

fn print_flags(manager: &FlagKitManager, keys: &[String]) {
	for key in keys {
		println!("{key} = {}", manager.is_feature_enabled(key));
	}
}

/// Logs every value `key` takes until `shutdown` fires, then returns what it saw.
///
/// Pending updates are drained before the shutdown signal is honoured.
fn spawn_observer(
	manager: &FlagKitManager,
	key: String,
	mut shutdown: oneshot::Receiver<()>,
) -> JoinHandle<Vec<bool>> {
	let mut updates = manager.observe_feature(&key);
	tokio::spawn(async move {
		let mut seen = Vec::new();
		loop {
			tokio::select! {
				biased;
				Some(enabled) = updates.next() => {
					info!(flag_key = %key, enabled, "Flag observed");
					seen.push(enabled);
				}
				_ = &mut shutdown => break,
			}
		}
		seen
	})
}

#[tokio::main]
async fn main() -> Result<()> {
	let args = Args::parse();
	init_tracing(args.log_format);

	let config = load_config(args.flags.as_ref())?;
	let (manager, cache) = build(config)?;

	let observer = args.keys.first().cloned().map(|key| {
		let (stop, shutdown) = oneshot::channel();
		(stop, spawn_observer(&manager, key, shutdown))
	});

	println!("# before fetch");
	print_flags(&manager, &args.keys);

	if !args.no_fetch {
		manager
			.fetch_and_activate()
			.await
			.context("Failed to activate remote flags")?;
		println!("# after fetch");
		print_flags(&manager, &args.keys);
	}

	if let Some((stop, handle)) = observer {
		let _ = stop.send(());
		handle.await.context("Flag observer panicked")?;
	}

	if args.json {
		println!("{}", serde_json::to_string_pretty(&cache.snapshot())?);
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	#[test]
	fn default_keys() {
		let args = Args::parse_from(["flagkit-demo"]);
		assert_eq!(args.keys, vec!["show_greeting", "new_ui_enabled"]);
		assert_eq!(args.log_format, LogFormat::Pretty);
		assert!(!args.no_fetch);
	}

	#[test]
	fn explicit_keys_and_format() {
		let args = Args::parse_from(["flagkit-demo", "--log-format", "json", "--no-fetch", "beta"]);
		assert_eq!(args.keys, vec!["beta"]);
		assert_eq!(args.log_format, LogFormat::Json);
		assert!(args.no_fetch);
	}

	#[test]
	fn load_config_from_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "fetch_delay_ms = 0\n\n[flags]\nbeta = true").unwrap();

		let config = load_config(Some(&file.path().to_path_buf())).unwrap();
		assert_eq!(config.flags.get("beta"), Some(&true));
	}

	#[tokio::test]
	async fn demo_flags_activate() {
		let config = MapProviderConfig {
			fetch_delay_ms: 0,
			flags: demo_remote_flags(),
		};
		let (manager, cache) = build(config).unwrap();

		assert!(!manager.is_feature_enabled("show_greeting"));
		manager.fetch_and_activate().await.unwrap();
		assert!(manager.is_feature_enabled("show_greeting"));
		assert!(!manager.is_feature_enabled_or("new_ui_enabled", true));
		assert_eq!(cache.len(), 2);
	}

	#[tokio::test]
	async fn observer_reports_activation_before_shutdown() {
		let config = MapProviderConfig {
			fetch_delay_ms: 0,
			flags: demo_remote_flags(),
		};
		let (manager, _cache) = build(config).unwrap();
		let (stop, shutdown) = oneshot::channel();
		let handle = spawn_observer(&manager, "show_greeting".to_string(), shutdown);

		manager.fetch_and_activate().await.unwrap();
		stop.send(()).unwrap();

		let seen = handle.await.unwrap();
		assert_eq!(seen.last(), Some(&true));
	}

	#[tokio::test]
	async fn observer_stops_without_updates() {
		let (manager, _cache) = build(MapProviderConfig::default()).unwrap();
		let (stop, shutdown) = oneshot::channel();
		let handle = spawn_observer(&manager, "beta".to_string(), shutdown);

		stop.send(()).unwrap();
		let seen = handle.await.unwrap();
		assert!(seen.iter().all(|enabled| !enabled));
	}
}
