// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use std::env;
use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_FILTER_ENV: &str = "REMEDIA_LOG";

/// Installs the global subscriber. The terminal belongs to the TUI, so
/// everything goes to `path` without ANSI colors.
pub fn init(config_level: &str, path: &Path) -> Result<()> {
    let filter = resolve_filter(env::var(LOG_FILTER_ENV).ok().as_deref(), config_level)?;
    let file = open_log_file(path)?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .context("install tracing subscriber")?;
    Ok(())
}

fn resolve_filter(env_directives: Option<&str>, config_level: &str) -> Result<EnvFilter> {
    match env_directives.map(str::trim) {
        Some(directives) if !directives.is_empty() => EnvFilter::try_new(directives)
            .with_context(|| format!("invalid {LOG_FILTER_ENV} filter {directives:?}")),
        _ => EnvFilter::try_new(config_level)
            .with_context(|| format!("invalid log.level filter {config_level:?}")),
    }
}

fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create log directory {}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| {
            format!(
                "open log file {} -- set [log].path to a writable location",
                path.display()
            )
        })
}
