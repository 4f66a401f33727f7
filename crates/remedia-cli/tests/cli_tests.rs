// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use remedia_testkit::write_temp_config;
use std::process::{Command, Output};

fn remedia(args: &[&str], config_path: &std::path::Path) -> Result<Output> {
    let output = Command::new(env!("CARGO_BIN_EXE_remedia"))
        .args(args)
        .env("REMEDIA_CONFIG_PATH", config_path)
        .env_remove("REMEDIA_LOG")
        .output()?;
    Ok(output)
}

#[test]
fn print_config_path_uses_env_override() -> Result<()> {
    let (_temp, path) = write_temp_config("version = 1\n")?;
    let output = remedia(&["--print-config-path"], &path)?;
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout)?.trim(),
        path.display().to_string()
    );
    Ok(())
}

#[test]
fn example_config_passes_check() -> Result<()> {
    let (_temp, path) = write_temp_config("")?;
    let output = remedia(&["--print-example-config"], &path)?;
    assert!(output.status.success());
    std::fs::write(&path, &output.stdout)?;

    let check = remedia(&["--check"], &path)?;
    assert!(
        check.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&check.stderr)
    );
    Ok(())
}

#[test]
fn check_rejects_bad_endpoint_override() -> Result<()> {
    let (_temp, path) = write_temp_config("version = 1\n")?;
    let output = remedia(&["--check", "--endpoint", "localhost predict"], &path)?;
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains("--endpoint"));
    assert!(stderr.contains("is not a URL"));
    Ok(())
}

#[test]
fn check_reports_unsupported_config_version() -> Result<()> {
    let (_temp, path) = write_temp_config("version = 7\n")?;
    let output = remedia(&["--check"], &path)?;
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains("unsupported config version 7"));
    assert!(stderr.contains("--print-example-config"));
    Ok(())
}

#[test]
fn unknown_flag_exits_nonzero() -> Result<()> {
    let (_temp, path) = write_temp_config("version = 1\n")?;
    let output = remedia(&["--demo"], &path)?;
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8(output.stderr)?.contains("unknown argument"));
    Ok(())
}
