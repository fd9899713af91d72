//! # Forge - task runner for the sentiment service workspace.
//!
//! Invoked through the `cargo forge` alias configured in
//! `.cargo/config.toml`.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use toml::Value;

const SERVICE_PACKAGE: &str = "sentiment-service";

#[derive(Parser, Debug)]
#[command(author, version, about = "Build and maintenance tasks for the sentiment service.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Runs `cargo clippy` across the workspace with `-D warnings`.
    Lint,

    /// Runs all unit and integration tests in the workspace.
    Test,

    /// Writes the service's OpenAPI document to the path configured in
    /// `[package.metadata.sentiment] openapi_output`.
    Openapi,
}

fn main() -> Result<()> {
    // `cargo forge` passes "forge" as the first argument.
    let mut args: Vec<String> = env::args().collect();
    if args.get(1).map(|s| s.as_str()) == Some("forge") {
        args.remove(1);
    }

    let cli = Cli::parse_from(args);

    match cli.command {
        Commands::Lint => lint()?,
        Commands::Test => test()?,
        Commands::Openapi => openapi()?,
    }

    Ok(())
}

fn lint() -> Result<()> {
    println!("▶️  Running linter...");

    let project_root = get_project_root()?;
    let status = Command::new("cargo")
        .current_dir(&project_root)
        .args(["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"])
        .status()
        .context("Failed to run cargo clippy")?;

    if !status.success() {
        anyhow::bail!("Clippy found errors.");
    }

    println!("✅ All checks passed.");
    Ok(())
}

fn test() -> Result<()> {
    println!("▶️  Running all tests...");

    let project_root = get_project_root()?;
    let status = Command::new("cargo")
        .current_dir(&project_root)
        .args(["test", "--workspace"])
        .status()
        .context("Failed to run cargo test")?;

    if !status.success() {
        anyhow::bail!("Tests failed.");
    }

    println!("✅ All tests passed.");
    Ok(())
}

fn openapi() -> Result<()> {
    println!("▶️  Generating OpenAPI document...");

    let project_root = get_project_root()?;
    let service_dir = project_root.join(SERVICE_PACKAGE);

    let output = Command::new("cargo")
        .current_dir(&project_root)
        .args(["run", "--quiet", "-p", SERVICE_PACKAGE, "--bin", "openapi-spec-generator"])
        .output()
        .context("Failed to run openapi-spec-generator")?;

    if !output.status.success() {
        anyhow::bail!(
            "openapi-spec-generator failed:\n{}",
            String::from_utf8_lossy(&output.stderr)
        );
    }

    let output_path = get_openapi_output_path(&service_dir)
        .unwrap_or_else(|| service_dir.join("openapi.json"));
    fs::write(&output_path, &output.stdout)
        .with_context(|| format!("Failed to write {}", output_path.display()))?;

    println!("✅ OpenAPI document written to {}", output_path.display());
    Ok(())
}

fn get_project_root() -> Result<PathBuf> {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .context("Failed to get project root")
        .map(|p| p.to_path_buf())
}

/// Reads `openapi_output` from `[package.metadata.sentiment]` in the
/// member's `Cargo.toml`, relative to that member.
fn get_openapi_output_path(workspace_member: &Path) -> Option<PathBuf> {
    let toml_content = fs::read_to_string(workspace_member.join("Cargo.toml")).ok()?;
    let toml_value: Value = toml::from_str(&toml_content).ok()?;

    let output = toml_value
        .get("package")?
        .get("metadata")?
        .get("sentiment")?
        .get("openapi_output")?
        .as_str()?;

    Some(workspace_member.join(output))
}
