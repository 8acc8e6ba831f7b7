//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O. Flag names follow the
//! long-standing image-inspector flags (`--docker`, `--dockercfg`, `--scan-type`, ...).

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Default configuration file used by the `config` subcommands.
pub const DEFAULT_CONFIG_PATH: &str = "image-inspector.toml";

/// image-inspector -- validate container image inspection options before any
/// image is pulled, scanned or served.
///
/// Use `image-inspector <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "image-inspector", version, about, long_about = None)]
pub struct Cli {
    /// Path to an image-inspector.toml file providing base options.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log line format written to stderr.
    #[arg(long, global = true, default_value = "pretty")]
    pub log_format: LogFormat,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

/// Supported log formats.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogFormat {
    /// JSON lines.
    Json,
    /// Human-readable multi-line output.
    Pretty,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Assemble inspection options, validate them and print the inspection plan.
    Plan(InspectArgs),

    /// Manage the configuration file.
    Config(ConfigArgs),
}

// ---- plan ----

/// Inspection options. Every flag overrides the config file and environment.
#[derive(Args, Debug, Default)]
pub struct InspectArgs {
    /// Daemon socket to connect to.
    #[arg(long = "docker", value_name = "URI")]
    pub docker: Option<String>,

    /// Docker image to inspect.
    #[arg(short, long)]
    pub image: Option<String>,

    /// Docker container to inspect.
    #[arg(long)]
    pub container: Option<String>,

    /// Scan only the changes made in the container (requires --container).
    #[arg(long)]
    pub scan_container_changes: bool,

    /// Destination path for the image files.
    #[arg(long = "path")]
    pub path: Option<String>,

    /// Host and port where to serve the image with webdav.
    #[arg(long)]
    pub serve: Option<String>,

    /// Change root when serving the image with webdav.
    #[arg(long)]
    pub chroot: bool,

    /// Location of a docker configuration file. May be given more than once.
    #[arg(long = "dockercfg", value_name = "FILE")]
    pub dockercfg: Vec<String>,

    /// Username for authenticating with the docker registry.
    #[arg(long)]
    pub username: Option<String>,

    /// File containing the password for the docker registry.
    #[arg(long)]
    pub password_file: Option<String>,

    /// Scan to run on the inspected image (openscap, clamav). May be given more than once.
    #[arg(long = "scan-type", value_name = "TYPE")]
    pub scan_types: Vec<String>,

    /// Directory that will contain the scan results.
    #[arg(long)]
    pub scan_results_dir: Option<String>,

    /// Generate an OpenSCAP HTML report in addition to the ARF report.
    #[arg(long)]
    pub openscap_html_report: bool,

    /// Alternative URL source for the CVE files.
    #[arg(long = "cve-url")]
    pub cve_url: Option<String>,

    /// Location of the clamav socket file.
    #[arg(long)]
    pub clam_socket: Option<String>,

    /// URL to post the scan results to once the scan finishes.
    #[arg(long)]
    pub post_results_url: Option<String>,

    /// File whose content is added as a token to the result post URL.
    #[arg(long)]
    pub post_results_token_file: Option<String>,

    /// File containing the shared secret used to validate webdav requests.
    #[arg(long)]
    pub auth_token_file: Option<String>,

    /// Pull policy (always, if-not-present, never).
    #[arg(long)]
    pub pull_policy: Option<String>,
}

// ---- config ----

/// Manage image-inspector configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report the first violated rule.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show,
}
