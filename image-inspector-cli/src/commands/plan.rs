//! `image-inspector plan` command handler
//!
//! Assembles the inspection options in precedence order (defaults, config file,
//! environment, flags), validates them once, and renders the resulting plan that
//! the pull/scan/serve stages would receive.

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use image_inspector_core::config::InspectorConfig;
use image_inspector_core::error::{InspectorError, ValidationError};
use image_inspector_core::types::{InspectionTarget, PullPolicy, ScanType};
use image_inspector_core::util::{deduplicate, min};

use crate::cli::InspectArgs;
use crate::commands::config::redact_url;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Container IDs are shown in their short form, like `docker ps`.
const SHORT_ID_LEN: usize = 12;

/// Execute the `plan` command.
pub async fn execute(
    args: InspectArgs,
    config_path: Option<&Path>,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let config = assemble(args, config_path).await?;
    config.validate()?;

    let plan = InspectionPlan::from_config(&config).await?;
    info!(inspection_target = %plan.target, scans = plan.scans.len(), "inspection options validated");

    writer.render(&plan)
}

/// Build the configuration value from every source, without validating it.
pub async fn assemble(
    args: InspectArgs,
    config_path: Option<&Path>,
) -> Result<InspectorConfig, CliError> {
    let mut config = match config_path {
        Some(path) => {
            info!(path = %path.display(), "loading base options");
            InspectorConfig::from_file(path).await?
        }
        None => InspectorConfig::default(),
    };
    config.apply_env_overrides();
    apply_flags(args, &mut config);
    debug!(scan_types = ?config.scan_types, "options assembled");
    Ok(config)
}

/// Apply command-line flags on top of `config`.
///
/// Scalar flags replace the current value, boolean flags can only switch a
/// setting on, and repeatable flags are appended and then de-duplicated.
pub fn apply_flags(args: InspectArgs, config: &mut InspectorConfig) {
    set_if_some(&mut config.connection_uri, args.docker);
    set_if_some(&mut config.image_ref, args.image);
    set_if_some(&mut config.container_ref, args.container);
    set_if_some(&mut config.destination_path, args.path);
    set_if_some(&mut config.serve_address, args.serve);
    set_if_some(&mut config.username, args.username);
    set_if_some(&mut config.password_file, args.password_file);
    set_if_some(&mut config.scan_results_dir, args.scan_results_dir);
    set_if_some(&mut config.cve_feed_url, args.cve_url);
    set_if_some(&mut config.clamav_socket_path, args.clam_socket);
    set_if_some(&mut config.result_post_url, args.post_results_url);
    set_if_some(&mut config.result_post_token_file, args.post_results_token_file);
    set_if_some(&mut config.auth_token_file, args.auth_token_file);
    set_if_some(&mut config.pull_policy, args.pull_policy);

    config.scan_container_changes |= args.scan_container_changes;
    config.chroot_on_serve |= args.chroot;
    config.generate_html_report |= args.openscap_html_report;

    config.registry_config_files.extend(args.dockercfg);
    config.registry_config_files = deduplicate(&config.registry_config_files);
    config.scan_types.extend(args.scan_types);
    config.scan_types = deduplicate(&config.scan_types);
}

fn set_if_some(target: &mut String, value: Option<String>) {
    if let Some(value) = value {
        *target = value;
    }
}

/// Shorten a hex container ID to its first 12 characters.
///
/// Container names and image references are kept whole.
pub fn short_reference(target: &InspectionTarget) -> &str {
    let reference = target.reference();
    match target {
        InspectionTarget::Container(_) if is_container_id(reference) => {
            &reference[..min(reference.len(), SHORT_ID_LEN)]
        }
        _ => reference,
    }
}

fn is_container_id(reference: &str) -> bool {
    !reference.is_empty() && reference.bytes().all(|b| b.is_ascii_hexdigit())
}

/// How the image acquisition layer authenticates to the registry.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum RegistryAuth {
    Anonymous,
    DockerConfig { files: Vec<String> },
    Password { username: String, password_file: String },
}

/// Webdav serving settings.
#[derive(Debug, Serialize)]
pub struct ServePlan {
    pub address: String,
    pub chroot: bool,
}

/// Result delivery settings. The URL is credential-redacted.
#[derive(Debug, Serialize)]
pub struct ResultPostPlan {
    pub url: String,
    pub with_token: bool,
}

/// Validated inspection plan handed to the pull, scan and serve stages.
#[derive(Debug, Serialize)]
pub struct InspectionPlan {
    pub target: InspectionTarget,
    pub connection_uri: String,
    pub pull_policy: PullPolicy,
    pub registry_auth: RegistryAuth,
    pub scans: Vec<ScanType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scan_results_dir: Option<String>,
    pub openscap_html_report: bool,
    pub cve_feed_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clamav_socket_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serve: Option<ServePlan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_post: Option<ResultPostPlan>,
    pub auth_token_configured: bool,
}

impl InspectionPlan {
    /// Build the plan from a configuration that already passed `validate`.
    ///
    /// Resolves the shared secret and the result post token, so a token file
    /// that disappeared since validation surfaces here as a config error.
    pub async fn from_config(config: &InspectorConfig) -> Result<Self, CliError> {
        let target = config
            .target()
            .ok_or_else(|| CliError::from(ValidationError::MissingTarget))?;
        let scans = config.scan_types().map_err(InspectorError::from)?;
        let pull_policy = config.pull_policy().map_err(InspectorError::from)?;

        let registry_auth = if !config.registry_config_files.is_empty() {
            RegistryAuth::DockerConfig {
                files: config.registry_config_files.clone(),
            }
        } else if !config.username.is_empty() {
            RegistryAuth::Password {
                username: config.username.clone(),
                password_file: config.password_file.clone(),
            }
        } else {
            RegistryAuth::Anonymous
        };

        let result_post = if config.result_post_url.is_empty() {
            None
        } else {
            Some(ResultPostPlan {
                url: redact_url(&config.result_post_url),
                with_token: config.resolve_post_token().await?.is_some(),
            })
        };

        let serve = (!config.serve_address.is_empty()).then(|| ServePlan {
            address: config.serve_address.clone(),
            chroot: config.chroot_on_serve,
        });

        Ok(Self {
            target,
            connection_uri: config.connection_uri.clone(),
            pull_policy,
            registry_auth,
            scans,
            scan_results_dir: non_empty(&config.scan_results_dir),
            openscap_html_report: config.generate_html_report,
            cve_feed_url: config.cve_feed_url.clone(),
            clamav_socket_path: non_empty(&config.clamav_socket_path),
            destination_path: non_empty(&config.destination_path),
            serve,
            result_post,
            auth_token_configured: config.resolve_auth_token().await?.is_some(),
        })
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_owned())
}

impl Render for InspectionPlan {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(
            w,
            "Inspection plan: {} {}",
            self.target.kind(),
            short_reference(&self.target).bold()
        )?;
        writeln!(w, "  {:<15} {}", "Daemon:", self.connection_uri)?;
        writeln!(w, "  {:<15} {}", "Pull policy:", self.pull_policy)?;

        let auth = match &self.registry_auth {
            RegistryAuth::Anonymous => "anonymous".to_owned(),
            RegistryAuth::DockerConfig { files } => format!("dockercfg ({})", files.join(", ")),
            RegistryAuth::Password { username, .. } => format!("username {}", username),
        };
        writeln!(w, "  {:<15} {}", "Registry auth:", auth)?;

        if self.scans.is_empty() {
            writeln!(w, "  {:<15} {}", "Scans:", "none".dimmed())?;
        } else {
            let scans: Vec<&str> = self.scans.iter().map(ScanType::as_str).collect();
            writeln!(w, "  {:<15} {}", "Scans:", scans.join(", ").green())?;
        }
        if let Some(dir) = &self.scan_results_dir {
            writeln!(w, "  {:<15} {}", "Results dir:", dir)?;
        }
        if self.scans.contains(&ScanType::OpenScap) {
            writeln!(w, "  {:<15} {}", "CVE feed:", self.cve_feed_url)?;
            let html = if self.openscap_html_report { "yes" } else { "no" };
            writeln!(w, "  {:<15} {}", "HTML report:", html)?;
        }
        if let Some(socket) = &self.clamav_socket_path {
            writeln!(w, "  {:<15} {}", "ClamAV socket:", socket)?;
        }
        if let Some(path) = &self.destination_path {
            writeln!(w, "  {:<15} {}", "Extract to:", path)?;
        }
        if let Some(serve) = &self.serve {
            let chroot = if serve.chroot { " (chroot)" } else { "" };
            writeln!(w, "  {:<15} {}{}", "Serve:", serve.address, chroot)?;
        }
        if let Some(post) = &self.result_post {
            let token = if post.with_token { " (with token)" } else { "" };
            writeln!(w, "  {:<15} {}{}", "Post results:", post.url, token)?;
        }
        let auth_token = if self.auth_token_configured {
            "configured"
        } else {
            "not set"
        };
        writeln!(w, "  {:<15} {}", "Auth token:", auth_token)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image_args(image: &str) -> InspectArgs {
        InspectArgs {
            image: Some(image.to_owned()),
            ..InspectArgs::default()
        }
    }

    #[test]
    fn test_apply_flags_overrides_scalars() {
        let mut config = InspectorConfig {
            image_ref: "from-file".to_owned(),
            pull_policy: "never".to_owned(),
            ..InspectorConfig::default()
        };
        let args = InspectArgs {
            image: Some("from-flag".to_owned()),
            pull_policy: Some("always".to_owned()),
            ..InspectArgs::default()
        };
        apply_flags(args, &mut config);
        assert_eq!(config.image_ref, "from-flag");
        assert_eq!(config.pull_policy, "always");
    }

    #[test]
    fn test_apply_flags_keeps_unset_values() {
        let mut config = InspectorConfig {
            clamav_socket_path: "/run/clamd.sock".to_owned(),
            chroot_on_serve: true,
            ..InspectorConfig::default()
        };
        apply_flags(image_args("busybox"), &mut config);
        assert_eq!(config.clamav_socket_path, "/run/clamd.sock");
        assert!(config.chroot_on_serve, "absent bool flag must not reset file value");
        assert_eq!(config.connection_uri, "unix:///var/run/docker.sock");
    }

    #[test]
    fn test_apply_flags_deduplicates_repeated_values() {
        let mut config = InspectorConfig {
            scan_types: vec!["openscap".to_owned()],
            ..InspectorConfig::default()
        };
        let args = InspectArgs {
            scan_types: vec![
                "clamav".to_owned(),
                "openscap".to_owned(),
                "clamav".to_owned(),
            ],
            dockercfg: vec!["/a.json".to_owned(), "/a.json".to_owned()],
            ..InspectArgs::default()
        };
        apply_flags(args, &mut config);
        assert_eq!(config.scan_types, vec!["openscap", "clamav"]);
        assert_eq!(config.registry_config_files, vec!["/a.json"]);
    }

    #[test]
    fn test_short_reference_truncates_container_ids() {
        let container = InspectionTarget::Container(
            "3f2a9c0d1e4b5a6978877665544332211".to_owned(),
        );
        assert_eq!(short_reference(&container), "3f2a9c0d1e4b");

        let short = InspectionTarget::Container("abc".to_owned());
        assert_eq!(short_reference(&short), "abc");

        let named = InspectionTarget::Container("my-database-primary".to_owned());
        assert_eq!(short_reference(&named), "my-database-primary");

        let hex_like_name = InspectionTarget::Container("deadbeefcafe-replica".to_owned());
        assert_eq!(short_reference(&hex_like_name), "deadbeefcafe-replica");

        let image = InspectionTarget::Image(
            "registry.example.com/team/application:1.2.3".to_owned(),
        );
        assert_eq!(
            short_reference(&image),
            "registry.example.com/team/application:1.2.3"
        );
    }

    #[tokio::test]
    async fn test_plan_from_minimal_config() {
        let mut config = InspectorConfig::default();
        apply_flags(image_args("busybox"), &mut config);
        config.validate().expect("should validate");

        let plan = InspectionPlan::from_config(&config)
            .await
            .expect("plan should build");
        assert_eq!(plan.target, InspectionTarget::Image("busybox".to_owned()));
        assert_eq!(plan.pull_policy, PullPolicy::IfNotPresent);
        assert_eq!(plan.registry_auth, RegistryAuth::Anonymous);
        assert!(plan.scans.is_empty());
        assert!(plan.serve.is_none());
        assert!(plan.result_post.is_none());
        assert!(!plan.auth_token_configured);
    }

    #[tokio::test]
    async fn test_plan_redacts_post_url_and_reports_token() {
        let dir = tempfile::TempDir::new().expect("should create temp dir");
        let token = dir.path().join("token");
        std::fs::write(&token, "abc\n").expect("should write token");

        let config = InspectorConfig {
            image_ref: "busybox".to_owned(),
            result_post_url: "https://robot:pw@results.example.com/scan".to_owned(),
            result_post_token_file: token.display().to_string(),
            ..InspectorConfig::default()
        };
        config.validate().expect("should validate");

        let plan = InspectionPlan::from_config(&config)
            .await
            .expect("plan should build");
        let post = plan.result_post.expect("post plan should exist");
        assert_eq!(post.url, "https://***REDACTED***@results.example.com/scan");
        assert!(post.with_token);
    }

    #[tokio::test]
    async fn test_plan_text_rendering() {
        colored::control::set_override(false);
        let config = InspectorConfig {
            container_ref: "3f2a9c0d1e4b5a6978877665".to_owned(),
            scan_container_changes: true,
            scan_types: vec!["openscap".to_owned()],
            generate_html_report: true,
            serve_address: "0.0.0.0:8080".to_owned(),
            chroot_on_serve: true,
            ..InspectorConfig::default()
        };
        config.validate().expect("should validate");

        let plan = InspectionPlan::from_config(&config)
            .await
            .expect("plan should build");
        let mut buffer = Vec::new();
        plan.render_text(&mut buffer).expect("render should succeed");
        let output = String::from_utf8(buffer).expect("valid UTF-8");

        assert!(output.contains("Inspection plan: container 3f2a9c0d1e4b"));
        assert!(output.contains("openscap"));
        assert!(output.contains("HTML report:"));
        assert!(output.contains("0.0.0.0:8080 (chroot)"));
        assert!(output.contains("Auth token:"));
    }

    #[tokio::test]
    async fn test_plan_json_shape() {
        let config = InspectorConfig {
            image_ref: "busybox".to_owned(),
            scan_types: vec!["clamav".to_owned()],
            clamav_socket_path: "/run/clamd.sock".to_owned(),
            ..InspectorConfig::default()
        };
        config.validate().expect("should validate");

        let plan = InspectionPlan::from_config(&config)
            .await
            .expect("plan should build");
        let json = serde_json::to_value(&plan).expect("should serialize");
        assert_eq!(json["target"]["kind"], "image");
        assert_eq!(json["target"]["reference"], "busybox");
        assert_eq!(json["pull_policy"], "if-not-present");
        assert_eq!(json["scans"][0], "clamav");
        assert_eq!(json["registry_auth"]["method"], "anonymous");
        assert!(json.get("serve").is_none());
    }
}
