//! Harbor Operator - Harbor registry lifecycle management on Kubernetes

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use kube::CustomResourceExt;
use tracing::info;

use harbor_common::application::{DEFAULT_OPERATOR_NAME, OPERATOR_NAME_ENV};
use harbor_common::crd::Harbor;
use harbor_common::telemetry::{init_telemetry, LogFormat, TelemetryConfig};
use harbor_common::{Application, Error};
use harbor_core::{
    AssetResolver, ConfigTemplate, CoreConfigurator, DirectoryAssets, EmbeddedAssets,
    FingerprintScope, TemplateStore,
};

/// Harbor - CRD-driven Kubernetes operator for the Harbor registry
#[derive(Parser, Debug)]
#[command(name = "harbor-operator", version, about, long_about = None)]
struct Cli {
    /// Generate CRD manifests and exit
    #[arg(long)]
    crd: bool,

    /// Operator name, used to label generated resources
    #[arg(long, env = OPERATOR_NAME_ENV, default_value = DEFAULT_OPERATOR_NAME)]
    operator_name: String,

    /// Load templates from this directory instead of the embedded assets
    #[arg(long, env = "HARBOR_ASSETS_DIR")]
    assets_dir: Option<PathBuf>,

    /// Log output format (text or json)
    #[arg(long, env = "HARBOR_LOG_FORMAT", default_value = "text")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render the Harbor Core ConfigMaps for a Harbor manifest
    Render {
        /// Path to a Harbor resource in YAML
        #[arg(long, short)]
        file: PathBuf,

        /// Inputs covered by the config fingerprint (tracked or artifact)
        #[arg(long, default_value = "tracked")]
        fingerprint_scope: FingerprintScope,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_telemetry(TelemetryConfig {
        format: cli.log_format,
        ..Default::default()
    })?;

    if cli.crd {
        let crd = serde_yaml::to_string(&Harbor::crd())
            .map_err(|e| Error::serialization_for("CustomResourceDefinition", e.to_string()))?;
        println!("{crd}");
        return Ok(());
    }

    let resolver = asset_resolver(cli.assets_dir.as_deref());
    let template = load_template_or_exit(resolver);
    let app = Application::new(cli.operator_name);

    match cli.command {
        Some(Commands::Render {
            file,
            fingerprint_scope,
        }) => render(&app, template, &file, fingerprint_scope),
        None => {
            info!(operator = %app.name(), bytes = template.len(), "configuration assets ready");
            Ok(())
        }
    }
}

/// Pick the asset source: a directory override, or the embedded set
fn asset_resolver(assets_dir: Option<&std::path::Path>) -> Arc<dyn AssetResolver> {
    match assets_dir {
        Some(dir) => {
            let assets = DirectoryAssets::new(dir);
            info!(dir = %assets.root().display(), "loading assets from directory");
            Arc::new(assets)
        }
        None => Arc::new(EmbeddedAssets::new()),
    }
}

/// Load the Core configuration template during bootstrap
///
/// The template is packaged with the operator; if it cannot be read the
/// process must not start serving with missing configuration.
fn load_template_or_exit(resolver: Arc<dyn AssetResolver>) -> ConfigTemplate {
    let store = TemplateStore::new(resolver);
    match store.load() {
        Ok(template) => template,
        Err(e) => {
            eprintln!(
                "CRITICAL: Failed to load Harbor Core configuration template: {}. \
                 The template ships with the operator; this indicates a packaging defect.",
                e
            );
            std::process::exit(1);
        }
    }
}

/// Print the Core ConfigMaps for the Harbor manifest at `file`
fn render(
    app: &Application,
    template: ConfigTemplate,
    file: &std::path::Path,
    scope: FingerprintScope,
) -> anyhow::Result<()> {
    let manifest = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read Harbor manifest {}", file.display()))?;
    let harbor: Harbor = serde_yaml::from_str(&manifest)
        .map_err(|e| Error::serialization_for("Harbor", e.to_string()))?;

    let configurator = CoreConfigurator::new(template, scope);
    let fingerprint = configurator.config_checksum(&harbor);

    for config_map in configurator.config_maps(app, &harbor) {
        let yaml = serde_yaml::to_string(&config_map)
            .map_err(|e| Error::serialization_for("ConfigMap", e.to_string()))?;
        println!("---\n{yaml}");
    }
    println!("# config-checksum: {fingerprint}");

    info!(
        public_url = %harbor.spec.public_url,
        fingerprint = %fingerprint,
        scope = ?scope,
        "rendered Harbor Core configuration"
    );
    Ok(())
}
