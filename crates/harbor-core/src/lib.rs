//! Harbor Core configuration assembly
//!
//! Produces the ConfigMap read by Harbor Core at startup and the fingerprint
//! the reconciler uses to decide when Core must be restarted.
//!
//! # Usage
//!
//! ```rust,ignore
//! let store = TemplateStore::new(Arc::new(EmbeddedAssets::new()));
//! let template = store.load()?; // fatal on error: the asset ships with the binary
//! let configurator = CoreConfigurator::new(template, FingerprintScope::default());
//!
//! let config_maps = configurator.config_maps(&Application::from_env(), &harbor);
//! let fingerprint = configurator.config_checksum(&harbor);
//! ```

#![deny(missing_docs)]

pub mod assets;
pub mod checksum;
pub mod config;
pub mod configurator;
pub mod template;

pub use assets::{AssetResolver, DirectoryAssets, EmbeddedAssets, CORE_CONFIG_TEMPLATE_PATH};
pub use checksum::{ConfigFingerprint, ConfigFingerprinter, FingerprintScope};
pub use config::{ConfigAssembler, CoreConfig, CONFIG_TEMPLATE_KEY};
pub use configurator::CoreConfigurator;
pub use template::{ConfigTemplate, TemplateStore};
