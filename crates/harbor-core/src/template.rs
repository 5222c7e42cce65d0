//! One-time loading of the Core configuration template
//!
//! The template is read from the asset resolver the first time it is needed
//! and kept for the lifetime of the store. A failed load is cached too: the
//! asset is packaged with the binary, so a missing or unreadable template is a
//! packaging defect and retrying cannot fix it.

use std::fmt;
use std::io::Read;
use std::sync::{Arc, OnceLock};

use harbor_common::Error;
use tracing::{error, info};

use crate::assets::{AssetResolver, CORE_CONFIG_TEMPLATE_PATH};

/// Immutable template bytes, cheap to clone
#[derive(Clone, PartialEq, Eq)]
pub struct ConfigTemplate(Arc<[u8]>);

impl ConfigTemplate {
    /// Wrap raw template bytes
    pub fn new(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self(bytes.into())
    }

    /// Template content
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Template size in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the template is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for ConfigTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigTemplate")
            .field("len", &self.0.len())
            .finish()
    }
}

/// Loads a configuration template exactly once and caches it
pub struct TemplateStore {
    resolver: Arc<dyn AssetResolver>,
    path: String,
    template: OnceLock<Result<ConfigTemplate, String>>,
}

impl TemplateStore {
    /// Create a store for the Core configuration template
    pub fn new(resolver: Arc<dyn AssetResolver>) -> Self {
        Self::with_path(resolver, CORE_CONFIG_TEMPLATE_PATH)
    }

    /// Create a store for the template at a custom asset path
    pub fn with_path(resolver: Arc<dyn AssetResolver>, path: impl Into<String>) -> Self {
        Self {
            resolver,
            path: path.into(),
            template: OnceLock::new(),
        }
    }

    /// Asset path this store loads from
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Get the template, reading it on first use
    ///
    /// Concurrent first callers block until the single read completes and
    /// then all observe the same result.
    pub fn load(&self) -> Result<ConfigTemplate, Error> {
        let result = self
            .template
            .get_or_init(|| Self::read_template(self.resolver.as_ref(), &self.path));
        match result {
            Ok(template) => Ok(template.clone()),
            Err(message) => Err(Error::asset(&self.path, message.clone())),
        }
    }

    fn read_template(resolver: &dyn AssetResolver, path: &str) -> Result<ConfigTemplate, String> {
        let mut file = resolver.open(path).map_err(|e| {
            error!(asset = %path, error = %e, "failed to open configuration template");
            format!("cannot open Core configuration template: {}", e)
        })?;

        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes).map_err(|e| {
            error!(asset = %path, error = %e, "failed to read configuration template");
            format!("cannot read Core configuration template: {}", e)
        })?;

        info!(asset = %path, bytes = bytes.len(), "loaded configuration template");
        Ok(ConfigTemplate::new(bytes))
    }
}

impl fmt::Debug for TemplateStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateStore")
            .field("path", &self.path)
            .field("loaded", &self.template.get().is_some())
            .finish()
    }
}
