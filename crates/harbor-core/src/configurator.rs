//! Harbor Core configuration surface for the reconciler
//!
//! Wraps the generated [`CoreConfig`] into a ConfigMap ready for server-side
//! apply, and exposes the fingerprint the reconciler compares before
//! restarting Core.

use std::collections::BTreeMap;

use harbor_common::crd::{ComponentKind, Harbor};
use harbor_common::{Application, APP_LABEL_KEY, HARBOR_LABEL_KEY, OPERATOR_LABEL_KEY};
use k8s_openapi::api::core::v1::ConfigMap;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::ResourceExt;
use tracing::debug;

use crate::checksum::{ConfigFingerprint, ConfigFingerprinter, FingerprintScope};
use crate::config::{ConfigAssembler, CoreConfig};
use crate::template::ConfigTemplate;

/// Produces Core ConfigMaps and their fingerprints
#[derive(Clone, Debug)]
pub struct CoreConfigurator {
    assembler: ConfigAssembler,
    scope: FingerprintScope,
}

impl CoreConfigurator {
    /// Create a configurator embedding `template`, fingerprinting with `scope`
    pub fn new(template: ConfigTemplate, scope: FingerprintScope) -> Self {
        Self {
            assembler: ConfigAssembler::new(template),
            scope,
        }
    }

    /// Fingerprint scope in use
    pub fn scope(&self) -> FingerprintScope {
        self.scope
    }

    /// Generated Core configuration for `harbor`
    pub fn config(&self, harbor: &Harbor) -> CoreConfig {
        self.assembler.build(harbor)
    }

    /// ConfigMaps to persist for Harbor Core
    ///
    /// Always a single ConfigMap named after the Core component, labelled with
    /// the component, the Harbor instance and the managing operator.
    pub fn config_maps(&self, app: &Application, harbor: &Harbor) -> Vec<ConfigMap> {
        let config = self.assembler.build(harbor);
        let name = harbor.normalize_component_name(ComponentKind::Core);

        debug!(
            harbor = %harbor.name_any(),
            namespace = ?harbor.namespace(),
            config_map = %name,
            "generated Core ConfigMap"
        );

        vec![ConfigMap {
            metadata: ObjectMeta {
                name: Some(name),
                namespace: harbor.namespace(),
                labels: Some(BTreeMap::from([
                    (
                        APP_LABEL_KEY.to_string(),
                        ComponentKind::Core.as_str().to_string(),
                    ),
                    (HARBOR_LABEL_KEY.to_string(), harbor.name_any()),
                    (OPERATOR_LABEL_KEY.to_string(), app.name().to_string()),
                ])),
                ..Default::default()
            },
            data: Some(config.data()),
            binary_data: Some(config.binary_data()),
            ..Default::default()
        }]
    }

    /// Fingerprint compared by the reconciler to decide on a Core restart
    pub fn config_checksum(&self, harbor: &Harbor) -> ConfigFingerprint {
        let fingerprint = match self.scope {
            FingerprintScope::TrackedFields => ConfigFingerprinter::compute(&harbor.spec),
            FingerprintScope::Artifact => {
                ConfigFingerprinter::compute_artifact(&self.assembler.build(harbor))
            }
        };

        debug!(
            harbor = %harbor.name_any(),
            scope = ?self.scope,
            fingerprint = %fingerprint,
            "computed Core config fingerprint"
        );

        fingerprint
    }
}
