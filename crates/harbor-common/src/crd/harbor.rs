//! Harbor CRD types
//!
//! A `Harbor` resource describes one deployment of the Harbor registry. The
//! mandatory components (core, jobservice, portal, registry) are always
//! deployed; optional siblings (ChartMuseum, Clair, Notary) are toggled by the
//! presence of their spec.

use kube::{CustomResource, ResourceExt};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Specification for a Harbor deployment
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[kube(
    group = "containerregistry.ovhcloud.com",
    version = "v1alpha1",
    kind = "Harbor",
    plural = "harbors",
    namespaced,
    printcolumn = r#"{"name":"Version","type":"string","jsonPath":".spec.harborVersion"}"#,
    printcolumn = r#"{"name":"Public URL","type":"string","jsonPath":".spec.publicURL"}"#,
    printcolumn = r#"{"name":"Age","type":"date","jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct HarborSpec {
    /// Harbor release deployed by this resource
    #[serde(default)]
    pub harbor_version: String,

    /// Public base URL under which Harbor is reachable (e.g. `https://registry.example.org`)
    #[serde(rename = "publicURL")]
    pub public_url: String,

    /// Secret holding the TLS certificate for the public endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls_secret_name: Option<String>,

    /// Secret holding the initial admin password
    #[serde(default)]
    pub admin_password_secret: String,

    /// Priority class value applied to Harbor pods
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,

    /// Component settings
    #[serde(default)]
    pub components: HarborComponents,
}

/// Per-component settings for a Harbor deployment
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HarborComponents {
    /// Core API server
    #[serde(default)]
    pub core: ComponentSpec,

    /// Asynchronous job service
    #[serde(default)]
    pub job_service: ComponentSpec,

    /// Web UI
    #[serde(default)]
    pub portal: ComponentSpec,

    /// Docker distribution registry and its controller
    #[serde(default)]
    pub registry: ComponentSpec,

    /// Helm chart repository; deployed only when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart_museum: Option<ComponentSpec>,

    /// Vulnerability scanner; deployed only when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clair: Option<ComponentSpec>,

    /// Content trust server and signer; deployed only when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notary: Option<ComponentSpec>,
}

/// Deployment settings shared by every Harbor component
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ComponentSpec {
    /// Container image override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Replica count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replicas: Option<i32>,
}

/// Harbor components addressable by network name
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// Core API server
    Core,
    /// Job service
    JobService,
    /// Web UI
    Portal,
    /// Registry (and registryctl on a secondary port)
    Registry,
    /// Helm chart repository
    ChartMuseum,
    /// Vulnerability scanner
    Clair,
    /// Notary server
    NotaryServer,
    /// Notary signer
    NotarySigner,
}

impl ComponentKind {
    /// Component name used in resource names and the `app` label
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Core => "core",
            Self::JobService => "jobservice",
            Self::Portal => "portal",
            Self::Registry => "registry",
            Self::ChartMuseum => "chartmuseum",
            Self::Clair => "clair",
            Self::NotaryServer => "notary-server",
            Self::NotarySigner => "notary-signer",
        }
    }
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Harbor {
    /// Name of the Kubernetes objects (and service hostname) for a component
    /// of this Harbor instance: `<harbor name>-<component>`.
    pub fn normalize_component_name(&self, kind: ComponentKind) -> String {
        format!("{}-{}", self.name_any(), kind.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kube::CustomResourceExt;

    fn sample_harbor() -> Harbor {
        let mut harbor = Harbor::new(
            "registry",
            HarborSpec {
                public_url: "https://registry.example.org".to_string(),
                ..Default::default()
            },
        );
        harbor.metadata.namespace = Some("harbor-system".to_string());
        harbor
    }

    // ==========================================================================
    // Story: Component naming
    // ==========================================================================

    #[test]
    fn when_normalizing_names_harbor_name_prefixes_component() {
        let harbor = sample_harbor();
        assert_eq!(
            harbor.normalize_component_name(ComponentKind::Core),
            "registry-core"
        );
        assert_eq!(
            harbor.normalize_component_name(ComponentKind::NotaryServer),
            "registry-notary-server"
        );
        assert_eq!(
            harbor.normalize_component_name(ComponentKind::ChartMuseum),
            "registry-chartmuseum"
        );
    }

    #[test]
    fn component_kind_displays_as_its_name() {
        assert_eq!(ComponentKind::JobService.to_string(), "jobservice");
        assert_eq!(ComponentKind::NotarySigner.to_string(), "notary-signer");
    }

    // ==========================================================================
    // Story: Manifest parsing
    // ==========================================================================

    #[test]
    fn when_parsing_manifest_public_url_uses_upper_case_key() {
        let yaml = r#"
apiVersion: containerregistry.ovhcloud.com/v1alpha1
kind: Harbor
metadata:
  name: registry
  namespace: harbor-system
spec:
  harborVersion: "1.10.0"
  publicURL: https://registry.example.org
  adminPasswordSecret: admin-password
  components:
    core: {}
    jobService:
      replicas: 2
    portal: {}
    registry: {}
    clair: {}
"#;
        let harbor: Harbor = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(harbor.spec.public_url, "https://registry.example.org");
        assert_eq!(harbor.spec.components.job_service.replicas, Some(2));
        assert!(harbor.spec.components.clair.is_some());
        assert!(harbor.spec.components.chart_museum.is_none());
        assert!(harbor.spec.components.notary.is_none());
    }

    #[test]
    fn when_serializing_absent_siblings_are_omitted() {
        let harbor = sample_harbor();
        let json = serde_json::to_value(&harbor.spec).unwrap();
        assert_eq!(json["publicURL"], "https://registry.example.org");
        assert!(json["components"].get("clair").is_none());
        assert!(json["components"].get("chartMuseum").is_none());
    }

    #[test]
    fn crd_is_namespaced_under_ovh_group() {
        let crd = Harbor::crd();
        assert_eq!(
            crd.metadata.name.as_deref(),
            Some("harbors.containerregistry.ovhcloud.com")
        );
        assert_eq!(crd.spec.scope, "Namespaced");
    }
}
