//! Harbor Core configuration assembly
//!
//! Builds the environment consumed by Harbor Core at startup. Values are the
//! static defaults of the Core image, URLs of the peer components derived from
//! the Harbor naming convention, and flags telling Core which optional
//! siblings are deployed.
//!
//! Keys follow the Core environment template:
//! <https://github.com/goharbor/harbor/blob/master/make/photon/prepare/templates/core/env.jinja>

use std::collections::BTreeMap;

use harbor_common::crd::{ComponentKind, Harbor};
use k8s_openapi::ByteString;

use crate::template::ConfigTemplate;

/// Binary key holding the Core configuration template
pub const CONFIG_TEMPLATE_KEY: &str = "app.conf";

/// Path the template is mounted at inside the Core container
pub const CORE_CONFIG_PATH: &str = "/etc/core/app.conf";

/// Maximum idle connections in the Core database pool
pub const POSTGRESQL_MAX_IDLE_CONNS: u32 = 50;

/// Maximum open connections in the Core database pool
pub const POSTGRESQL_MAX_OPEN_CONNS: u32 = 1000;

const AUTH_MODE: &str = "db_auth";
const CFG_EXPIRATION: &str = "5";
const CHART_CACHE_DRIVER: &str = "memory";
const LOG_LEVEL: &str = "debug";
const REGISTRY_STORAGE_PROVIDER_NAME: &str = "memory";
const SYNC_REGISTRY: &str = "false";
const ADMIRAL_URL: &str = "NA";
const DATABASE_TYPE: &str = "postgresql";

const CLAIR_HEALTH_CHECK_PORT: u16 = 6061;
const REGISTRYCTL_PORT: u16 = 8080;
const TOKEN_SERVICE_PATH: &str = "/service/token";

/// Generated configuration for one Harbor Core instance
///
/// One field per configuration key. [`CoreConfig::data`] destructures every
/// field, so a field that is added here but not emitted fails to compile.
#[derive(Clone, Debug, PartialEq)]
pub struct CoreConfig {
    /// `CONFIG_PATH`
    pub config_path: String,
    /// `AUTH_MODE`
    pub auth_mode: String,
    /// `CFG_EXPIRATION`
    pub cfg_expiration: String,
    /// `CHART_CACHE_DRIVER`
    pub chart_cache_driver: String,
    /// `EXT_ENDPOINT`: the public URL, verbatim
    pub ext_endpoint: String,
    /// `LOG_LEVEL`
    pub log_level: String,
    /// `REGISTRY_STORAGE_PROVIDER_NAME`
    pub registry_storage_provider_name: String,
    /// `SYNC_REGISTRY`
    pub sync_registry: String,

    /// `_REDIS_URL`: session store, unset
    pub redis_url: String,
    /// `ADMIRAL_URL`
    pub admiral_url: String,
    /// `CHART_REPOSITORY_URL`
    pub chart_repository_url: String,
    /// `CLAIR_HEALTH_CHECK_SERVER_URL`
    pub clair_health_check_server_url: String,
    /// `CLAIR_URL`
    pub clair_url: String,
    /// `CORE_URL`
    pub core_url: String,
    /// `JOBSERVICE_URL`
    pub jobservice_url: String,
    /// `NOTARY_URL`
    pub notary_url: String,
    /// `PORTAL_URL`
    pub portal_url: String,
    /// `REGISTRY_URL`
    pub registry_url: String,
    /// `REGISTRYCTL_URL`
    pub registryctl_url: String,
    /// `TOKEN_SERVICE_URL`
    pub token_service_url: String,

    /// `DATABASE_TYPE`
    pub database_type: String,
    /// `POSTGRESQL_MAX_IDLE_CONNS`
    pub postgresql_max_idle_conns: u32,
    /// `POSTGRESQL_MAX_OPEN_CONNS`
    pub postgresql_max_open_conns: u32,

    /// `WITH_CHARTMUSEUM`
    pub with_chartmuseum: bool,
    /// `WITH_CLAIR`
    pub with_clair: bool,
    /// `WITH_NOTARY`
    pub with_notary: bool,

    /// `app.conf` (binary)
    pub app_conf: ConfigTemplate,
}

impl CoreConfig {
    /// Textual configuration entries, keyed by environment variable name
    pub fn data(&self) -> BTreeMap<String, String> {
        let Self {
            config_path,
            auth_mode,
            cfg_expiration,
            chart_cache_driver,
            ext_endpoint,
            log_level,
            registry_storage_provider_name,
            sync_registry,
            redis_url,
            admiral_url,
            chart_repository_url,
            clair_health_check_server_url,
            clair_url,
            core_url,
            jobservice_url,
            notary_url,
            portal_url,
            registry_url,
            registryctl_url,
            token_service_url,
            database_type,
            postgresql_max_idle_conns,
            postgresql_max_open_conns,
            with_chartmuseum,
            with_clair,
            with_notary,
            app_conf: _,
        } = self;

        [
            ("CONFIG_PATH", config_path.clone()),
            ("AUTH_MODE", auth_mode.clone()),
            ("CFG_EXPIRATION", cfg_expiration.clone()),
            ("CHART_CACHE_DRIVER", chart_cache_driver.clone()),
            ("EXT_ENDPOINT", ext_endpoint.clone()),
            ("LOG_LEVEL", log_level.clone()),
            (
                "REGISTRY_STORAGE_PROVIDER_NAME",
                registry_storage_provider_name.clone(),
            ),
            ("SYNC_REGISTRY", sync_registry.clone()),
            ("_REDIS_URL", redis_url.clone()),
            ("ADMIRAL_URL", admiral_url.clone()),
            ("CHART_REPOSITORY_URL", chart_repository_url.clone()),
            (
                "CLAIR_HEALTH_CHECK_SERVER_URL",
                clair_health_check_server_url.clone(),
            ),
            ("CLAIR_URL", clair_url.clone()),
            ("CORE_URL", core_url.clone()),
            ("JOBSERVICE_URL", jobservice_url.clone()),
            ("NOTARY_URL", notary_url.clone()),
            ("PORTAL_URL", portal_url.clone()),
            ("REGISTRY_URL", registry_url.clone()),
            ("REGISTRYCTL_URL", registryctl_url.clone()),
            ("TOKEN_SERVICE_URL", token_service_url.clone()),
            ("DATABASE_TYPE", database_type.clone()),
            (
                "POSTGRESQL_MAX_IDLE_CONNS",
                postgresql_max_idle_conns.to_string(),
            ),
            (
                "POSTGRESQL_MAX_OPEN_CONNS",
                postgresql_max_open_conns.to_string(),
            ),
            ("WITH_CHARTMUSEUM", with_chartmuseum.to_string()),
            ("WITH_CLAIR", with_clair.to_string()),
            ("WITH_NOTARY", with_notary.to_string()),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
    }

    /// Binary configuration entries (the template blob)
    pub fn binary_data(&self) -> BTreeMap<String, ByteString> {
        BTreeMap::from([(
            CONFIG_TEMPLATE_KEY.to_string(),
            ByteString(self.app_conf.as_bytes().to_vec()),
        )])
    }
}

/// Builds [`CoreConfig`] from a Harbor resource and a loaded template
///
/// Stateless apart from the injected template; safe to share between
/// concurrent reconciliations.
#[derive(Clone, Debug)]
pub struct ConfigAssembler {
    template: ConfigTemplate,
}

impl ConfigAssembler {
    /// Create an assembler that embeds `template` in every config
    pub fn new(template: ConfigTemplate) -> Self {
        Self { template }
    }

    /// Template embedded in generated configs
    pub fn template(&self) -> &ConfigTemplate {
        &self.template
    }

    /// Build the Core configuration for `harbor`
    pub fn build(&self, harbor: &Harbor) -> CoreConfig {
        let spec = &harbor.spec;
        let url = |kind: ComponentKind| http_url(harbor, kind, None);

        CoreConfig {
            config_path: CORE_CONFIG_PATH.to_string(),
            auth_mode: AUTH_MODE.to_string(),
            cfg_expiration: CFG_EXPIRATION.to_string(),
            chart_cache_driver: CHART_CACHE_DRIVER.to_string(),
            ext_endpoint: spec.public_url.clone(),
            log_level: LOG_LEVEL.to_string(),
            registry_storage_provider_name: REGISTRY_STORAGE_PROVIDER_NAME.to_string(),
            sync_registry: SYNC_REGISTRY.to_string(),

            redis_url: String::new(),
            admiral_url: ADMIRAL_URL.to_string(),
            chart_repository_url: url(ComponentKind::ChartMuseum),
            clair_health_check_server_url: http_url(
                harbor,
                ComponentKind::Clair,
                Some(CLAIR_HEALTH_CHECK_PORT),
            ),
            clair_url: url(ComponentKind::Clair),
            core_url: url(ComponentKind::Core),
            jobservice_url: url(ComponentKind::JobService),
            notary_url: url(ComponentKind::NotaryServer),
            portal_url: url(ComponentKind::Portal),
            registry_url: url(ComponentKind::Registry),
            registryctl_url: http_url(harbor, ComponentKind::Registry, Some(REGISTRYCTL_PORT)),
            token_service_url: format!("{}{}", url(ComponentKind::Core), TOKEN_SERVICE_PATH),

            database_type: DATABASE_TYPE.to_string(),
            postgresql_max_idle_conns: POSTGRESQL_MAX_IDLE_CONNS,
            postgresql_max_open_conns: POSTGRESQL_MAX_OPEN_CONNS,

            with_chartmuseum: spec.components.chart_museum.is_some(),
            with_clair: spec.components.clair.is_some(),
            with_notary: spec.components.notary.is_some(),

            app_conf: self.template.clone(),
        }
    }
}

/// In-cluster URL of a Harbor component, with an optional non-default port
fn http_url(harbor: &Harbor, kind: ComponentKind, port: Option<u16>) -> String {
    let host = harbor.normalize_component_name(kind);
    match port {
        Some(port) => format!("http://{}:{}", host, port),
        None => format!("http://{}", host),
    }
}
