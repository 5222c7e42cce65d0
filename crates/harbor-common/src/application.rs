//! Identity of the running operator
//!
//! Resources generated by the operator are labelled with the operator's name
//! so that several operators can share a cluster without adopting each
//! other's objects.

/// Environment variable holding the operator name
pub const OPERATOR_NAME_ENV: &str = "HARBOR_OPERATOR_NAME";

/// Operator name used when none is configured
pub const DEFAULT_OPERATOR_NAME: &str = "harbor-operator";

/// Ambient identity of the operator process
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Application {
    name: String,
}

impl Application {
    /// Create an application identity with an explicit name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Read the application identity from `HARBOR_OPERATOR_NAME`
    pub fn from_env() -> Self {
        match std::env::var(OPERATOR_NAME_ENV) {
            Ok(name) if !name.is_empty() => Self::new(name),
            _ => Self::default(),
        }
    }

    /// Operator name, used as the `operator` label value
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Default for Application {
    fn default() -> Self {
        Self::new(DEFAULT_OPERATOR_NAME)
    }
}
