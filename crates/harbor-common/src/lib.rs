//! Common types for the Harbor operator: CRDs, naming, errors and telemetry

#![deny(missing_docs)]

pub mod application;
pub mod crd;
pub mod error;
pub mod telemetry;

pub use application::Application;
pub use error::Error;

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Label key naming the Harbor component a resource belongs to
pub const APP_LABEL_KEY: &str = "app";

/// Label key naming the Harbor instance a resource belongs to
pub const HARBOR_LABEL_KEY: &str = "harbor";

/// Label key naming the operator that manages a resource
pub const OPERATOR_LABEL_KEY: &str = "operator";
