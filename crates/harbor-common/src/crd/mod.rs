//! Custom Resource Definitions for the Harbor operator

mod harbor;

pub use harbor::{ComponentKind, ComponentSpec, Harbor, HarborComponents, HarborSpec};
