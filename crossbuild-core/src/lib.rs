//! Crossbuild core library — configuration model, defaults, normalizer.
//!
//! Public API surface:
//! - [`types`] — newtypes and the canonical [`GlobalOptions`] / [`BuildJob`] model
//! - [`defaults`] — [`ConfigDefaults`], explicit immutable default tables
//! - [`error`] — [`ConfigError`]
//! - [`normalize`] — raw YAML → canonical configuration

pub mod defaults;
pub mod error;
pub mod normalize;
pub mod types;

pub use defaults::ConfigDefaults;
pub use error::ConfigError;
pub use normalize::{normalize, ConfigShape, DeprecationWarning, Normalized};
pub use types::{BuildJob, GlobalOptions, NamespaceName};
