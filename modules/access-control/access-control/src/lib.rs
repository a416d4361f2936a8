//! Access Control Module
//!
//! Declarative authorization: policies attached to types, type methods and
//! functions are evaluated by [`DefaultAuthorization`] against the subjects
//! located for the current request.
//!
//! - [`domain`] - The decision algorithm and per-kind policy handlers
//! - [`expression`] - Call expressions for `Method` and `Service` policies
//! - [`locator`] - Chain, null and in-memory collaborator implementations
//! - [`config`] - Engine configuration
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub mod domain;
pub mod expression;
pub mod locator;

pub use config::{AccessControlConfig, ConfigError};
pub use domain::DefaultAuthorization;
