//! Configuration for the access control engine.

use std::path::Path;

use access_control_sdk::AccessError;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};

/// Environment variable prefix, e.g. `ACCESS_CONTROL_DEBUG=true`.
pub const ENV_PREFIX: &str = "ACCESS_CONTROL_";

/// Keys read from the environment; other `ACCESS_CONTROL_*` variables are
/// ignored.
const ENV_KEYS: [&str; 2] = ["debug", "deny_if_no_policies"];

/// Errors raised while loading configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("invalid access control configuration: {0}")]
    Invalid(#[from] Box<figment::Error>),
}

impl From<ConfigError> for AccessError {
    fn from(e: ConfigError) -> Self {
        Self::configuration(e.to_string())
    }
}

/// Configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AccessControlConfig {
    /// Propagate configuration errors instead of denying.
    pub debug: bool,
    /// Decision when a target declares no policy at all.
    pub deny_if_no_policies: bool,
}

impl AccessControlConfig {
    /// Defaults, overridden by `ACCESS_CONTROL_*` environment variables.
    #[must_use]
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Self::default())).merge(env())
    }

    /// Defaults, overridden by the YAML file at `path`, overridden by the
    /// environment. A missing file leaves the defaults in place.
    #[must_use]
    pub fn figment_with_file(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Yaml::file(path))
            .merge(env())
    }

    /// Extract from any prepared figment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] on unknown keys or mistyped values.
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        figment.extract().map_err(|e| ConfigError::Invalid(Box::new(e)))
    }

    /// Load from an optional YAML file and the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] on unknown keys or mistyped values.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let figment = match path {
            Some(path) => Self::figment_with_file(path),
            None => Self::figment(),
        };
        Self::from_figment(&figment)
    }
}

fn env() -> Env {
    Env::prefixed(ENV_PREFIX).only(&ENV_KEYS)
}
