//! Configuration for the static policy plugin.

use std::collections::BTreeMap;
use std::path::Path;

use access_control_sdk::Policy;
use figment::Figment;
use figment::providers::{Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};

use crate::error::StaticPolicyError;

/// Declared policies, keyed by target name.
///
/// ```yaml
/// types:
///   Invoice:
///     policies:
///       - kind: role
///         role: ROLE_ACCOUNTANT
///     methods:
///       pay:
///         - kind: method
///           expression: canPay(amount)
/// functions:
///   export_invoices:
///     - kind: deny
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StaticPolicyPluginConfig {
    /// Policies per type name. A declared type exists for `Delegate`.
    pub types: BTreeMap<String, TypePolicies>,

    /// Policies per free function name.
    pub functions: BTreeMap<String, Vec<Policy>>,
}

/// Policies of one type and of its methods.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TypePolicies {
    pub policies: Vec<Policy>,
    pub methods: BTreeMap<String, Vec<Policy>>,
}

impl StaticPolicyPluginConfig {
    /// Parse a YAML document.
    ///
    /// # Errors
    ///
    /// Returns [`StaticPolicyError::Config`] on malformed YAML or unknown keys.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, StaticPolicyError> {
        Self::from_figment(&Self::base().merge(Yaml::string(yaml)))
    }

    /// Read a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`StaticPolicyError::Read`] when the file cannot be read and
    /// [`StaticPolicyError::Config`] when its content is invalid.
    pub fn from_yaml_file(path: &Path) -> Result<Self, StaticPolicyError> {
        let yaml = std::fs::read_to_string(path).map_err(|source| StaticPolicyError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&yaml)
    }

    fn base() -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
    }

    fn from_figment(figment: &Figment) -> Result<Self, StaticPolicyError> {
        figment
            .extract()
            .map_err(|e| StaticPolicyError::Config(Box::new(e)))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn parses_every_target_kind() {
        let config = StaticPolicyPluginConfig::from_yaml_str(
            r"
types:
  Invoice:
    policies:
      - kind: resource
        resource_type: invoice
        id_accessor: id
      - kind: all_or_nothing
      - kind: role
        role: ROLE_ACCOUNTANT
    methods:
      pay:
        - kind: allow
          reason: accountants pay
functions:
  export_invoices:
    - kind: deny
",
        )
        .unwrap();

        let invoice = &config.types["Invoice"];
        assert_eq!(
            invoice.policies,
            [
                Policy::resource("invoice", "id"),
                Policy::AllOrNothing,
                Policy::role("ROLE_ACCOUNTANT"),
            ]
        );
        assert_eq!(
            invoice.methods["pay"],
            [Policy::Allow {
                reason: Some("accountants pay".to_owned())
            }]
        );
        assert_eq!(config.functions["export_invoices"], [Policy::deny()]);
    }

    #[test]
    fn empty_document_is_empty_config() {
        let config = StaticPolicyPluginConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, StaticPolicyPluginConfig::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = StaticPolicyPluginConfig::from_yaml_str("typo: {}").unwrap_err();
        assert!(matches!(err, StaticPolicyError::Config(_)));

        let err = StaticPolicyPluginConfig::from_yaml_str(
            "types:\n  Invoice:\n    policy: []\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("policy"));
    }

    #[test]
    fn unknown_policy_kinds_are_kept_as_unrecognized() {
        let config = StaticPolicyPluginConfig::from_yaml_str(
            "functions:\n  f:\n    - kind: quorum\n",
        )
        .unwrap();
        assert_eq!(config.functions["f"], [Policy::Unrecognized]);
    }

    #[test]
    fn missing_file_is_an_error() {
        let err =
            StaticPolicyPluginConfig::from_yaml_file(Path::new("/nonexistent/policies.yaml"))
                .unwrap_err();
        assert!(matches!(err, StaticPolicyError::Read { .. }));
        assert!(err.to_string().contains("/nonexistent/policies.yaml"));
    }
}
