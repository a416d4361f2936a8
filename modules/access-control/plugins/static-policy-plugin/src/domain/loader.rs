//! Policy loader backed by [`StaticPolicyPluginConfig`].

use std::collections::HashMap;

use access_control_sdk::{AccessError, Policy, PolicyLoader};
use tracing::{debug, info};

use crate::config::StaticPolicyPluginConfig;
use crate::error::StaticPolicyError;

/// Serves policies declared up front.
///
/// Undeclared targets have no policies. Every declared type exists for
/// `Delegate` purposes, even one with an empty policy list.
#[derive(Debug, Default)]
pub struct StaticPolicyLoader {
    types: HashMap<String, Vec<Policy>>,
    methods: HashMap<(String, String), Vec<Policy>>,
    functions: HashMap<String, Vec<Policy>>,
}

impl StaticPolicyLoader {
    /// Validate and index the declarations.
    ///
    /// # Errors
    ///
    /// - [`StaticPolicyError::DuplicateResource`] when a target declares more
    ///   than one `Resource` policy
    /// - [`StaticPolicyError::SelfDelegation`] when a type delegates to itself
    pub fn from_config(config: StaticPolicyPluginConfig) -> Result<Self, StaticPolicyError> {
        let mut loader = Self::default();

        for (type_name, declared) in config.types {
            validate(&type_name, &declared.policies)?;
            if declared
                .policies
                .iter()
                .any(|p| matches!(p, Policy::Delegate { target_type } if *target_type == type_name))
            {
                return Err(StaticPolicyError::SelfDelegation { type_name });
            }

            for (method, policies) in declared.methods {
                validate(&format!("{type_name}::{method}"), &policies)?;
                loader.methods.insert((type_name.clone(), method), policies);
            }
            loader.types.insert(type_name, declared.policies);
        }

        for (function, policies) in config.functions {
            validate(&function, &policies)?;
            loader.functions.insert(function, policies);
        }

        info!(
            types = loader.types.len(),
            methods = loader.methods.len(),
            functions = loader.functions.len(),
            "Static policies loaded"
        );
        Ok(loader)
    }
}

fn validate(target: &str, policies: &[Policy]) -> Result<(), StaticPolicyError> {
    let resources = policies
        .iter()
        .filter(|p| matches!(p, Policy::Resource { .. }))
        .count();
    if resources > 1 {
        return Err(StaticPolicyError::DuplicateResource {
            target: target.to_owned(),
        });
    }
    Ok(())
}

impl PolicyLoader for StaticPolicyLoader {
    fn load_from_type(&self, type_name: &str) -> Result<Vec<Policy>, AccessError> {
        let policies = self.types.get(type_name).cloned().unwrap_or_default();
        debug!(type_name, count = policies.len(), "Loaded type policies");
        Ok(policies)
    }

    fn load_from_type_method(
        &self,
        type_name: &str,
        method: &str,
    ) -> Result<Vec<Policy>, AccessError> {
        let policies = self
            .methods
            .get(&(type_name.to_owned(), method.to_owned()))
            .cloned()
            .unwrap_or_default();
        debug!(type_name, method, count = policies.len(), "Loaded method policies");
        Ok(policies)
    }

    fn load_from_function(&self, function: &str) -> Result<Vec<Policy>, AccessError> {
        let policies = self.functions.get(function).cloned().unwrap_or_default();
        debug!(function, count = policies.len(), "Loaded function policies");
        Ok(policies)
    }

    fn type_exists(&self, type_name: &str) -> bool {
        self.types.contains_key(type_name)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use tracing_test::traced_test;

    use super::*;

    fn loader(yaml: &str) -> Result<StaticPolicyLoader, StaticPolicyError> {
        StaticPolicyLoader::from_config(StaticPolicyPluginConfig::from_yaml_str(yaml).unwrap())
    }

    #[test]
    #[traced_test]
    fn serves_declared_policies() {
        let loader = loader(
            r"
types:
  Invoice:
    policies:
      - kind: role
        role: ROLE_ACCOUNTANT
    methods:
      pay:
        - kind: permission
          permission: invoice.pay
  Document: {}
functions:
  export_invoices:
    - kind: deny
",
        )
        .unwrap();

        assert!(logs_contain("Static policies loaded"));
        assert_eq!(
            loader.load_from_type("Invoice").unwrap(),
            [Policy::role("ROLE_ACCOUNTANT")]
        );
        assert_eq!(
            loader.load_from_type_method("Invoice", "pay").unwrap(),
            [Policy::permission("invoice.pay")]
        );
        assert_eq!(
            loader.load_from_function("export_invoices").unwrap(),
            [Policy::deny()]
        );

        assert!(loader.type_exists("Invoice"));
        assert!(loader.type_exists("Document"));
        assert!(!loader.type_exists("Receipt"));
    }

    #[test]
    fn undeclared_targets_have_no_policies() {
        let loader = loader("{}").unwrap();
        assert!(loader.load_from_type("Invoice").unwrap().is_empty());
        assert!(loader.load_from_type_method("Invoice", "pay").unwrap().is_empty());
        assert!(loader.load_from_function("export").unwrap().is_empty());
    }

    #[test]
    fn method_policies_are_not_type_policies() {
        let loader = loader("types:\n  Invoice:\n    methods:\n      pay: [{kind: allow}]\n").unwrap();
        assert!(loader.load_from_type("Invoice").unwrap().is_empty());
        assert!(loader.load_from_type_method("Receipt", "pay").unwrap().is_empty());
    }

    #[test]
    fn rejects_duplicate_resource_policies() {
        let duplicate = r"
  - kind: resource
    resource_type: invoice
    id_accessor: id
  - kind: resource
    resource_type: receipt
    id_accessor: id
";
        let err = loader(&format!("functions:\n  pay:{duplicate}")).unwrap_err();
        assert_eq!(err.to_string(), "pay declares more than one Resource policy");

        let err = loader(&format!(
            "types:\n  Invoice:\n    methods:\n      pay:{}",
            duplicate.replace("\n  ", "\n        ")
        ))
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invoice::pay declares more than one Resource policy"
        );
    }

    #[test]
    fn rejects_self_delegation() {
        let err = loader(
            "types:\n  Invoice:\n    policies:\n      - kind: delegate\n        target_type: Invoice\n",
        )
        .unwrap_err();
        assert!(matches!(err, StaticPolicyError::SelfDelegation { .. }));

        let access: AccessError = err.into();
        assert!(access.is_configuration());
        assert_eq!(access.to_string(), "Invoice cannot delegate to itself");
    }
}
