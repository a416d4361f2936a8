//! Role and permission checkers.

use std::sync::Arc;

use access_control_sdk::{PermissionChecker, RoleChecker, Value};
use tracing::warn;

use crate::expression::get_value_from;

/// Any member grants the role.
#[derive(Clone, Default)]
pub struct ChainRoleChecker {
    checkers: Vec<Arc<dyn RoleChecker>>,
}

impl ChainRoleChecker {
    #[must_use]
    pub fn new(checkers: Vec<Arc<dyn RoleChecker>>) -> Self {
        Self { checkers }
    }
}

impl RoleChecker for ChainRoleChecker {
    fn subject_has_role(&self, subject: &Value, role: &str) -> bool {
        self.checkers
            .iter()
            .any(|checker| checker.subject_has_role(subject, role))
    }
}

/// Any member grants the permission.
#[derive(Clone, Default)]
pub struct ChainPermissionChecker {
    checkers: Vec<Arc<dyn PermissionChecker>>,
}

impl ChainPermissionChecker {
    #[must_use]
    pub fn new(checkers: Vec<Arc<dyn PermissionChecker>>) -> Self {
        Self { checkers }
    }
}

impl PermissionChecker for ChainPermissionChecker {
    fn subject_has_permission(&self, subject: &Value, permission: &str) -> bool {
        self.checkers
            .iter()
            .any(|checker| checker.subject_has_permission(subject, permission))
    }
}

/// Reads the roles of object subjects from a named property.
///
/// The property may hold a single name or a list of names. Subjects that
/// are not objects hold no role.
#[derive(Debug, Clone)]
pub struct PropertyRoleChecker {
    property: String,
}

impl PropertyRoleChecker {
    #[must_use]
    pub fn new(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
        }
    }
}

impl Default for PropertyRoleChecker {
    fn default() -> Self {
        Self::new("roles")
    }
}

impl RoleChecker for PropertyRoleChecker {
    fn subject_has_role(&self, subject: &Value, role: &str) -> bool {
        property_contains(subject, &self.property, role)
    }
}

/// Reads the permissions of object subjects from a named property.
///
/// Same shape rules as [`PropertyRoleChecker`].
#[derive(Debug, Clone)]
pub struct PropertyPermissionChecker {
    property: String,
}

impl PropertyPermissionChecker {
    #[must_use]
    pub fn new(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
        }
    }
}

impl Default for PropertyPermissionChecker {
    fn default() -> Self {
        Self::new("permissions")
    }
}

impl PermissionChecker for PropertyPermissionChecker {
    fn subject_has_permission(&self, subject: &Value, permission: &str) -> bool {
        property_contains(subject, &self.property, permission)
    }
}

fn property_contains(subject: &Value, property: &str, needle: &str) -> bool {
    let Some(object) = subject.as_object() else {
        return false;
    };

    match get_value_from(object.as_ref(), property) {
        Ok(Value::String(name)) => name == needle,
        Ok(Value::List(names)) => names.iter().any(|name| name.as_str() == Some(needle)),
        Ok(_) => false,
        Err(e) => {
            warn!(
                subject = %subject,
                property,
                error = %e,
                "Failed to read subject property"
            );
            false
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use serde_json::json;

    struct Yes;

    impl RoleChecker for Yes {
        fn subject_has_role(&self, _subject: &Value, role: &str) -> bool {
            role == "ROLE_USER"
        }
    }

    #[test]
    fn property_checker_reads_lists_and_strings() {
        let checker = PropertyRoleChecker::default();
        let user = Value::from(json!({"roles": ["ROLE_USER", "ROLE_ADMIN"]}));
        assert!(checker.subject_has_role(&user, "ROLE_ADMIN"));
        assert!(!checker.subject_has_role(&user, "ROLE_ROOT"));

        let single = Value::from(json!({"roles": "ROLE_USER"}));
        assert!(checker.subject_has_role(&single, "ROLE_USER"));
    }

    #[test]
    fn property_checker_tolerates_foreign_subjects() {
        let checker = PropertyPermissionChecker::default();
        assert!(!checker.subject_has_permission(&Value::Null, "edit"));
        assert!(!checker.subject_has_permission(&Value::from("edit"), "edit"));
        assert!(!checker.subject_has_permission(&Value::from(json!({"roles": []})), "edit"));
        assert!(!checker.subject_has_permission(&Value::from(json!({"permissions": 3})), "edit"));
        assert!(checker.subject_has_permission(
            &Value::from(json!({"permissions": ["edit"]})),
            "edit"
        ));
    }

    #[test]
    fn chain_grants_if_any_member_does() {
        let chain = ChainRoleChecker::new(vec![Arc::new(PropertyRoleChecker::default()), Arc::new(Yes)]);
        assert!(chain.subject_has_role(&Value::Null, "ROLE_USER"));
        assert!(!chain.subject_has_role(&Value::Null, "ROLE_ADMIN"));
        assert!(!ChainRoleChecker::default().subject_has_role(&Value::Null, "ROLE_USER"));
    }
}
