//! Policy model.
//!
//! One variant per policy kind. Policies are immutable declarations; the
//! engine decides how they combine.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single access rule attached to a type, a type method or a function.
///
/// Declarations are internally tagged by `kind`:
///
/// ```yaml
/// - kind: role
///   role: ROLE_ADMIN
/// - kind: resource
///   resource_type: invoice
///   id_accessor: invoiceId
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Policy {
    /// Unconditional grant.
    Allow {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
    /// Unconditional refusal.
    Deny {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
    /// Any subject must hold the named role.
    Role { role: String },
    /// Any subject must hold the named permission.
    Permission { permission: String },
    /// Call a method on the resource, its boolean result is the decision.
    Method { expression: String },
    /// Call a method on a located service, its boolean result is the decision.
    Service { expression: String },
    /// Replace the resource with the object located from its identifier.
    Resource {
        resource_type: String,
        id_accessor: String,
    },
    /// Evaluate the policies declared on another type instead.
    Delegate { target_type: String },
    /// Require every policy to allow instead of any.
    AllOrNothing,
    /// A declaration with a kind this version does not know.
    #[serde(other)]
    Unrecognized,
}

impl Policy {
    #[must_use]
    pub fn allow() -> Self {
        Self::Allow { reason: None }
    }

    #[must_use]
    pub fn deny() -> Self {
        Self::Deny { reason: None }
    }

    #[must_use]
    pub fn role(role: impl Into<String>) -> Self {
        Self::Role { role: role.into() }
    }

    #[must_use]
    pub fn permission(permission: impl Into<String>) -> Self {
        Self::Permission {
            permission: permission.into(),
        }
    }

    #[must_use]
    pub fn method(expression: impl Into<String>) -> Self {
        Self::Method {
            expression: expression.into(),
        }
    }

    #[must_use]
    pub fn service(expression: impl Into<String>) -> Self {
        Self::Service {
            expression: expression.into(),
        }
    }

    #[must_use]
    pub fn resource(resource_type: impl Into<String>, id_accessor: impl Into<String>) -> Self {
        Self::Resource {
            resource_type: resource_type.into(),
            id_accessor: id_accessor.into(),
        }
    }

    #[must_use]
    pub fn delegate(target_type: impl Into<String>) -> Self {
        Self::Delegate {
            target_type: target_type.into(),
        }
    }

    /// Policies consumed by the pre-scan and never dispatched.
    #[must_use]
    pub fn is_modifier(&self) -> bool {
        matches!(self, Self::Resource { .. } | Self::AllOrNothing)
    }

    /// Short kind name, matching the serde tag.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Allow { .. } => "allow",
            Self::Deny { .. } => "deny",
            Self::Role { .. } => "role",
            Self::Permission { .. } => "permission",
            Self::Method { .. } => "method",
            Self::Service { .. } => "service",
            Self::Resource { .. } => "resource",
            Self::Delegate { .. } => "delegate",
            Self::AllOrNothing => "all_or_nothing",
            Self::Unrecognized => "unrecognized",
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allow { reason } => {
                write!(f, "Allow({})", reason.as_deref().unwrap_or("No reason"))
            }
            Self::Deny { reason } => {
                write!(f, "Deny({})", reason.as_deref().unwrap_or("No reason"))
            }
            Self::Role { role } => write!(f, "Role({role})"),
            Self::Permission { permission } => write!(f, "Permission({permission})"),
            Self::Method { expression } => write!(f, "Method({expression})"),
            Self::Service { expression } => write!(f, "Service({expression})"),
            Self::Resource {
                resource_type,
                id_accessor,
            } => write!(f, "Resource({resource_type}, {id_accessor})"),
            Self::Delegate { target_type } => write!(f, "Delegate({target_type})"),
            Self::AllOrNothing => f.write_str("AllOrNothing"),
            Self::Unrecognized => f.write_str("Unrecognized"),
        }
    }
}
