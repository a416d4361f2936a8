//! Collaborator traits the engine is composed from.
//!
//! Each trait covers one category of external fact. Implementations are
//! typically combined through the chain implementations of the engine
//! crate: each member is tried in registration order.

use crate::error::AccessError;
use crate::policy::Policy;
use crate::signature::ServiceMethod;
use crate::value::Value;

/// Source of policy declarations.
pub trait PolicyLoader: Send + Sync {
    /// Policies declared on a type.
    ///
    /// # Errors
    ///
    /// `Configuration` if the type cannot be inspected.
    fn load_from_type(&self, type_name: &str) -> Result<Vec<Policy>, AccessError>;

    /// Policies declared on one method of a type.
    ///
    /// # Errors
    ///
    /// `Configuration` if the type or the method cannot be inspected.
    fn load_from_type_method(
        &self,
        type_name: &str,
        method: &str,
    ) -> Result<Vec<Policy>, AccessError>;

    /// Policies declared on a free function.
    ///
    /// # Errors
    ///
    /// `Configuration` if the function cannot be inspected.
    fn load_from_function(&self, function: &str) -> Result<Vec<Policy>, AccessError>;

    /// Whether `type_name` names a known type or interface.
    fn type_exists(&self, type_name: &str) -> bool;
}

/// Source of the acting principals.
pub trait SubjectLocator: Send + Sync {
    /// Subjects for the current request, possibly empty.
    fn find_subjects(&self) -> Vec<Value>;
}

/// Loads the real resource behind an identifier.
pub trait ResourceLocator: Send + Sync {
    /// `None` (or a `null`/`false` value) when nothing was found.
    fn load_resource(&self, resource_type: &str, id: &Value) -> Option<Value>;
}

/// Resolves service methods for `Service` policies.
pub trait ServiceLocator: Send + Sync {
    fn find_service_method(&self, method: &str, service: Option<&str>) -> Option<ServiceMethod>;
}

/// Must tolerate any subject value by answering `false`.
pub trait RoleChecker: Send + Sync {
    fn subject_has_role(&self, subject: &Value, role: &str) -> bool;
}

/// Must tolerate any subject value by answering `false`.
pub trait PermissionChecker: Send + Sync {
    fn subject_has_permission(&self, subject: &Value, permission: &str) -> bool;
}
