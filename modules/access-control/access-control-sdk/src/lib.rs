#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Access Control SDK
//!
//! This crate provides the public contracts of the `access_control` module:
//!
//! - [`Authorization`] - Public API trait for consumers
//! - [`PolicyLoader`], [`SubjectLocator`], [`ResourceLocator`],
//!   [`ServiceLocator`], [`RoleChecker`], [`PermissionChecker`] - Collaborator traits
//! - [`Policy`] - Policy declarations
//! - [`Value`], [`Object`], [`ValueHolder`] - Dynamic value model
//! - [`Signature`], [`Parameter`], [`ServiceMethod`] - Callable descriptors
//! - [`Context`], [`SubjectCache`] - Per-call evaluation context
//! - [`AccessError`] - Error types
//!
//! ## Usage
//!
//! ```ignore
//! use access_control_sdk::{Authorization, Context, Receiver, Value};
//!
//! // Host objects declare what policies can reach
//! #[derive(Debug)]
//! struct Invoice { owner: String }
//!
//! impl Object for Invoice {
//!     fn type_name(&self) -> &str { "Invoice" }
//!     fn property(&self, name: &str) -> Option<Value> {
//!         (name == "owner").then(|| self.owner.as_str().into())
//!     }
//! }
//!
//! let invoice: ObjectRef = Arc::new(Invoice { owner: "alice".into() });
//! if authorization.is_granted(&invoice, &Context::new())? {
//!     // ...
//! }
//!
//! let receiver = Receiver::Type("InvoiceController".to_owned());
//! authorization.is_method_granted(&receiver, "pay", &Context::new().with("amount", 12))?;
//! ```

pub mod api;
pub mod context;
pub mod error;
pub mod plugin_api;
pub mod policy;
pub mod signature;
pub mod value;

// Re-export main types at crate root
pub use api::{Authorization, AuthorizationContext, Receiver, Target};
pub use context::{Context, SubjectCache};
pub use error::AccessError;
pub use plugin_api::{
    PermissionChecker, PolicyLoader, ResourceLocator, RoleChecker, ServiceLocator, SubjectLocator,
};
pub use policy::Policy;
pub use signature::{Parameter, ServiceCallback, ServiceMethod, Signature};
pub use value::{JsonRecord, MIXED, Object, ObjectRef, Value, ValueHolder};
