//! Collaborator implementations: chains, null objects and in-memory
//! registries.

pub mod checker;
pub mod policy;
pub mod resource;
pub mod service;
pub mod subject;

pub use checker::{
    ChainPermissionChecker, ChainRoleChecker, PropertyPermissionChecker, PropertyRoleChecker,
};
pub use policy::{ChainPolicyLoader, NullPolicyLoader};
pub use resource::{ChainResourceLocator, NullResourceLocator};
pub use service::{ChainServiceLocator, MemoryServiceLocator, NullServiceLocator};
pub use subject::{
    ChainSubjectLocator, MemoryCacheSubjectLocator, NullSubjectLocator, StaticSubjectLocator,
};
