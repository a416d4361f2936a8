//! Service locator compositions and the in-memory registry.

use std::collections::HashMap;
use std::sync::Arc;

use access_control_sdk::{ServiceLocator, ServiceMethod};

/// First member that resolves the method.
#[derive(Clone, Default)]
pub struct ChainServiceLocator {
    locators: Vec<Arc<dyn ServiceLocator>>,
}

impl ChainServiceLocator {
    #[must_use]
    pub fn new(locators: Vec<Arc<dyn ServiceLocator>>) -> Self {
        Self { locators }
    }
}

impl ServiceLocator for ChainServiceLocator {
    fn find_service_method(&self, method: &str, service: Option<&str>) -> Option<ServiceMethod> {
        self.locators
            .iter()
            .find_map(|locator| locator.find_service_method(method, service))
    }
}

/// Resolves nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullServiceLocator;

impl ServiceLocator for NullServiceLocator {
    fn find_service_method(&self, _method: &str, _service: Option<&str>) -> Option<ServiceMethod> {
        None
    }
}

/// Service methods registered up front, keyed by service and method name.
///
/// Methods registered without a service answer expressions with no
/// service prefix, e.g. `isOwner(subject, resource)`.
#[derive(Debug, Clone, Default)]
pub struct MemoryServiceLocator {
    methods: HashMap<(Option<String>, String), ServiceMethod>,
}

impl MemoryServiceLocator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `method` under `service`.
    #[must_use]
    pub fn with_service(mut self, service: impl Into<String>, method: ServiceMethod) -> Self {
        self.register(Some(service.into()), method);
        self
    }

    /// Register `method` with no service.
    #[must_use]
    pub fn with_function(mut self, method: ServiceMethod) -> Self {
        self.register(None, method);
        self
    }

    /// Register, replacing any method with the same key.
    pub fn register(&mut self, service: Option<String>, method: ServiceMethod) {
        self.methods
            .insert((service, method.name().to_owned()), method);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl ServiceLocator for MemoryServiceLocator {
    fn find_service_method(&self, method: &str, service: Option<&str>) -> Option<ServiceMethod> {
        self.methods
            .get(&(service.map(str::to_owned), method.to_owned()))
            .cloned()
    }
}
