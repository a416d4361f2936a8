//! Resource locator compositions.

use std::sync::Arc;

use access_control_sdk::{ResourceLocator, Value};

/// First member result that is neither `null` nor `false`.
#[derive(Clone, Default)]
pub struct ChainResourceLocator {
    locators: Vec<Arc<dyn ResourceLocator>>,
}

impl ChainResourceLocator {
    #[must_use]
    pub fn new(locators: Vec<Arc<dyn ResourceLocator>>) -> Self {
        Self { locators }
    }
}

impl ResourceLocator for ChainResourceLocator {
    fn load_resource(&self, resource_type: &str, id: &Value) -> Option<Value> {
        self.locators
            .iter()
            .filter_map(|locator| locator.load_resource(resource_type, id))
            .find(|candidate| !candidate.is_not_found())
    }
}

/// Finds nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullResourceLocator;

impl ResourceLocator for NullResourceLocator {
    fn load_resource(&self, _resource_type: &str, _id: &Value) -> Option<Value> {
        None
    }
}
