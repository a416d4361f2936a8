//! Policy loader compositions.

use std::sync::Arc;

use access_control_sdk::{AccessError, Policy, PolicyLoader};

/// Concatenates the policies of every member, in registration order.
#[derive(Clone, Default)]
pub struct ChainPolicyLoader {
    loaders: Vec<Arc<dyn PolicyLoader>>,
}

impl ChainPolicyLoader {
    #[must_use]
    pub fn new(loaders: Vec<Arc<dyn PolicyLoader>>) -> Self {
        Self { loaders }
    }

    fn concat(
        &self,
        load: impl Fn(&dyn PolicyLoader) -> Result<Vec<Policy>, AccessError>,
    ) -> Result<Vec<Policy>, AccessError> {
        let mut policies = Vec::new();
        for loader in &self.loaders {
            policies.extend(load(loader.as_ref())?);
        }
        Ok(policies)
    }
}

impl PolicyLoader for ChainPolicyLoader {
    fn load_from_type(&self, type_name: &str) -> Result<Vec<Policy>, AccessError> {
        self.concat(|loader| loader.load_from_type(type_name))
    }

    fn load_from_type_method(
        &self,
        type_name: &str,
        method: &str,
    ) -> Result<Vec<Policy>, AccessError> {
        self.concat(|loader| loader.load_from_type_method(type_name, method))
    }

    fn load_from_function(&self, function: &str) -> Result<Vec<Policy>, AccessError> {
        self.concat(|loader| loader.load_from_function(function))
    }

    fn type_exists(&self, type_name: &str) -> bool {
        self.loaders.iter().any(|loader| loader.type_exists(type_name))
    }
}

/// Declares nothing for anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPolicyLoader;

impl PolicyLoader for NullPolicyLoader {
    fn load_from_type(&self, _type_name: &str) -> Result<Vec<Policy>, AccessError> {
        Ok(Vec::new())
    }

    fn load_from_type_method(
        &self,
        _type_name: &str,
        _method: &str,
    ) -> Result<Vec<Policy>, AccessError> {
        Ok(Vec::new())
    }

    fn load_from_function(&self, _function: &str) -> Result<Vec<Policy>, AccessError> {
        Ok(Vec::new())
    }

    fn type_exists(&self, _type_name: &str) -> bool {
        false
    }
}
