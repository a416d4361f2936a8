//! Callable signatures.
//!
//! Resource methods and service methods are both described by a
//! [`Signature`]: an ordered list of named, typed parameters. The engine
//! binds arguments against it before calling.

use std::fmt;
use std::sync::Arc;

use crate::error::AccessError;
use crate::value::{MIXED, Value};

/// One declared parameter of a callable.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    name: String,
    types: Vec<String>,
    default: Option<Value>,
    nullable: bool,
}

impl Parameter {
    /// Untyped parameter, accepting anything.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            types: Vec::new(),
            default: None,
            nullable: false,
        }
    }

    /// Parameter accepting any of the given types (a union type).
    #[must_use]
    pub fn typed<I, S>(name: impl Into<String>, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            types: types.into_iter().map(Into::into).collect(),
            default: None,
            nullable: false,
        }
    }

    #[must_use]
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared types; empty means untyped.
    #[must_use]
    pub fn types(&self) -> &[String] {
        &self.types
    }

    #[must_use]
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    #[must_use]
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    #[must_use]
    pub fn is_optional(&self) -> bool {
        self.default.is_some() || self.nullable
    }

    #[must_use]
    pub fn accepts_anything(&self) -> bool {
        self.types.is_empty() || self.types.iter().any(|t| t == MIXED)
    }

    /// Whether `value` can be bound to this parameter as-is.
    #[must_use]
    pub fn accepts(&self, value: &Value) -> bool {
        if value.is_null() && self.nullable {
            return true;
        }
        self.accepts_anything() || self.types.iter().any(|t| value.is_instance_of(t))
    }
}

/// Ordered parameter list of a callable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Signature {
    parameters: Vec<Parameter>,
}

impl Signature {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn param(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    #[must_use]
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Whether the callable can be invoked without explicit arguments.
    #[must_use]
    pub fn is_all_optional(&self) -> bool {
        self.parameters.iter().all(Parameter::is_optional)
    }
}

impl FromIterator<Parameter> for Signature {
    fn from_iter<T: IntoIterator<Item = Parameter>>(iter: T) -> Self {
        Self {
            parameters: iter.into_iter().collect(),
        }
    }
}

/// Callback backing a service method.
pub type ServiceCallback = dyn Fn(Vec<Value>) -> Result<Value, AccessError> + Send + Sync;

/// A host function reachable from `Service` policies.
#[derive(Clone)]
pub struct ServiceMethod {
    name: String,
    signature: Signature,
    callback: Arc<ServiceCallback>,
}

impl ServiceMethod {
    #[must_use]
    pub fn new<F>(name: impl Into<String>, signature: Signature, callback: F) -> Self
    where
        F: Fn(Vec<Value>) -> Result<Value, AccessError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            signature,
            callback: Arc::new(callback),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Call with arguments already bound in declaration order.
    ///
    /// # Errors
    ///
    /// Propagates whatever the callback returns.
    pub fn invoke(&self, arguments: Vec<Value>) -> Result<Value, AccessError> {
        (self.callback)(arguments)
    }
}

impl fmt::Debug for ServiceMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceMethod")
            .field("name", &self.name)
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn untyped_parameter_accepts_anything() {
        let p = Parameter::new("x");
        assert!(p.accepts_anything());
        assert!(p.accepts(&Value::Null));
        assert!(p.accepts(&Value::from("a")));
    }

    #[test]
    fn union_types() {
        let p = Parameter::typed("x", ["int", "string"]);
        assert!(p.accepts(&Value::from(1)));
        assert!(p.accepts(&Value::from("a")));
        assert!(!p.accepts(&Value::from(1.0)));
        assert!(!p.accepts(&Value::Null));
        assert!(p.clone().nullable().accepts(&Value::Null));
    }

    #[test]
    fn optionality() {
        let sig = Signature::new()
            .param(Parameter::new("a").with_default(1))
            .param(Parameter::typed("b", ["int"]).nullable());
        assert!(sig.is_all_optional());

        let sig = sig.param(Parameter::new("c"));
        assert!(!sig.is_all_optional());
        assert!(Signature::new().is_all_optional());
    }

    #[test]
    fn service_method_invokes_callback() {
        let m = ServiceMethod::new(
            "count",
            Signature::new().param(Parameter::new("items")),
            |args| Ok(Value::from(i64::try_from(args.len()).unwrap_or_default())),
        );
        assert_eq!(m.name(), "count");
        assert_eq!(m.invoke(vec![Value::Null, Value::Null]).unwrap(), Value::Int(2));
    }
}
