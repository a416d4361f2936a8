//! Argument binding and invocation.
//!
//! Arguments are routed by name: each declared parameter of the callee
//! picks its value from the named arguments, then the call is made with
//! positional arguments in declaration order.

use std::collections::HashMap;

use access_control_sdk::{AccessError, ObjectRef, Parameter, ServiceMethod, Signature, Value};

use super::choices::ArgumentChoices;

/// A named argument: a plain value or a slot with several candidates.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgumentValue {
    Value(Value),
    Choices(ArgumentChoices),
}

impl From<Value> for ArgumentValue {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<ArgumentChoices> for ArgumentValue {
    fn from(choices: ArgumentChoices) -> Self {
        Self::Choices(choices)
    }
}

/// Arguments available to a call, by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NamedArguments {
    values: HashMap<String, ArgumentValue>,
}

impl NamedArguments {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ArgumentValue> {
        self.values.get(name)
    }

    #[must_use]
    pub fn contains_key(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ArgumentValue>) {
        self.values.insert(name.into(), value.into());
    }

    /// Insert unless `name` is already bound; the first binding wins.
    pub fn insert_if_absent(&mut self, name: impl Into<String>, value: impl Into<ArgumentValue>) {
        self.values.entry(name.into()).or_insert_with(|| value.into());
    }
}

impl<K: Into<String>, V: Into<ArgumentValue>> FromIterator<(K, V)> for NamedArguments {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Call `method` on a resource object.
///
/// # Errors
///
/// - `Configuration` when the object has no such method
/// - `Runtime` when an argument is missing or has the wrong type
/// - any error raised by the method itself
pub fn call_resource_method(
    object: &ObjectRef,
    method: &str,
    arguments: &NamedArguments,
) -> Result<Value, AccessError> {
    let human_name = format!("{}::{method}", object.type_name());
    let signature = object.method(method).ok_or_else(|| {
        AccessError::configuration(format!("'{human_name}' method does not exist"))
    })?;

    let bound = bind_arguments(&human_name, &signature, arguments)?;
    object.call(method, bound)
}

/// Call a located service method.
///
/// # Errors
///
/// - `Runtime` when an argument is missing or has the wrong type
/// - any error raised by the service itself
pub fn call_service_method(
    human_name: &str,
    service_method: &ServiceMethod,
    arguments: &NamedArguments,
) -> Result<Value, AccessError> {
    let bound = bind_arguments(human_name, service_method.signature(), arguments)?;
    service_method.invoke(bound)
}

/// Bind named arguments to `signature`, in declaration order.
///
/// # Errors
///
/// `Runtime` when a required parameter has no value or a value does not
/// match the declared types.
pub fn bind_arguments(
    human_name: &str,
    signature: &Signature,
    arguments: &NamedArguments,
) -> Result<Vec<Value>, AccessError> {
    signature
        .parameters()
        .iter()
        .enumerate()
        .map(|(index, parameter)| {
            bind_parameter(human_name, index + 1, parameter, arguments.get(parameter.name()))
        })
        .collect()
}

fn bind_parameter(
    human_name: &str,
    position: usize,
    parameter: &Parameter,
    argument: Option<&ArgumentValue>,
) -> Result<Value, AccessError> {
    match argument {
        Some(ArgumentValue::Value(value)) => {
            if parameter.accepts(value) {
                Ok(value.clone())
            } else {
                Err(AccessError::runtime(format!(
                    "Cannot call {human_name}, type mismatch for parameter #{position} (${}), expected one of '{}', '{}' given",
                    parameter.name(),
                    parameter.types().join("', '"),
                    value.type_name()
                )))
            }
        }
        Some(ArgumentValue::Choices(choices)) if !choices.is_empty() => {
            if parameter.accepts_anything() {
                choices.find(&[])
            } else {
                choices.find(parameter.types())
            }
        }
        _ => {
            if let Some(default) = parameter.default_value() {
                Ok(default.clone())
            } else if parameter.is_nullable() {
                Ok(Value::Null)
            } else {
                Err(AccessError::runtime(format!(
                    "Cannot call {human_name}, missing parameter #{position} (${})",
                    parameter.name()
                )))
            }
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use access_control_sdk::Object;
    use std::sync::Arc;

    /// Mirrors a resource exposing `check(foo)`, `typed(foo: int)` and
    /// `optional(foo = 7, bar: ?string)`.
    #[derive(Debug)]
    struct Target;

    impl Object for Target {
        fn type_name(&self) -> &str {
            "Target"
        }

        fn method(&self, name: &str) -> Option<Signature> {
            match name {
                "check" => Some(Signature::new().param(Parameter::new("foo"))),
                "typed" => Some(Signature::new().param(Parameter::typed("foo", ["int"]))),
                "optional" => Some(
                    Signature::new()
                        .param(Parameter::typed("foo", ["int"]).with_default(7))
                        .param(Parameter::typed("bar", ["string"]).nullable()),
                ),
                _ => None,
            }
        }

        fn call(&self, name: &str, arguments: Vec<Value>) -> Result<Value, AccessError> {
            match name {
                "check" | "typed" => Ok(arguments.into_iter().next().unwrap_or_default()),
                "optional" => Ok(Value::List(arguments)),
                _ => Err(AccessError::configuration("no such method")),
            }
        }
    }

    fn target() -> ObjectRef {
        Arc::new(Target)
    }

    #[test]
    fn required_untyped_parameter() {
        let args: NamedArguments = [("foo", Value::from(12))].into_iter().collect();
        assert_eq!(call_resource_method(&target(), "check", &args).unwrap(), Value::Int(12));
    }

    #[test]
    fn missing_parameter() {
        let err = call_resource_method(&target(), "check", &NamedArguments::new()).unwrap_err();
        assert!(err.is_runtime());
        assert_eq!(
            err.to_string(),
            "Cannot call Target::check, missing parameter #1 ($foo)"
        );
    }

    #[test]
    fn type_mismatch() {
        let args: NamedArguments = [("foo", Value::from("text"))].into_iter().collect();
        let err = call_resource_method(&target(), "typed", &args).unwrap_err();
        assert!(err.is_runtime());
        assert_eq!(
            err.to_string(),
            "Cannot call Target::typed, type mismatch for parameter #1 ($foo), expected one of 'int', 'string' given"
        );
    }

    #[test]
    fn defaults_then_null() {
        let result = call_resource_method(&target(), "optional", &NamedArguments::new()).unwrap();
        assert_eq!(result, Value::List(vec![Value::Int(7), Value::Null]));
    }

    #[test]
    fn choices_are_resolved_by_parameter_type() {
        let args: NamedArguments = [(
            "foo",
            ArgumentChoices::new(vec!["a".into(), 3.into(), 4.into()]),
        )]
        .into_iter()
        .collect();
        assert_eq!(call_resource_method(&target(), "typed", &args).unwrap(), Value::Int(3));
        assert_eq!(call_resource_method(&target(), "check", &args).unwrap(), Value::from("a"));
    }

    #[test]
    fn empty_choices_count_as_absent() {
        let args: NamedArguments = [("foo", ArgumentChoices::default())].into_iter().collect();
        let result = call_resource_method(&target(), "optional", &args).unwrap();
        assert_eq!(result, Value::List(vec![Value::Int(7), Value::Null]));
        assert!(call_resource_method(&target(), "check", &args).unwrap_err().is_runtime());
    }

    #[test]
    fn unknown_method_is_a_configuration_error() {
        let err = call_resource_method(&target(), "nope", &NamedArguments::new()).unwrap_err();
        assert!(err.is_configuration());
        assert_eq!(err.to_string(), "'Target::nope' method does not exist");
    }

    #[test]
    fn service_method_binding() {
        let method = ServiceMethod::new(
            "isOwner",
            Signature::new()
                .param(Parameter::typed("user", ["string"]))
                .param(Parameter::typed("owner", ["string"])),
            |args| Ok(Value::Bool(args.first() == args.get(1))),
        );
        let args: NamedArguments = [("user", "alice"), ("owner", "alice")]
            .into_iter()
            .map(|(k, v)| (k, Value::from(v)))
            .collect();
        assert_eq!(
            call_service_method("Billing.isOwner", &method, &args).unwrap(),
            Value::Bool(true)
        );
    }
}
