//! Parsed call expressions.

use std::fmt;

use access_control_sdk::{AccessError, Value};

use super::accessor::get_value_from;
use super::choices::ArgumentChoices;
use super::executor::{ArgumentValue, NamedArguments};

/// One argument of a call expression.
///
/// `name` is the target parameter name. `context` is the key the value is
/// read from when it differs from `name`, and `property` an optional field
/// read from that value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpressionArgument {
    name: String,
    context: Option<String>,
    property: Option<String>,
}

impl ExpressionArgument {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            context: None,
            property: None,
        }
    }

    #[must_use]
    pub fn from_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    #[must_use]
    pub fn with_property(mut self, property: impl Into<String>) -> Self {
        self.property = Some(property.into());
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    #[must_use]
    pub fn property(&self) -> Option<&str> {
        self.property.as_deref()
    }

    /// Key the value is read from in the evaluation context.
    #[must_use]
    pub fn context_key(&self) -> &str {
        self.context.as_deref().unwrap_or(&self.name)
    }
}

impl fmt::Display for ExpressionArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if let Some(context) = &self.context {
            write!(f, ": {context}")?;
        }
        if let Some(property) = &self.property {
            write!(f, ".{property}")?;
        }
        Ok(())
    }
}

/// `[Service.]method(arg, ...)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodExpression {
    method_name: String,
    service_name: Option<String>,
    arguments: Vec<ExpressionArgument>,
}

impl MethodExpression {
    #[must_use]
    pub fn new(
        method_name: impl Into<String>,
        service_name: Option<String>,
        arguments: Vec<ExpressionArgument>,
    ) -> Self {
        Self {
            method_name: method_name.into(),
            service_name,
            arguments,
        }
    }

    #[must_use]
    pub fn method_name(&self) -> &str {
        &self.method_name
    }

    #[must_use]
    pub fn service_name(&self) -> Option<&str> {
        self.service_name.as_deref()
    }

    #[must_use]
    pub fn arguments(&self) -> &[ExpressionArgument] {
        &self.arguments
    }

    /// Route context values to the parameter names used by the expression.
    ///
    /// Aliased arguments (`name: key`) copy the `key` value under `name`;
    /// property arguments (`name.prop`, `name: key.prop`) replace the value
    /// under `name` with the named property of the object it holds. Values
    /// the expression does not mention are left untouched.
    ///
    /// # Errors
    ///
    /// `Runtime` when an alias would override an existing value, when a
    /// property is read from something that is not an object, or when
    /// reading the property fails.
    pub fn map_arguments_from_context(
        &self,
        mut arguments: NamedArguments,
    ) -> Result<NamedArguments, AccessError> {
        for argument in &self.arguments {
            if let Some(context) = argument.context()
                && let Some(value) = arguments.get(context).cloned()
            {
                if arguments.contains_key(&argument.name) {
                    return Err(AccessError::runtime(format!(
                        "Argument ${} cannot be overridden from context argument '{context}'",
                        argument.name
                    )));
                }
                arguments.insert(argument.name.clone(), value);
            }

            if let Some(property) = argument.property()
                && let Some(value) = arguments.get(&argument.name)
            {
                let mapped = read_property(&argument.name, value, property)?;
                arguments.insert(argument.name.clone(), mapped);
            }
        }

        Ok(arguments)
    }
}

fn read_property(
    name: &str,
    value: &ArgumentValue,
    property: &str,
) -> Result<ArgumentValue, AccessError> {
    match value {
        ArgumentValue::Value(Value::Object(object)) => {
            get_value_from(object.as_ref(), property).map(ArgumentValue::Value)
        }
        ArgumentValue::Choices(choices) => {
            let mut candidates = Vec::with_capacity(choices.candidates().len());
            for candidate in choices.candidates() {
                if let Value::Object(object) = candidate {
                    candidates.push(get_value_from(object.as_ref(), property)?);
                }
            }
            Ok(ArgumentValue::Choices(ArgumentChoices::new(candidates)))
        }
        ArgumentValue::Value(_) => Err(AccessError::runtime(format!(
            "Argument from context ${name} is not an object, cannot fetch property '{property}'"
        ))),
    }
}

impl fmt::Display for MethodExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(service) = &self.service_name {
            write!(f, "{service}.")?;
        }
        write!(f, "{}(", self.method_name)?;
        for (i, argument) in self.arguments.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{argument}")?;
        }
        f.write_str(")")
    }
}
