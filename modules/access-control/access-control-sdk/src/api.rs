//! Public API traits for access control.

use std::fmt;

use crate::context::Context;
use crate::error::AccessError;
use crate::value::{ObjectRef, Value};

/// What a type-scoped method check is performed against.
#[derive(Debug, Clone)]
pub enum Receiver {
    /// A bound instance, which becomes the resource.
    Instance(ObjectRef),
    /// A type with no instance; the type name becomes the resource.
    Type(String),
}

impl Receiver {
    /// Type name policies are loaded for.
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            Self::Instance(object) => object.type_name(),
            Self::Type(name) => name,
        }
    }

    /// Value the policies are evaluated against.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Instance(object) => Value::Object(object.clone()),
            Self::Type(name) => Value::String(name.clone()),
        }
    }
}

impl fmt::Display for Receiver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Normalised call-target handle accepted at the boundary.
#[derive(Debug, Clone)]
pub enum Target {
    /// A protected object.
    Instance(ObjectRef),
    /// A method of a type or of a bound instance.
    Method { receiver: Receiver, method: String },
    /// A free function.
    Function(String),
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Instance(object) => f.write_str(object.type_name()),
            Self::Method { receiver, method } => write!(f, "{receiver}::{method}"),
            Self::Function(name) => write!(f, "{name}()"),
        }
    }
}

/// Public API of the access control engine.
///
/// Every check either returns a decision or one of the two
/// [`AccessError`] kinds; there is no third "unknown" state.
///
/// ```ignore
/// let granted = authorization.is_granted(&invoice, &Context::new().with("amount", 12))?;
/// ```
pub trait Authorization: Send + Sync {
    /// Is the current subject granted access to `resource`.
    ///
    /// # Errors
    ///
    /// - `Configuration` for misconfiguration when running in debug mode
    /// - `Runtime` when a policy cannot be evaluated, regardless of mode
    fn is_granted(&self, resource: &ObjectRef, context: &Context) -> Result<bool, AccessError>;

    /// Is the current subject granted to call `method` on `receiver`.
    ///
    /// # Errors
    ///
    /// Same as [`Authorization::is_granted`].
    fn is_method_granted(
        &self,
        receiver: &Receiver,
        method: &str,
        context: &Context,
    ) -> Result<bool, AccessError>;

    /// Is the current subject granted to call the free function `function`.
    ///
    /// # Errors
    ///
    /// Same as [`Authorization::is_granted`].
    fn is_function_granted(&self, function: &str, context: &Context)
    -> Result<bool, AccessError>;

    /// Dispatch on an already-normalised target.
    ///
    /// # Errors
    ///
    /// Same as [`Authorization::is_granted`].
    fn check(&self, target: &Target, context: &Context) -> Result<bool, AccessError> {
        match target {
            Target::Instance(resource) => self.is_granted(resource, context),
            Target::Method { receiver, method } => {
                self.is_method_granted(receiver, method, context)
            }
            Target::Function(function) => self.is_function_granted(function, context),
        }
    }
}

/// Access to the subject the current evaluation runs for.
pub trait AuthorizationContext: Send + Sync {
    /// First located subject that is an instance of `type_name`.
    fn current_subject(&self, type_name: &str) -> Option<Value>;
}
