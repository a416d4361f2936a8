//! Dynamic value model.
//!
//! Subjects, resources and context values are opaque to the engine: they
//! come from the host application and are only inspected through the
//! [`Object`] capability. [`Value`] is the closed set of shapes the engine
//! can route between policies, locators and callables.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::error::AccessError;
use crate::signature::Signature;

/// Type name accepting any value.
pub const MIXED: &str = "mixed";

/// Shared handle to a host object.
pub type ObjectRef = Arc<dyn Object>;

/// A host object the engine can introspect.
///
/// This is the capability that stands in for runtime reflection: the host
/// declares which properties and methods are reachable from policies.
/// Every method but [`Object::type_name`] has a conservative default, so a
/// plain marker type only needs to name itself.
pub trait Object: Any + fmt::Debug + Send + Sync {
    /// Concrete type name, the key used to load policies.
    fn type_name(&self) -> &str;

    /// Whether this object is an instance of `type_name` (its own type or
    /// any ancestor/interface it declares).
    fn is_instance_of(&self, type_name: &str) -> bool {
        self.type_name() == type_name
    }

    /// Public property access.
    fn property(&self, _name: &str) -> Option<Value> {
        None
    }

    /// Signature of a callable method, `None` when no such method exists.
    fn method(&self, _name: &str) -> Option<Signature> {
        None
    }

    /// Invoke a method with positional arguments already bound against the
    /// signature returned by [`Object::method`].
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::Configuration`] when the method does not
    /// exist; implementations may return any error raised by the call.
    fn call(&self, name: &str, _arguments: Vec<Value>) -> Result<Value, AccessError> {
        Err(AccessError::configuration(format!(
            "'{}::{name}' method does not exist",
            self.type_name()
        )))
    }

    /// Override point for value access, bypassing property and method
    /// lookup entirely.
    fn as_value_holder(&self) -> Option<&dyn ValueHolder> {
        None
    }
}

/// Objects proxying named value access to something else.
pub trait ValueHolder {
    /// Get the value with the given name, [`Value::Null`] when absent.
    fn get_value(&self, name: &str) -> Value;
}

/// A dynamically typed value.
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Object(ObjectRef),
}

impl Value {
    /// Wrap a host object.
    #[must_use]
    pub fn object(object: impl Object) -> Self {
        Self::Object(Arc::new(object))
    }

    /// Runtime type name, as used in type mismatch messages.
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::List(_) => "array",
            Self::Object(o) => o.type_name(),
        }
    }

    /// Whether this value is assignable to the given type name.
    #[must_use]
    pub fn is_instance_of(&self, type_name: &str) -> bool {
        if type_name == MIXED {
            return true;
        }
        match self {
            Self::Null => type_name == "null",
            Self::Bool(_) => type_name == "bool",
            Self::Int(_) => type_name == "int",
            Self::Float(_) => type_name == "float",
            Self::String(_) => type_name == "string",
            Self::List(_) => type_name == "array" || type_name == "iterable",
            Self::Object(o) => type_name == "object" || o.is_instance_of(type_name),
        }
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// `null` and `false` both mean "nothing found" for locators.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Null | Self::Bool(false))
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Downcast an object value to its concrete host type.
    #[must_use]
    pub fn downcast_ref<T: Object>(&self) -> Option<&T> {
        let object: &dyn Any = &**self.as_object()?;
        object.downcast_ref::<T>()
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("Null"),
            Self::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Self::Int(n) => f.debug_tuple("Int").field(n).finish(),
            Self::Float(n) => f.debug_tuple("Float").field(n).finish(),
            Self::String(s) => f.debug_tuple("String").field(s).finish(),
            Self::List(l) => f.debug_tuple("List").field(l).finish(),
            Self::Object(o) => f.debug_tuple("Object").field(o).finish(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::String(s) => f.write_str(s),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Object(o) => write!(f, "{}", o.type_name()),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.total_cmp(b).is_eq(),
            (Self::String(a), Self::String(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<bool> for Value {
    #[inline]
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    #[inline]
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for Value {
    #[inline]
    fn from(n: i32) -> Self {
        Self::Int(n.into())
    }
}

impl From<f64> for Value {
    #[inline]
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<String> for Value {
    #[inline]
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for Value {
    #[inline]
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<Vec<Value>> for Value {
    #[inline]
    fn from(items: Vec<Value>) -> Self {
        Self::List(items)
    }
}

impl From<ObjectRef> for Value {
    #[inline]
    fn from(o: ObjectRef) -> Self {
        Self::Object(o)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    #[inline]
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map(Self::Int)
                .or_else(|| n.as_f64().map(Self::Float))
                .unwrap_or(Self::Null),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::List(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(map) => Self::object(JsonRecord { fields: map }),
        }
    }
}

/// Object view over a JSON map, exposing its fields as values.
///
/// Lets callers hand request payloads straight to the engine without
/// declaring a host type.
#[derive(Debug, Clone, Default)]
pub struct JsonRecord {
    fields: serde_json::Map<String, serde_json::Value>,
}

impl JsonRecord {
    /// Type name reported by JSON records.
    pub const TYPE_NAME: &'static str = "json";

    #[must_use]
    pub fn new(fields: serde_json::Map<String, serde_json::Value>) -> Self {
        Self { fields }
    }
}

impl Object for JsonRecord {
    fn type_name(&self) -> &str {
        Self::TYPE_NAME
    }

    fn property(&self, name: &str) -> Option<Value> {
        self.fields.get(name).cloned().map(Value::from)
    }

    fn as_value_holder(&self) -> Option<&dyn ValueHolder> {
        Some(self)
    }
}

impl ValueHolder for JsonRecord {
    fn get_value(&self, name: &str) -> Value {
        self.property(name).unwrap_or_default()
    }
}
