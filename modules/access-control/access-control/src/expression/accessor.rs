//! Named value access on host objects.

use access_control_sdk::{AccessError, Object, Value};

/// Read `name` from `object`.
///
/// A [`ValueHolder`](access_control_sdk::ValueHolder) answers for itself.
/// Otherwise a non-null property wins, then a same-named method that can be
/// called without arguments. Anything else reads as `null`.
///
/// # Errors
///
/// Propagates errors raised by the called method.
pub fn get_value_from(object: &dyn Object, name: &str) -> Result<Value, AccessError> {
    if let Some(holder) = object.as_value_holder() {
        return Ok(holder.get_value(name));
    }

    if let Some(value) = object.property(name)
        && !value.is_null()
    {
        return Ok(value);
    }

    match object.method(name) {
        Some(signature) if signature.is_all_optional() => {
            let arguments = signature
                .parameters()
                .iter()
                .map(|p| p.default_value().cloned().unwrap_or_default())
                .collect();
            object.call(name, arguments)
        }
        _ => Ok(Value::Null),
    }
}
