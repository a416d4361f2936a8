//! Parser for `[Service.]method([arg[, ...]])` expressions.
//!
//! Each argument is one of:
//!
//! - `name`: read `name` from the context
//! - `name.property`: read `property` of the `name` context value
//! - `name: key`: read `key` from the context, pass it as `name`
//! - `name: key.property`: read `property` of the `key` context value, pass
//!   it as `name`

use std::sync::LazyLock;

use access_control_sdk::AccessError;
use regex::Regex;

use super::method::{ExpressionArgument, MethodExpression};

static CALL: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"(?s)^\s*([^()\s]+)\s*\((.*)\)\s*$"));

const GRAMMAR_ERROR: &str =
    "Invalid service method expression: it must match: '[ServiceName.]methodName([param [, ...]])'";

/// Parse a call expression.
///
/// # Errors
///
/// `Configuration` when the expression does not match the grammar or an
/// argument name is not made of `[A-Za-z0-9_]` characters.
pub fn parse(expression: &str) -> Result<MethodExpression, AccessError> {
    let call = CALL
        .as_ref()
        .map_err(|e| AccessError::configuration(e.to_string()))?;

    let captures = call
        .captures(expression)
        .ok_or_else(|| AccessError::configuration(GRAMMAR_ERROR))?;
    let callee = captures.get(1).map_or("", |m| m.as_str());
    let parameters = captures.get(2).map_or("", |m| m.as_str()).trim();

    let (service_name, method_name) = split_callee(callee)?;

    let arguments = if parameters.is_empty() {
        Vec::new()
    } else {
        parameters
            .split(',')
            .map(parse_argument)
            .collect::<Result<Vec<_>, _>>()?
    };

    Ok(MethodExpression::new(method_name, service_name, arguments))
}

fn split_callee(callee: &str) -> Result<(Option<String>, &str), AccessError> {
    let mut pieces = callee.split('.');
    match (pieces.next(), pieces.next(), pieces.next()) {
        (Some(method), None, None) if !method.is_empty() => Ok((None, method)),
        (Some(service), Some(method), None) if !service.is_empty() && !method.is_empty() => {
            Ok((Some(service.to_owned()), method))
        }
        _ => Err(AccessError::configuration(GRAMMAR_ERROR)),
    }
}

fn parse_argument(token: &str) -> Result<ExpressionArgument, AccessError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(AccessError::configuration(
            "Invalid service method expression: empty parameter name",
        ));
    }

    match token.split_once(':') {
        Some((name, value)) => {
            let argument = ExpressionArgument::new(identifier(name)?);
            let (context, property) = split_property(value)?;
            let argument = argument.from_context(context);
            Ok(match property {
                Some(property) => argument.with_property(property),
                None => argument,
            })
        }
        None => {
            let (name, property) = split_property(token)?;
            let argument = ExpressionArgument::new(name);
            Ok(match property {
                Some(property) => argument.with_property(property),
                None => argument,
            })
        }
    }
}

fn split_property(value: &str) -> Result<(&str, Option<&str>), AccessError> {
    match value.split_once('.') {
        Some((key, property)) => Ok((identifier(key)?, Some(identifier(property)?))),
        None => Ok((identifier(value)?, None)),
    }
}

fn identifier(raw: &str) -> Result<&str, AccessError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(AccessError::configuration(
            "Invalid service method expression: empty parameter name",
        ));
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(AccessError::configuration(format!(
            "Invalid parameter name expression: invalid parameter name '{name}'"
        )));
    }
    Ok(name)
}
