//! Per-kind policy handlers.

use access_control_sdk::{AccessError, Policy, Value};
use tracing::{debug, error};

use super::authorization::{DefaultAuthorization, Evaluation};
use crate::expression::{
    ArgumentChoices, MethodExpression, NamedArguments, call_resource_method, call_service_method,
    parse,
};

impl DefaultAuthorization {
    /// Dispatch one policy.
    ///
    /// Configuration errors raised by a handler are downgraded to a deny
    /// outside debug mode. Runtime errors, unrecognized policies and
    /// modifiers always propagate.
    pub(super) fn handle_policy(
        &self,
        evaluation: &mut Evaluation<'_>,
        policy: &Policy,
        resource: &Value,
    ) -> Result<bool, AccessError> {
        let outcome = match policy {
            Policy::Deny { .. } => Ok(false),
            Policy::Allow { .. } => Ok(true),
            Policy::Role { role } => self.handle_role(evaluation, role),
            Policy::Permission { permission } => self.handle_permission(evaluation, permission),
            Policy::Method { expression } => self.handle_method(evaluation, expression, resource),
            Policy::Service { expression } => self.handle_service(evaluation, expression, resource),
            Policy::Delegate { target_type } => {
                self.handle_delegate(evaluation, target_type, resource)
            }
            // Modifiers are consumed before dispatch.
            Policy::Resource { .. } | Policy::AllOrNothing => {
                return Err(AccessError::configuration(format!(
                    "Modifier policy cannot be dispatched: {policy}"
                )));
            }
            Policy::Unrecognized => {
                return Err(AccessError::configuration(format!(
                    "Unhandled policy: {policy}"
                )));
            }
        };

        match outcome {
            Err(e) => {
                error!(policy = %policy, error = %e, "Error while executing policy");
                if e.is_configuration() && !self.config.debug {
                    Ok(false)
                } else {
                    Err(e)
                }
            }
            decision => decision,
        }
    }

    fn handle_role(&self, evaluation: &mut Evaluation<'_>, role: &str) -> Result<bool, AccessError> {
        let Some(checker) = &self.role_checker else {
            return Err(AccessError::configuration(
                "No RoleChecker is registered, cannot process Role policy",
            ));
        };
        Ok(self
            .subjects(evaluation)
            .iter()
            .any(|subject| checker.subject_has_role(subject, role)))
    }

    fn handle_permission(
        &self,
        evaluation: &mut Evaluation<'_>,
        permission: &str,
    ) -> Result<bool, AccessError> {
        let Some(checker) = &self.permission_checker else {
            return Err(AccessError::configuration(
                "No PermissionChecker is registered, cannot process Permission policy",
            ));
        };
        Ok(self
            .subjects(evaluation)
            .iter()
            .any(|subject| checker.subject_has_permission(subject, permission)))
    }

    fn handle_method(
        &self,
        evaluation: &mut Evaluation<'_>,
        expression: &str,
        resource: &Value,
    ) -> Result<bool, AccessError> {
        let Some(object) = resource.as_object() else {
            return Err(AccessError::runtime(format!(
                "Cannot apply a Method policy on a non-object '{}'",
                resource.type_name()
            )));
        };

        let method = parse(expression)?;
        if method.service_name().is_some() {
            return Err(AccessError::configuration(
                "Cannot apply a service method call when using a Method policy",
            ));
        }

        let arguments = self.arguments(evaluation, &method, resource)?;
        let result = call_resource_method(object, method.method_name(), &arguments)?;
        expect_decision(&method, &result)
    }

    fn handle_service(
        &self,
        evaluation: &mut Evaluation<'_>,
        expression: &str,
        resource: &Value,
    ) -> Result<bool, AccessError> {
        let Some(locator) = &self.service_locator else {
            return Err(AccessError::configuration(
                "No ServiceLocator is registered, cannot process Service policy",
            ));
        };

        let method = parse(expression)?;
        let Some(service_method) =
            locator.find_service_method(method.method_name(), method.service_name())
        else {
            return Err(AccessError::configuration(format!(
                "No service locator was able to find the service {method}"
            )));
        };

        let arguments = self.arguments(evaluation, &method, resource)?;
        let result = call_service_method(&method.to_string(), &service_method, &arguments)?;
        expect_decision(&method, &result)
    }

    fn handle_delegate(
        &self,
        evaluation: &mut Evaluation<'_>,
        target_type: &str,
        resource: &Value,
    ) -> Result<bool, AccessError> {
        if !self.policy_loader.type_exists(target_type) {
            return Err(AccessError::configuration(format!(
                "Type or interface {target_type} does not exist, cannot process Delegate policy"
            )));
        }

        if evaluation.delegation.iter().any(|visited| visited == target_type) {
            return Err(AccessError::configuration(format!(
                "Circular delegation: {} -> {target_type}",
                evaluation.delegation.join(" -> ")
            )));
        }

        debug!(target_type, "Delegating");
        let policies = self.policy_loader.load_from_type(target_type)?;

        evaluation.delegation.push(target_type.to_owned());
        let decision = self.decide(evaluation, &policies, resource.clone());
        evaluation.delegation.pop();
        decision
    }

    /// `subject` and `resource` first, then caller context values; the
    /// engine-provided names cannot be overridden.
    fn arguments(
        &self,
        evaluation: &mut Evaluation<'_>,
        method: &MethodExpression,
        resource: &Value,
    ) -> Result<NamedArguments, AccessError> {
        let mut arguments = NamedArguments::new();
        arguments.insert("subject", ArgumentChoices::new(self.subjects(evaluation)));
        arguments.insert("resource", resource.clone());
        for (name, value) in evaluation.context {
            arguments.insert_if_absent(name.as_str(), value.clone());
        }
        method.map_arguments_from_context(arguments)
    }
}

fn expect_decision(method: &MethodExpression, result: &Value) -> Result<bool, AccessError> {
    result.as_bool().ok_or_else(|| {
        AccessError::runtime(format!(
            "{method} must return a boolean, '{}' given",
            result.type_name()
        ))
    })
}
