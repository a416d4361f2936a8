//! Default policy evaluation engine.

use std::sync::Arc;
use std::time::Instant;

use access_control_sdk::{
    AccessError, Authorization, AuthorizationContext, Context, ObjectRef, PermissionChecker,
    Policy, PolicyLoader, Receiver, ResourceLocator, RoleChecker, ServiceLocator, SubjectLocator,
    Value,
};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::config::AccessControlConfig;
use crate::expression::get_value_from;

/// State of one top-level check, shared with delegated evaluations.
pub(super) struct Evaluation<'a> {
    pub(super) context: &'a Context,
    subjects: Option<Vec<Value>>,
    /// Types whose policies are being evaluated through `Delegate`.
    pub(super) delegation: Vec<String>,
}

impl<'a> Evaluation<'a> {
    pub(super) fn new(context: &'a Context, origin: Option<&str>) -> Self {
        Self {
            context,
            subjects: None,
            delegation: origin.map(str::to_owned).into_iter().collect(),
        }
    }
}

/// Evaluates the policies declared on a target against the current
/// subjects.
///
/// Only the policy loader and the subject locator are mandatory; a policy
/// needing a missing collaborator is a configuration error.
///
/// ```ignore
/// let authorization = DefaultAuthorization::new(loader, subjects)
///     .with_role_checker(Arc::new(PropertyRoleChecker::default()))
///     .with_config(AccessControlConfig { debug: true, ..Default::default() });
/// ```
pub struct DefaultAuthorization {
    pub(super) policy_loader: Arc<dyn PolicyLoader>,
    subject_locator: Arc<dyn SubjectLocator>,
    resource_locator: Option<Arc<dyn ResourceLocator>>,
    pub(super) service_locator: Option<Arc<dyn ServiceLocator>>,
    pub(super) role_checker: Option<Arc<dyn RoleChecker>>,
    pub(super) permission_checker: Option<Arc<dyn PermissionChecker>>,
    pub(super) config: AccessControlConfig,
}

impl DefaultAuthorization {
    #[must_use]
    pub fn new(
        policy_loader: Arc<dyn PolicyLoader>,
        subject_locator: Arc<dyn SubjectLocator>,
    ) -> Self {
        Self {
            policy_loader,
            subject_locator,
            resource_locator: None,
            service_locator: None,
            role_checker: None,
            permission_checker: None,
            config: AccessControlConfig::default(),
        }
    }

    #[must_use]
    pub fn with_resource_locator(mut self, locator: Arc<dyn ResourceLocator>) -> Self {
        self.resource_locator = Some(locator);
        self
    }

    #[must_use]
    pub fn with_service_locator(mut self, locator: Arc<dyn ServiceLocator>) -> Self {
        self.service_locator = Some(locator);
        self
    }

    #[must_use]
    pub fn with_role_checker(mut self, checker: Arc<dyn RoleChecker>) -> Self {
        self.role_checker = Some(checker);
        self
    }

    #[must_use]
    pub fn with_permission_checker(mut self, checker: Arc<dyn PermissionChecker>) -> Self {
        self.permission_checker = Some(checker);
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: AccessControlConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn config(&self) -> &AccessControlConfig {
        &self.config
    }

    fn run(
        &self,
        operation: &str,
        load: impl FnOnce() -> Result<Vec<Policy>, AccessError>,
        resource: Value,
        mut evaluation: Evaluation<'_>,
    ) -> Result<bool, AccessError> {
        let started = Instant::now();
        let decision = match load() {
            Ok(policies) => self.decide(&mut evaluation, &policies, resource),
            Err(e) if e.is_configuration() && !self.config.debug => {
                error!(operation, error = %e, "Error while loading policies");
                Ok(false)
            }
            Err(e) => Err(e),
        };
        debug!(
            operation,
            elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
            granted = ?decision.as_ref().ok(),
            "Evaluation finished"
        );
        decision
    }

    pub(super) fn subjects(&self, evaluation: &mut Evaluation<'_>) -> Vec<Value> {
        if let Some(subjects) = &evaluation.subjects {
            return subjects.clone();
        }
        let subjects = match evaluation.context.subject_cache() {
            Some(cache) => cache.get_or_init(|| self.subject_locator.find_subjects()),
            None => self.subject_locator.find_subjects(),
        };
        evaluation.subjects = Some(subjects.clone());
        subjects
    }

    /// The decision algorithm, shared by top-level checks and `Delegate`.
    pub(super) fn decide(
        &self,
        evaluation: &mut Evaluation<'_>,
        policies: &[Policy],
        resource: Value,
    ) -> Result<bool, AccessError> {
        if policies.iter().all(Policy::is_modifier) {
            return Ok(self.no_policy_decision());
        }

        let all_or_nothing = policies.contains(&Policy::AllOrNothing);
        if all_or_nothing {
            debug!("Policy is ALL OR NOTHING");
        }

        let resource_policy = policies.iter().find_map(|policy| match policy {
            Policy::Resource {
                resource_type,
                id_accessor,
            } => Some((resource_type, id_accessor)),
            _ => None,
        });
        let resource = match resource_policy {
            Some((resource_type, id_accessor)) => {
                match self.locate_resource(resource_type, id_accessor, &resource)? {
                    Some(located) => located,
                    None => {
                        warn!("No resource was found by resource locators, DENY");
                        return Ok(false);
                    }
                }
            }
            None => resource,
        };

        let mut allowed = 0_usize;
        let mut denied = 0_usize;
        for policy in policies.iter().filter(|policy| !policy.is_modifier()) {
            if self.handle_policy(evaluation, policy, &resource)? {
                if !all_or_nothing {
                    debug!(policy = %policy, "ALLOW, short-circuiting (reason: allowed)");
                    return Ok(true);
                }
                debug!(policy = %policy, "ALLOW");
                allowed += 1;
            } else if all_or_nothing {
                debug!(policy = %policy, "DENY, short-circuiting (reason: all or nothing)");
                return Ok(false);
            } else {
                debug!(policy = %policy, "DENY");
                denied += 1;
            }
        }

        Ok(if all_or_nothing { denied == 0 } else { allowed > 0 })
    }

    fn no_policy_decision(&self) -> bool {
        if self.config.deny_if_no_policies {
            warn!("No policy found, DENY by configuration");
            false
        } else {
            warn!("No policy found, ALLOW by configuration");
            true
        }
    }

    /// `Ok(None)` fails the whole evaluation closed.
    #[tracing::instrument(skip_all, fields(resource_type = %resource_type, id_accessor = %id_accessor))]
    fn locate_resource(
        &self,
        resource_type: &str,
        id_accessor: &str,
        resource: &Value,
    ) -> Result<Option<Value>, AccessError> {
        let started = Instant::now();
        let located = self.try_locate_resource(resource_type, id_accessor, resource);
        debug!(
            elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
            "Resource location finished"
        );

        match located {
            Err(e) if e.is_configuration() && !self.config.debug => {
                warn!(error = %e, "Resource location is misconfigured");
                Ok(None)
            }
            other => other,
        }
    }

    fn try_locate_resource(
        &self,
        resource_type: &str,
        id_accessor: &str,
        resource: &Value,
    ) -> Result<Option<Value>, AccessError> {
        let Some(locator) = &self.resource_locator else {
            return Err(AccessError::configuration(
                "No ResourceLocator is registered, cannot process Resource policy",
            ));
        };

        let Some(object) = resource.as_object() else {
            return Err(AccessError::configuration(format!(
                "Cannot find the resource identifier on a non-object '{}'",
                resource.type_name()
            )));
        };

        let id = get_value_from(object.as_ref(), id_accessor)?;
        if id.is_null() {
            return Err(AccessError::configuration(format!(
                "Could not find the resource identifier on {}::{id_accessor}",
                object.type_name()
            )));
        }

        match locator.load_resource(resource_type, &id) {
            Some(found) if !found.is_not_found() => Ok(Some(found)),
            _ if self.config.debug => Err(AccessError::runtime(format!(
                "No resource locator was able to find the {resource_type} typed object with identifier {id}"
            ))),
            _ => Ok(None),
        }
    }
}

impl Authorization for DefaultAuthorization {
    #[tracing::instrument(
        skip_all,
        fields(run_id = %Uuid::new_v4(), resource = %resource.type_name())
    )]
    fn is_granted(&self, resource: &ObjectRef, context: &Context) -> Result<bool, AccessError> {
        info!("Received is_granted");
        let type_name = resource.type_name();
        self.run(
            "is_granted",
            || self.policy_loader.load_from_type(type_name),
            Value::Object(resource.clone()),
            Evaluation::new(context, Some(type_name)),
        )
    }

    #[tracing::instrument(
        skip_all,
        fields(run_id = %Uuid::new_v4(), resource = %receiver, method = %method)
    )]
    fn is_method_granted(
        &self,
        receiver: &Receiver,
        method: &str,
        context: &Context,
    ) -> Result<bool, AccessError> {
        info!("Received is_method_granted");
        self.run(
            "is_method_granted",
            || {
                self.policy_loader
                    .load_from_type_method(receiver.type_name(), method)
            },
            receiver.to_value(),
            Evaluation::new(context, None),
        )
    }

    #[tracing::instrument(skip_all, fields(run_id = %Uuid::new_v4(), function = %function))]
    fn is_function_granted(
        &self,
        function: &str,
        context: &Context,
    ) -> Result<bool, AccessError> {
        info!("Received is_function_granted");
        self.run(
            "is_function_granted",
            || self.policy_loader.load_from_function(function),
            Value::from(function),
            Evaluation::new(context, None),
        )
    }
}

impl AuthorizationContext for DefaultAuthorization {
    fn current_subject(&self, type_name: &str) -> Option<Value> {
        self.subject_locator.find_subjects().into_iter().find(|subject| {
            subject
                .as_object()
                .is_some_and(|object| object.is_instance_of(type_name))
        })
    }
}
