#![allow(dead_code)]

//! Shared fixtures: an invoicing domain with users, invoices and a
//! repository locating invoices by id.

use std::collections::HashMap;
use std::sync::Arc;

use access_control::locator::{
    MemoryServiceLocator, PropertyPermissionChecker, PropertyRoleChecker, StaticSubjectLocator,
};
use access_control::{AccessControlConfig, DefaultAuthorization};
use access_control_sdk::{
    AccessError, Object, ObjectRef, Parameter, Policy, PolicyLoader, ResourceLocator, Signature,
    Value,
};

#[derive(Debug)]
pub struct User {
    pub name: String,
    pub roles: Vec<String>,
    pub permissions: Vec<String>,
}

impl User {
    pub fn new(name: &str, roles: &[&str]) -> Self {
        Self {
            name: name.to_owned(),
            roles: roles.iter().map(|r| (*r).to_owned()).collect(),
            permissions: Vec::new(),
        }
    }

    pub fn with_permissions(mut self, permissions: &[&str]) -> Self {
        self.permissions = permissions.iter().map(|p| (*p).to_owned()).collect();
        self
    }
}

fn names(items: &[String]) -> Value {
    Value::List(items.iter().map(|s| Value::from(s.as_str())).collect())
}

impl Object for User {
    fn type_name(&self) -> &str {
        "User"
    }

    fn is_instance_of(&self, type_name: &str) -> bool {
        matches!(type_name, "User" | "Principal")
    }

    fn property(&self, name: &str) -> Option<Value> {
        match name {
            "name" => Some(self.name.as_str().into()),
            "roles" => Some(names(&self.roles)),
            "permissions" => Some(names(&self.permissions)),
            _ => None,
        }
    }
}

/// Exposes `isOwner(subject: User)`, `canPay(amount: int)`, `label()` and
/// `isSealed()` to `Method` policies.
#[derive(Debug)]
pub struct Invoice {
    pub id: i64,
    pub owner: String,
    pub limit: i64,
}

impl Object for Invoice {
    fn type_name(&self) -> &str {
        "Invoice"
    }

    fn is_instance_of(&self, type_name: &str) -> bool {
        matches!(type_name, "Invoice" | "Document")
    }

    fn property(&self, name: &str) -> Option<Value> {
        match name {
            "id" => Some(self.id.into()),
            "owner" => Some(self.owner.as_str().into()),
            _ => None,
        }
    }

    fn method(&self, name: &str) -> Option<Signature> {
        match name {
            "isOwner" => Some(Signature::new().param(Parameter::typed("subject", ["User"]))),
            "canPay" => Some(Signature::new().param(Parameter::typed("amount", ["int"]))),
            "label" | "isSealed" => Some(Signature::new()),
            _ => None,
        }
    }

    fn call(&self, name: &str, arguments: Vec<Value>) -> Result<Value, AccessError> {
        let first = arguments.into_iter().next().unwrap_or_default();
        match name {
            "isOwner" => Ok(Value::Bool(
                first.downcast_ref::<User>().is_some_and(|u| u.name == self.owner),
            )),
            "canPay" => Ok(Value::Bool(matches!(first, Value::Int(n) if n <= self.limit))),
            "label" => Ok(format!("INV-{}", self.id).into()),
            "isSealed" => Ok(Value::Bool(false)),
            _ => Err(AccessError::configuration(format!("'Invoice::{name}' method does not exist"))),
        }
    }
}

/// A lightweight handle carrying only the invoice id.
#[derive(Debug)]
pub struct InvoiceRef {
    pub invoice_id: Option<i64>,
}

impl Object for InvoiceRef {
    fn type_name(&self) -> &str {
        "InvoiceRef"
    }

    fn property(&self, name: &str) -> Option<Value> {
        (name == "invoiceId").then(|| self.invoice_id.into())
    }
}

/// Finds `invoice` typed resources by integer id.
#[derive(Default)]
pub struct InvoiceRepository {
    invoices: HashMap<i64, ObjectRef>,
}

impl InvoiceRepository {
    pub fn with(mut self, invoice: Invoice) -> Self {
        self.invoices.insert(invoice.id, Arc::new(invoice));
        self
    }
}

impl ResourceLocator for InvoiceRepository {
    fn load_resource(&self, resource_type: &str, id: &Value) -> Option<Value> {
        if resource_type != "invoice" {
            return None;
        }
        match id {
            Value::Int(id) => self.invoices.get(id).cloned().map(Value::Object),
            _ => None,
        }
    }
}

/// Policies declared up front per type, type method and function.
#[derive(Default)]
pub struct DeclaredPolicies {
    types: HashMap<String, Vec<Policy>>,
    methods: HashMap<(String, String), Vec<Policy>>,
    functions: HashMap<String, Vec<Policy>>,
}

impl DeclaredPolicies {
    pub fn on_type(mut self, type_name: &str, policies: Vec<Policy>) -> Self {
        self.types.insert(type_name.to_owned(), policies);
        self
    }

    pub fn on_method(mut self, type_name: &str, method: &str, policies: Vec<Policy>) -> Self {
        self.methods
            .insert((type_name.to_owned(), method.to_owned()), policies);
        self
    }

    pub fn on_function(mut self, function: &str, policies: Vec<Policy>) -> Self {
        self.functions.insert(function.to_owned(), policies);
        self
    }
}

impl PolicyLoader for DeclaredPolicies {
    fn load_from_type(&self, type_name: &str) -> Result<Vec<Policy>, AccessError> {
        Ok(self.types.get(type_name).cloned().unwrap_or_default())
    }

    fn load_from_type_method(
        &self,
        type_name: &str,
        method: &str,
    ) -> Result<Vec<Policy>, AccessError> {
        Ok(self
            .methods
            .get(&(type_name.to_owned(), method.to_owned()))
            .cloned()
            .unwrap_or_default())
    }

    fn load_from_function(&self, function: &str) -> Result<Vec<Policy>, AccessError> {
        Ok(self.functions.get(function).cloned().unwrap_or_default())
    }

    fn type_exists(&self, type_name: &str) -> bool {
        self.types.contains_key(type_name)
    }
}

pub fn invoice(id: i64, owner: &str) -> ObjectRef {
    Arc::new(Invoice {
        id,
        owner: owner.to_owned(),
        limit: 100,
    })
}

pub fn config(debug: bool) -> AccessControlConfig {
    AccessControlConfig {
        debug,
        deny_if_no_policies: false,
    }
}

/// Engine with every collaborator wired, running as `subjects`.
pub fn authorization(
    policies: DeclaredPolicies,
    subjects: Vec<Value>,
    debug: bool,
) -> DefaultAuthorization {
    DefaultAuthorization::new(
        Arc::new(policies),
        Arc::new(StaticSubjectLocator::new(subjects)),
    )
    .with_role_checker(Arc::new(PropertyRoleChecker::default()))
    .with_permission_checker(Arc::new(PropertyPermissionChecker::default()))
    .with_resource_locator(Arc::new(
        InvoiceRepository::default()
            .with(Invoice {
                id: 1,
                owner: "alice".to_owned(),
                limit: 100,
            })
            .with(Invoice {
                id: 2,
                owner: "bob".to_owned(),
                limit: 10,
            }),
    ))
    .with_service_locator(Arc::new(MemoryServiceLocator::new()))
    .with_config(config(debug))
}

/// Engine with only the mandatory collaborators.
pub fn bare_authorization(
    policies: DeclaredPolicies,
    subjects: Vec<Value>,
    debug: bool,
) -> DefaultAuthorization {
    DefaultAuthorization::new(
        Arc::new(policies),
        Arc::new(StaticSubjectLocator::new(subjects)),
    )
    .with_config(config(debug))
}

pub fn alice() -> Value {
    Value::object(User::new("alice", &["ROLE_USER"]))
}

pub fn admin() -> Value {
    Value::object(User::new("root", &["ROLE_USER", "ROLE_ADMIN"]))
}
