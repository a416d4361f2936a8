#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Static Policy Plugin
//!
//! A [`PolicyLoader`](access_control_sdk::PolicyLoader) serving policies
//! declared in YAML, per type, per type method and per free function.
//! Declarations are validated once at construction.
//!
//! ## Configuration
//!
//! ```yaml
//! types:
//!   InvoiceRef:
//!     policies:
//!       - kind: resource
//!         resource_type: invoice
//!         id_accessor: invoiceId
//!       - kind: delegate
//!         target_type: Invoice
//!   Invoice:
//!     policies:
//!       - kind: method
//!         expression: isOwner(subject)
//!     methods:
//!       pay:
//!         - kind: all_or_nothing
//!         - kind: role
//!           role: ROLE_ACCOUNTANT
//!         - kind: service
//!           expression: Billing.canPay(subject, amount)
//! functions:
//!   export_invoices:
//!     - kind: permission
//!       permission: invoice.export
//! ```

pub mod config;
pub mod domain;
pub mod error;

pub use config::{StaticPolicyPluginConfig, TypePolicies};
pub use domain::loader::StaticPolicyLoader;
pub use error::StaticPolicyError;
