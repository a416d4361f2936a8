//! Domain layer for access control.

pub mod authorization;
mod handlers;

pub use authorization::DefaultAuthorization;
