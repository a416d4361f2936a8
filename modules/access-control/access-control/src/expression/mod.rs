//! Call expressions used by `Method` and `Service` policies.

pub mod accessor;
pub mod choices;
pub mod executor;
pub mod method;
pub mod parser;

pub use accessor::get_value_from;
pub use choices::ArgumentChoices;
pub use executor::{
    ArgumentValue, NamedArguments, bind_arguments, call_resource_method, call_service_method,
};
pub use method::{ExpressionArgument, MethodExpression};
pub use parser::parse;
