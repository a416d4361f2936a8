use access_control_sdk::AccessError;

/// Errors raised while loading or validating static policies.
#[derive(thiserror::Error, Debug)]
pub enum StaticPolicyError {
    #[error("cannot read policy file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid static policy configuration: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("{target} declares more than one Resource policy")]
    DuplicateResource { target: String },

    #[error("{type_name} cannot delegate to itself")]
    SelfDelegation { type_name: String },
}

impl From<StaticPolicyError> for AccessError {
    fn from(e: StaticPolicyError) -> Self {
        Self::configuration(e.to_string())
    }
}
