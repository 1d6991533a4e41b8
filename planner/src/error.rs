pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("initial state, goal state and action list must not be empty")]
    InvalidRequest,
    #[error("preconditions not fulfilled for action '{0}'")]
    PreconditionViolation(String),
    #[error("malformed predicate '{input}': {reason}")]
    MalformedPredicate { input: String, reason: String },
    #[error("unknown state template '{0}'")]
    UnknownTemplate(String),
    #[error("error reading configuration")]
    Configuration(#[from] config::ConfigError),
    #[error("serialization failed")]
    Serialization(#[from] serde_json::Error),
    #[error("internal planning error")]
    Internal(#[from] anyhow::Error),
}

impl Error {
    pub(crate) fn malformed(input: &str, reason: &str) -> Self {
        Self::MalformedPredicate {
            input: input.to_owned(),
            reason: reason.to_owned(),
        }
    }
}
