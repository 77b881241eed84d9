use thiserror::Error;

/// Errors raised while configuring agents and environments or reading interactive input
#[derive(Debug, Error)]
pub enum Error {
    /// A hyperparameter or constructor argument is out of range
    #[error("invalid configuration for `{name}`: {reason}")]
    Configuration { name: &'static str, reason: String },

    /// A multi-agent environment was given the same agent identifier twice
    #[error("agent `{0}` appears more than once")]
    DuplicateAgent(String),

    /// The interactive agent's input stream ended before a valid response arrived
    #[error("input closed before a valid response was entered")]
    InputClosed,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn configuration(name: &'static str, reason: impl Into<String>) -> Self {
        Self::Configuration {
            name,
            reason: reason.into(),
        }
    }
}
