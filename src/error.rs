use thiserror::Error;

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Caller misuse that the crate reports instead of propagating bogus values
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// An action that is not part of the agent's configured action set
    #[error("invalid action `{action}`: not in the configured action set")]
    InvalidAction { action: String },

    /// A grid or action-set configuration that cannot describe a valid world
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A hyperparameter outside of its allowed range
    #[error("invalid value {value} for `{name}`: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f32,
        reason: String,
    },
}

impl Error {
    pub(crate) fn invalid_action(action: impl std::fmt::Debug) -> Self {
        Self::InvalidAction {
            action: format!("{action:?}"),
        }
    }
}
