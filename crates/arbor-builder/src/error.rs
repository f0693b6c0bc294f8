//! Builder errors

use arbor_sink::SinkError;

/// Result type for builder operations
pub type BuildResult<T> = Result<T, BuildError>;

/// Builder errors
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// A caller-supplied argument was rejected
    #[error("Invalid argument `{argument}`: {reason}")]
    InvalidArgument {
        argument: &'static str,
        reason: &'static str,
    },

    /// Sequence numbers ran past `u32::MAX`
    #[error("Sequence numbers exhausted")]
    SequenceExhausted,

    /// The sink rejected a call; passed through unchanged
    #[error(transparent)]
    Sink(#[from] SinkError),
}

impl BuildError {
    pub(crate) fn empty_name(argument: &'static str) -> Self {
        BuildError::InvalidArgument {
            argument,
            reason: "must not be empty or whitespace",
        }
    }
}

/// Lets builder failures inside a render fragment surface through the sink
impl From<BuildError> for SinkError {
    fn from(err: BuildError) -> Self {
        match err {
            BuildError::Sink(inner) => inner,
            other => SinkError::Fragment(other.to_string()),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid builder configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Configured `{0}` attribute name is empty")]
    EmptyAttributeName(&'static str),
}
