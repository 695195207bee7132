use reveal::{ConfigError, RevealError};

#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    Parse { what: &'static str, message: String },
    InvalidScript(String),
    Config(ConfigError),
    Reveal(RevealError),
    /// The run did not settle within the frame limit.
    FrameLimit(u64),
}

impl std::fmt::Display for SimError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimError::Parse { what, message } => write!(f, "failed to parse {what}: {message}"),
            SimError::InvalidScript(msg) => write!(f, "invalid scroll script: {msg}"),
            SimError::Config(err) => write!(f, "{err}"),
            SimError::Reveal(err) => write!(f, "{err}"),
            SimError::FrameLimit(n) => write!(f, "simulation did not settle after {n} frames"),
        }
    }
}

impl std::error::Error for SimError {}

impl From<ConfigError> for SimError {
    fn from(err: ConfigError) -> Self {
        SimError::Config(err)
    }
}

impl From<RevealError> for SimError {
    fn from(err: RevealError) -> Self {
        SimError::Reveal(err)
    }
}
