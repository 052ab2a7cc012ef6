use thiserror::Error;

/// Engine-level failures. The two externally meaningful kinds are
/// `MissingInput` ("cannot run") and `Parse` ("cannot parse"); callers are
/// expected to branch on the variant, not the message.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("cannot run: missing input: {0}")]
    MissingInput(String),

    #[error("cannot parse: malformed source data: {0}")]
    Parse(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type SimResult<T> = Result<T, SimError>;
