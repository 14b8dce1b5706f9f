/// Result alias that carries the custom [`MorseError`] type.
pub type Result<T> = std::result::Result<T, MorseError>;

/// Common error type for the core crate.
#[derive(Debug, thiserror::Error)]
pub enum MorseError {
    /// The audio sink refused writes when the encoder was constructed.
    #[error("audio sink is not writable")]
    SinkNotWritable,
    /// A character outside every code table that is neither a space nor a
    /// bracket.
    #[error("unknown character \"{0}\"")]
    UnknownCharacter(char),
    /// A bracketed `<NAME>` escape whose name is not a procedural character.
    #[error("unknown procedural character \"<{0}>\"")]
    UnknownProceduralCharacter(String),
    /// A `<` with no closing `>` before the end of the input.
    #[error("unterminated procedural character")]
    UnterminatedProceduralCharacter,
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// Raised by sink implementations when a write fails.
    #[error("audio sink error: {0}")]
    Sink(String),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

impl MorseError {
    /// Creates a sink error that wraps the provided message.
    pub fn sink<T: Into<String>>(msg: T) -> Self {
        Self::Sink(msg.into())
    }

    pub fn invalid_config<T: Into<String>>(msg: T) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
