use thiserror::Error;

/// Failures the conversation knows how to recover from. Each one ends up as a
/// visible assistant message plus a defined state transition, never a crash.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoryError {
    #[error("input was empty")]
    InvalidInput,

    #[error("no API key is configured. Use `/key YOUR_KEY` or set GROQ_API_KEY")]
    MissingCredential,

    #[error("story generation failed: {0}")]
    Generation(String),

    #[error("saving the story failed: {0}")]
    Persistence(String),

    #[error("invalid settings: {0}")]
    InvalidSettings(String),
}
