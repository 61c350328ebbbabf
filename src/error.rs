use thiserror::Error;

/// Errors raised while building the signaling pattern database
///
/// These can only come from a bad static pattern table, never from packet data: callers are
/// expected to abort at startup.
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("pattern set is empty")]
    EmptyPatternSet,

    #[error("invalid pattern #{index}: {pattern:?}")]
    InvalidPattern { index: usize, pattern: String },

    #[error("could not build pattern database: {0}")]
    Build(#[from] aho_corasick::BuildError),
}
