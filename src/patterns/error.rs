use thiserror::Error;

/// Errors produced while interpreting search patterns
#[derive(Debug, Error)]
pub enum PatternError {
    /// Empty pattern is invalid
    #[error("Empty search pattern provided")]
    Empty,
}
