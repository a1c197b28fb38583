use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SequenceError {
    #[error("n must be non-negative, got {0}")]
    Negative(i64),
}
