use thiserror::Error;

/// Invalid arguments handed to selection or ranking.
///
/// These are caller bugs and are reported immediately instead of being coerced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("k must be non-negative, got {0}")]
    NegativeK(i64),
    #[error("unknown metric '{0}'")]
    UnknownMetric(String),
}
