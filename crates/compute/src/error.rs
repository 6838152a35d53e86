/// Precondition violations found while extracting features.
///
/// Extraction stops at the first offending record; no partial feature
/// vector is ever produced.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExtractError {
    #[error("transaction history is empty")]
    EmptyHistory,

    #[error("transaction #{index} ({id}): invalid amount: {reason}")]
    InvalidAmount {
        index: usize,
        id: String,
        reason: String,
    },

    #[error("transaction #{index} ({id}): unparseable date '{value}'")]
    InvalidDate {
        index: usize,
        id: String,
        value: String,
    },
}
