use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TxWatchError {
    #[error("Unknown feature: {0}")]
    UnknownFeature(String),
}
