//! Error types for daybook operations.

use thiserror::Error;

/// The single error kind raised by daybook: a caller passed input the
/// operation cannot accept. Each variant carries a fixed message.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidInput {
    #[error("Invalid date provided")]
    Date,

    #[error("Invalid amount provided")]
    Amount,

    #[error("Invalid type provided")]
    Unit,

    #[error("Invalid range: from date must be before to date")]
    Range,

    #[error("Chunk size must be a positive integer")]
    ChunkSize,

    #[error("Invalid year provided")]
    Year,
}

pub type Result<T> = std::result::Result<T, InvalidInput>;
