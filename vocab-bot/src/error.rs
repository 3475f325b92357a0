use thiserror::Error;

use crate::export::ExportError;

/// Domain errors. All of these are turned into user-visible phrases at the
/// dialogue boundary; only startup failures abort the process.
#[derive(Debug, Error)]
pub enum BotError {
    #[error("word '{0}' is already saved")]
    DuplicateWord(String),
    #[error("word not found")]
    WordNotFound,
    #[error("no words are stored yet")]
    NoWords,
    #[error("missing argument: {0}")]
    MissingArgument(&'static str),
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
    #[error("export failed: {0}")]
    Export(#[from] ExportError),
}
