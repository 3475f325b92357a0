use csv::Writer;
use thiserror::Error;

use crate::storage::Word;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("CSV into inner error: {0}")]
    CsvIntoInner(#[from] csv::IntoInnerError<Writer<Vec<u8>>>),
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Renders the whole vocabulary as a CSV document, one row per word. An
/// empty store produces a header-only document.
pub fn words_to_csv(words: &[Word]) -> Result<String, ExportError> {
    let mut wtr = Writer::from_writer(vec![]);
    wtr.write_record(["id", "word", "translation", "example", "correct_answer_count"])?;
    for word in words {
        wtr.write_record([
            word.id.to_string(),
            word.word.clone(),
            word.translation.clone(),
            word.example.clone().unwrap_or_default(),
            word.correct_answer_count.to_string(),
        ])?;
    }
    Ok(String::from_utf8(wtr.into_inner()?)?)
}
