use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

/// Every message the bot can send, loaded once at startup. A key missing
/// from the phrase file fails deserialization and aborts the process.
#[derive(Debug, Deserialize)]
pub struct Phrases {
    pub start_message: String,
    pub help_message: String,
    pub word_added: String,
    pub word_updated: String,
    pub word_exists: String,
    pub missing_argument: String,
    pub empty_db: String,
    pub quiz_question: String,
    pub quiz_correct: String,
    pub incorrect_answer: String,
    pub continue_quiz: String,
    pub quiz_next: String,
    pub quiz_exit: String,
    pub quiz_summary: String,
    pub incorrect_input: String,
    pub start_quiz_error: String,
    pub word_not_exist: String,
    pub unknown_command: String,
    pub generic_error: String,
}

impl Phrases {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading phrase file {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("parsing phrase file {}", path.display()))
    }
}

/// Substitutes `{name}` placeholders in a template.
pub fn render(template: &str, values: &[(&str, &str)]) -> String {
    let mut text = template.to_owned();
    for (name, value) in values {
        text = text.replace(&format!("{{{name}}}"), value);
    }
    text
}
