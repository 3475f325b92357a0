use chrono::Utc;

use crate::error::BotError;
use crate::export;
use crate::phrases::{render, Phrases};
use crate::selection;
use crate::session::{QuizState, Session};
use crate::storage::Storage;

/// Outbound payload, transport-agnostic. The main loop turns these into
/// Telegram API calls.
#[derive(Debug, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    /// Text plus a one-time reply keyboard with the given options.
    Choice { text: String, options: Vec<String> },
    Document { file_name: String, data: Vec<u8> },
}

/// Entry point for one inbound message. Every domain error is rendered to a
/// user-visible phrase here; nothing propagates to the transport loop.
pub async fn handle_message(
    storage: &Storage,
    phrases: &Phrases,
    session: &mut Session,
    text: &str,
) -> Vec<Reply> {
    match dispatch(storage, phrases, session, text).await {
        Ok(replies) => replies,
        Err(error) => vec![Reply::Text(describe_error(phrases, &error))],
    }
}

async fn dispatch(
    storage: &Storage,
    phrases: &Phrases,
    session: &mut Session,
    text: &str,
) -> Result<Vec<Reply>, BotError> {
    let text = text.trim();
    if let Some(command_line) = text.strip_prefix('/') {
        let mut args = command_line.split_whitespace();
        let command = args.next().unwrap_or("");
        // Commands in group chats arrive as /quiz@botname.
        let command = command.split('@').next().unwrap_or(command);
        return match command {
            "start" => Ok(vec![Reply::Text(phrases.start_message.clone())]),
            "help" => Ok(vec![Reply::Text(phrases.help_message.clone())]),
            "add_word" => add_word(storage, phrases, args).await,
            "update_word" => update_word(storage, phrases, args).await,
            "quiz" => quiz(storage, phrases, session).await,
            "export_words" => export_words(storage).await,
            _ => Ok(vec![Reply::Text(phrases.unknown_command.clone())]),
        };
    }
    match session.state {
        QuizState::AwaitingAnswer { word_id } => {
            check_answer(storage, phrases, session, word_id, text).await
        }
        QuizState::AwaitingContinueChoice => continue_choice(storage, phrases, session, text).await,
        QuizState::Idle => Ok(vec![Reply::Text(phrases.start_quiz_error.clone())]),
    }
}

fn describe_error(phrases: &Phrases, error: &BotError) -> String {
    match error {
        BotError::DuplicateWord(word) => render(&phrases.word_exists, &[("word", word)]),
        BotError::WordNotFound => phrases.word_not_exist.clone(),
        BotError::NoWords => phrases.empty_db.clone(),
        BotError::MissingArgument(argument) => {
            render(&phrases.missing_argument, &[("argument", argument)])
        }
        other => render(&phrases.generic_error, &[("error", &other.to_string())]),
    }
}

async fn add_word<'a>(
    storage: &Storage,
    phrases: &Phrases,
    mut args: impl Iterator<Item = &'a str>,
) -> Result<Vec<Reply>, BotError> {
    let word = args.next().ok_or(BotError::MissingArgument("word"))?;
    let translation = args.collect::<Vec<_>>().join(" ");
    if translation.is_empty() {
        return Err(BotError::MissingArgument("translation"));
    }
    let added = storage.add_word(word, &translation, None).await?;
    Ok(vec![Reply::Text(render(
        &phrases.word_added,
        &[("word", &added.word), ("translation", &added.translation)],
    ))])
}

async fn update_word<'a>(
    storage: &Storage,
    phrases: &Phrases,
    mut args: impl Iterator<Item = &'a str>,
) -> Result<Vec<Reply>, BotError> {
    let word = args.next().ok_or(BotError::MissingArgument("word"))?;
    let translation = args.collect::<Vec<_>>().join(" ");
    if translation.is_empty() {
        return Err(BotError::MissingArgument("translation"));
    }
    let updated = storage.update_word(word, Some(&translation), None).await?;
    Ok(vec![Reply::Text(render(
        &phrases.word_updated,
        &[("word", &updated.word), ("translation", &updated.translation)],
    ))])
}

/// Poses the next question, drawn by the selection policy.
async fn quiz(
    storage: &Storage,
    phrases: &Phrases,
    session: &mut Session,
) -> Result<Vec<Reply>, BotError> {
    let word = selection::select_word(storage, Utc::now().naive_utc()).await?;
    session.pose(word.id);
    Ok(vec![Reply::Text(render(
        &phrases.quiz_question,
        &[("word", &word.word)],
    ))])
}

async fn check_answer(
    storage: &Storage,
    phrases: &Phrases,
    session: &mut Session,
    word_id: i64,
    answer: &str,
) -> Result<Vec<Reply>, BotError> {
    let word = storage.word_by_id(word_id).await?;
    let correct = answer.to_lowercase() == word.translation.trim().to_lowercase();
    storage
        .adjust_correct_count(word.id, if correct { 1 } else { -1 })
        .await?;
    session.record_answer(correct);
    let verdict = if correct {
        phrases.quiz_correct.clone()
    } else {
        render(
            &phrases.incorrect_answer,
            &[("correct_answer", &word.translation)],
        )
    };
    Ok(vec![
        Reply::Text(verdict),
        Reply::Choice {
            text: phrases.continue_quiz.clone(),
            options: vec![phrases.quiz_next.clone(), phrases.quiz_exit.clone()],
        },
    ])
}

async fn continue_choice(
    storage: &Storage,
    phrases: &Phrases,
    session: &mut Session,
    choice: &str,
) -> Result<Vec<Reply>, BotError> {
    let choice = choice.to_lowercase();
    if choice == phrases.quiz_next.to_lowercase() {
        quiz(storage, phrases, session).await
    } else if choice == phrases.quiz_exit.to_lowercase() {
        let tally = session.finish();
        Ok(vec![Reply::Text(render(
            &phrases.quiz_summary,
            &[("correct", &tally.to_string())],
        ))])
    } else {
        Ok(vec![Reply::Text(phrases.incorrect_input.clone())])
    }
}

async fn export_words(storage: &Storage) -> Result<Vec<Reply>, BotError> {
    let words = storage.all_words().await?;
    let csv = export::words_to_csv(&words)?;
    Ok(vec![Reply::Document {
        file_name: "words.csv".to_owned(),
        data: csv.into_bytes(),
    }])
}
