use chrono::NaiveDateTime;
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;

use crate::error::BotError;
use crate::storage::{Storage, Word};

/// Words reviewed within this many days get no idle bonus.
const GRACE_DAYS: i64 = 7;
/// Correct-answer count at which the accuracy bonus bottoms out.
const TARGET_CORRECT: i64 = 10;

/// Sampling weight of one word at `now`. Zero for a well-known word seen
/// recently; grows by one per day of neglect past the grace period and by
/// one per correct answer still missing from the target.
pub fn weight(word: &Word, now: NaiveDateTime) -> u64 {
    let days_idle = (now - word.last_quizzed).num_days();
    let time_weight = (days_idle - GRACE_DAYS).max(0);
    let accuracy_weight = (TARGET_CORRECT - word.correct_answer_count).max(0);
    (time_weight + accuracy_weight) as u64
}

/// Weighted random draw over the whole word list. `WeightedIndex` rejects an
/// all-zero vector, so that case falls back to a uniform draw instead of
/// failing.
pub fn pick<'a>(words: &'a [Word], now: NaiveDateTime) -> Option<&'a Word> {
    let mut rng = rand::thread_rng();
    let weights: Vec<u64> = words.iter().map(|word| weight(word, now)).collect();
    match WeightedIndex::new(&weights) {
        Ok(distribution) => words.get(distribution.sample(&mut rng)),
        Err(_) => words.choose(&mut rng),
    }
}

/// Draws the next quiz word and immediately stamps its `last_quizzed`
/// timestamp to `now`.
pub async fn select_word(storage: &Storage, now: NaiveDateTime) -> Result<Word, BotError> {
    let words = storage.all_words().await?;
    let selected = pick(&words, now).ok_or(BotError::NoWords)?;
    storage.mark_quizzed(selected.id, now).await?;
    let mut word = selected.clone();
    word.last_quizzed = now;
    Ok(word)
}
