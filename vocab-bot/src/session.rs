use std::collections::HashMap;

/// Where a chat currently is in the quiz dialogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuizState {
    #[default]
    Idle,
    AwaitingAnswer {
        word_id: i64,
    },
    AwaitingContinueChoice,
}

/// Per-chat quiz progress. Lives only for the lifetime of the process.
#[derive(Debug, Default)]
pub struct Session {
    pub state: QuizState,
    correct: Option<u32>,
}

impl Session {
    /// A question was posed; remember the word and make sure a tally exists.
    pub fn pose(&mut self, word_id: i64) {
        self.state = QuizState::AwaitingAnswer { word_id };
        self.correct.get_or_insert(0);
    }

    /// Records the outcome of an answer; the posed word id is dropped and
    /// the chat moves to the continue prompt.
    pub fn record_answer(&mut self, correct: bool) {
        if correct {
            *self.correct.get_or_insert(0) += 1;
        }
        self.state = QuizState::AwaitingContinueChoice;
    }

    /// Ends the session, returning the final tally and clearing it.
    pub fn finish(&mut self) -> u32 {
        self.state = QuizState::Idle;
        self.correct.take().unwrap_or(0)
    }

    pub fn tally(&self) -> u32 {
        self.correct.unwrap_or(0)
    }
}

/// Ephemeral session records, keyed by chat id.
pub type Sessions = HashMap<i64, Session>;
