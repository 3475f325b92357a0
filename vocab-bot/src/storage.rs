use chrono::{NaiveDateTime, Utc};
use sqlx::{migrate::MigrateDatabase, query, query_as, FromRow, Pool, Sqlite, SqlitePool};

use crate::error::BotError;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS words (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    word TEXT NOT NULL UNIQUE,
    translation TEXT NOT NULL,
    example TEXT,
    correct_answer_count INTEGER NOT NULL DEFAULT 0,
    last_quizzed DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
);
";

#[derive(Debug, Clone, FromRow)]
pub struct Word {
    pub id: i64,
    pub word: String,
    pub translation: String,
    pub example: Option<String>,
    /// Incremented on correct answers, decremented on wrong ones. Allowed to
    /// go negative; the selection weight clamps it.
    pub correct_answer_count: i64,
    pub last_quizzed: NaiveDateTime,
}

pub struct Storage {
    pool: Pool<Sqlite>,
}

impl Storage {
    pub async fn initialize(url: &str) -> sqlx::Result<Self> {
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            Sqlite::create_database(url).await?;
        }
        let pool = SqlitePool::connect(url).await?;
        query(SCHEMA).execute(&pool).await?;
        Ok(Self { pool })
    }

    #[cfg(test)]
    pub(crate) async fn in_memory() -> sqlx::Result<Self> {
        // A pool of one, otherwise every connection gets its own empty db.
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        query(SCHEMA).execute(&pool).await?;
        Ok(Self { pool })
    }
}

impl Storage {
    /// Inserts a new word with zeroed statistics and `last_quizzed` set to
    /// the creation time.
    pub async fn add_word(
        &self,
        word: &str,
        translation: &str,
        example: Option<&str>,
    ) -> Result<Word, BotError> {
        let result = query(
            "INSERT INTO words(word, translation, example, last_quizzed) VALUES(?, ?, ?, ?)",
        )
        .bind(word)
        .bind(translation)
        .bind(example)
        .bind(Utc::now().naive_utc())
        .execute(&self.pool)
        .await;
        match result {
            Ok(done) => self.word_by_id(done.last_insert_rowid()).await,
            Err(error) => match &error {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    Err(BotError::DuplicateWord(word.to_owned()))
                }
                _ => Err(error.into()),
            },
        }
    }

    /// Updates only the supplied fields of an existing word.
    pub async fn update_word(
        &self,
        word: &str,
        translation: Option<&str>,
        example: Option<&str>,
    ) -> Result<Word, BotError> {
        let result = query(
            "UPDATE words SET translation = COALESCE(?, translation), example = COALESCE(?, example) WHERE word = ?",
        )
        .bind(translation)
        .bind(example)
        .bind(word)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(BotError::WordNotFound);
        }
        self.word_by_text(word).await?.ok_or(BotError::WordNotFound)
    }

    pub async fn word_by_id(&self, id: i64) -> Result<Word, BotError> {
        query_as::<_, Word>("SELECT * FROM words WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(BotError::WordNotFound)
    }

    pub async fn word_by_text(&self, word: &str) -> Result<Option<Word>, BotError> {
        Ok(query_as::<_, Word>("SELECT * FROM words WHERE word = ?")
            .bind(word)
            .fetch_optional(&self.pool)
            .await?)
    }

    pub async fn all_words(&self) -> Result<Vec<Word>, BotError> {
        Ok(query_as::<_, Word>("SELECT * FROM words")
            .fetch_all(&self.pool)
            .await?)
    }

    pub async fn mark_quizzed(&self, id: i64, now: NaiveDateTime) -> Result<(), BotError> {
        query("UPDATE words SET last_quizzed = ? WHERE id = ?")
            .bind(now)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Applies `delta` to the correct-answer count in a single statement so
    /// an answer evaluation cannot interleave with another update of the
    /// same row.
    pub async fn adjust_correct_count(&self, id: i64, delta: i64) -> Result<(), BotError> {
        let result =
            query("UPDATE words SET correct_answer_count = correct_answer_count + ? WHERE id = ?")
                .bind(delta)
                .bind(id)
                .execute(&self.pool)
                .await?;
        if result.rows_affected() == 0 {
            return Err(BotError::WordNotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn added_word_starts_with_default_statistics() {
        let storage = Storage::in_memory().await.unwrap();
        let added = storage.add_word("cat", "кіт", None).await.unwrap();
        let fetched = storage.word_by_id(added.id).await.unwrap();
        assert_eq!(fetched.word, "cat");
        assert_eq!(fetched.translation, "кіт");
        assert_eq!(fetched.example, None);
        assert_eq!(fetched.correct_answer_count, 0);
        assert_eq!(fetched.last_quizzed, added.last_quizzed);
    }

    #[tokio::test]
    async fn duplicate_word_is_rejected_and_store_unchanged() {
        let storage = Storage::in_memory().await.unwrap();
        storage.add_word("cat", "кіт", None).await.unwrap();
        let error = storage.add_word("cat", "кішка", None).await.unwrap_err();
        assert!(matches!(error, BotError::DuplicateWord(word) if word == "cat"));
        let words = storage.all_words().await.unwrap();
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].translation, "кіт");
    }

    #[tokio::test]
    async fn update_changes_only_supplied_fields() {
        let storage = Storage::in_memory().await.unwrap();
        storage
            .add_word("cat", "кіт", Some("the cat sleeps"))
            .await
            .unwrap();
        let updated = storage
            .update_word("cat", Some("кішка"), None)
            .await
            .unwrap();
        assert_eq!(updated.translation, "кішка");
        assert_eq!(updated.example.as_deref(), Some("the cat sleeps"));
    }

    #[tokio::test]
    async fn update_of_missing_word_reports_not_found() {
        let storage = Storage::in_memory().await.unwrap();
        let error = storage
            .update_word("dog", Some("пес"), None)
            .await
            .unwrap_err();
        assert!(matches!(error, BotError::WordNotFound));
    }

    #[tokio::test]
    async fn correct_count_can_go_negative() {
        let storage = Storage::in_memory().await.unwrap();
        let added = storage.add_word("cat", "кіт", None).await.unwrap();
        storage.adjust_correct_count(added.id, -1).await.unwrap();
        storage.adjust_correct_count(added.id, -1).await.unwrap();
        let word = storage.word_by_id(added.id).await.unwrap();
        assert_eq!(word.correct_answer_count, -2);
    }

    #[tokio::test]
    async fn mark_quizzed_stamps_the_given_time() {
        let storage = Storage::in_memory().await.unwrap();
        let added = storage.add_word("cat", "кіт", None).await.unwrap();
        let stamp =
            NaiveDateTime::parse_from_str("2024-02-01 12:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
        storage.mark_quizzed(added.id, stamp).await.unwrap();
        let word = storage.word_by_id(added.id).await.unwrap();
        assert_eq!(word.last_quizzed, stamp);
    }
}
