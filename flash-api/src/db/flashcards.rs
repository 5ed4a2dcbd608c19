//! Flashcard queries
//!
//! Plain parameterized statements. No ordering, paging or transactions.

use flash_common::{Flashcard, NewFlashcard};
use sqlx::SqlitePool;

/// All rows in storage order
pub async fn list_flashcards(pool: &SqlitePool) -> Result<Vec<Flashcard>, sqlx::Error> {
    sqlx::query_as::<_, Flashcard>("SELECT id, title, question, answer FROM flashcards")
        .fetch_all(pool)
        .await
}

/// The row with `id`, if any
pub async fn get_flashcard(pool: &SqlitePool, id: i64) -> Result<Option<Flashcard>, sqlx::Error> {
    sqlx::query_as::<_, Flashcard>(
        "SELECT id, title, question, answer FROM flashcards WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Insert one row, returning the id SQLite assigned
pub async fn insert_flashcard(pool: &SqlitePool, card: &NewFlashcard) -> Result<i64, sqlx::Error> {
    let result = sqlx::query("INSERT INTO flashcards (title, question, answer) VALUES (?, ?, ?)")
        .bind(card.title.as_deref())
        .bind(card.question.as_deref())
        .bind(card.answer.as_deref())
        .execute(pool)
        .await?;

    Ok(result.last_insert_rowid())
}
