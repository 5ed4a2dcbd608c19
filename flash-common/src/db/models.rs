//! Database models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A stored flashcard row.
///
/// The text columns are nullable: the create endpoint forwards whatever the
/// caller sent, and absent fields land as NULL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Flashcard {
    /// Assigned by SQLite on insert, never changed afterwards
    pub id: i64,
    pub title: Option<String>,
    pub question: Option<String>,
    pub answer: Option<String>,
}

impl Flashcard {
    pub fn title_text(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }

    pub fn question_text(&self) -> &str {
        self.question.as_deref().unwrap_or_default()
    }
}

/// Body of a create request. Every field is optional and unvalidated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFlashcard {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub answer: Option<String>,
}

impl NewFlashcard {
    pub fn new(
        title: impl Into<String>,
        question: impl Into<String>,
        answer: impl Into<String>,
    ) -> Self {
        Self {
            title: Some(title.into()),
            question: Some(question.into()),
            answer: Some(answer.into()),
        }
    }
}
