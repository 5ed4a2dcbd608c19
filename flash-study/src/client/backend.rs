//! Flashcard API calls

use flash_common::Flashcard;
use tracing::debug;

use super::{check_status, StudyClient};
use crate::error::{Result, StudyError};

impl StudyClient {
    /// GET /flashcards
    pub async fn fetch_flashcards(&self) -> Result<Vec<Flashcard>> {
        let url = self.backend("/flashcards");
        debug!(url = %url, "Fetching flashcards");

        let response = check_status(self.http.get(&url).send().await?).await?;
        let cards: Vec<Flashcard> = response
            .json()
            .await
            .map_err(|e| StudyError::Parse(e.to_string()))?;

        debug!(count = cards.len(), "Fetched flashcards");
        Ok(cards)
    }
}
