//! Agent service calls: PDF upload for card generation, answer grading

use std::path::Path;

use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{check_status, StudyClient};
use crate::error::{Result, StudyError};
use crate::feedback::Feedback;

/// Response of the generation service.
///
/// `response` carries the success text, `error` the failure text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResponse {
    pub success: bool,
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl GenerationResponse {
    /// Response synthesized when the upload never got an answer
    pub fn connection_error(message: impl std::fmt::Display) -> Self {
        Self {
            success: false,
            response: None,
            error: Some(format!("Connection error: {}", message)),
        }
    }

    /// Text for the result banner
    pub fn message(&self) -> &str {
        let text = if self.success {
            self.response.as_deref()
        } else {
            self.error.as_deref()
        };
        text.unwrap_or_default()
    }
}

impl StudyClient {
    /// POST /upload-pdf with the file in the multipart field `file`.
    ///
    /// The service answers with its own `{success, error}` body even on
    /// failure, so the body is parsed regardless of the HTTP status.
    pub async fn upload_pdf(&self, path: &Path) -> Result<GenerationResponse> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.pdf".to_string());

        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("application/pdf")
            .map_err(|e| StudyError::Parse(e.to_string()))?;
        let form = Form::new().part("file", part);

        let url = self.agent("/upload-pdf");
        debug!(url = %url, path = %path.display(), "Uploading PDF");

        let response = self.http.post(&url).multipart(form).send().await?;
        response
            .json::<GenerationResponse>()
            .await
            .map_err(|e| StudyError::Parse(e.to_string()))
    }

    /// POST /check-answer with multipart fields `flashcard_id` and `user_answer`
    pub async fn check_answer(&self, flashcard_id: i64, user_answer: &str) -> Result<Feedback> {
        let form = Form::new()
            .text("flashcard_id", flashcard_id.to_string())
            .text("user_answer", user_answer.to_string());

        let url = self.agent("/check-answer");
        debug!(url = %url, flashcard_id, "Checking answer");

        let response = check_status(self.http.post(&url).multipart(form).send().await?).await?;
        response
            .json::<Feedback>()
            .await
            .map_err(|e| StudyError::Parse(e.to_string()))
    }
}
