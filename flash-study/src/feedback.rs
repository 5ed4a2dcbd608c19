//! Grading feedback and its display treatment

use serde::{Deserialize, Serialize};

/// Grading outcome as reported by the grading service.
///
/// The service speaks Portuguese: `correto`, `parcial`, `incorreto`. The
/// client adds `erro` for its own transport failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FeedbackStatus {
    Correct,
    Partial,
    Incorrect,
    Error,
    Other(String),
}

impl FeedbackStatus {
    pub fn as_str(&self) -> &str {
        match self {
            FeedbackStatus::Correct => "correto",
            FeedbackStatus::Partial => "parcial",
            FeedbackStatus::Incorrect => "incorreto",
            FeedbackStatus::Error => "erro",
            FeedbackStatus::Other(raw) => raw,
        }
    }

    /// Only a fully correct answer triggers the automatic advance
    pub fn is_correct(&self) -> bool {
        matches!(self, FeedbackStatus::Correct)
    }

    pub fn style(&self) -> FeedbackStyle {
        match self {
            FeedbackStatus::Correct => FeedbackStyle {
                label: "Correct",
                color: Color::Green,
                icon: "✔",
            },
            FeedbackStatus::Partial => FeedbackStyle {
                label: "Partially correct",
                color: Color::Yellow,
                icon: "!",
            },
            FeedbackStatus::Incorrect => FeedbackStyle {
                label: "Incorrect",
                color: Color::Red,
                icon: "✘",
            },
            FeedbackStatus::Error => FeedbackStyle {
                label: "Error",
                color: Color::Gray,
                icon: "!",
            },
            FeedbackStatus::Other(_) => FeedbackStyle {
                label: "Unknown",
                color: Color::Gray,
                icon: "!",
            },
        }
    }
}

impl From<String> for FeedbackStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "correto" => FeedbackStatus::Correct,
            "parcial" => FeedbackStatus::Partial,
            "incorreto" => FeedbackStatus::Incorrect,
            "erro" => FeedbackStatus::Error,
            _ => FeedbackStatus::Other(raw),
        }
    }
}

impl From<FeedbackStatus> for String {
    fn from(status: FeedbackStatus) -> Self {
        status.as_str().to_string()
    }
}

/// Response of the grading service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub status: FeedbackStatus,
    #[serde(default)]
    pub feedback: String,
    #[serde(default)]
    pub official_answer: Option<String>,
}

impl Feedback {
    /// Feedback shown when the grading call itself failed
    pub fn transport_error(message: impl std::fmt::Display) -> Self {
        Self {
            status: FeedbackStatus::Error,
            feedback: format!("Failed to check answer: {}", message),
            official_answer: None,
        }
    }

    /// Official answer, if the service sent a non-empty one
    pub fn official_answer(&self) -> Option<&str> {
        self.official_answer
            .as_deref()
            .filter(|answer| !answer.trim().is_empty())
    }
}

/// Terminal colors used by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Green,
    Yellow,
    Red,
    Gray,
}

impl Color {
    pub fn ansi(self) -> &'static str {
        match self {
            Color::Green => "\x1b[32m",
            Color::Yellow => "\x1b[33m",
            Color::Red => "\x1b[31m",
            Color::Gray => "\x1b[90m",
        }
    }
}

/// Fixed display treatment of a status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedbackStyle {
    pub label: &'static str,
    pub color: Color,
    pub icon: &'static str,
}
