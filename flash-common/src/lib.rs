//! # Flashcards Common Library
//!
//! Shared code for the flashcard API server and the study client:
//! - Flashcard model
//! - Database initialization
//! - Configuration loading (TOML file, environment, defaults)
//! - Common error type

pub mod config;
pub mod db;
pub mod error;

pub use db::models::{Flashcard, NewFlashcard};
pub use error::{Error, Result};
