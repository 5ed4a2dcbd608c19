//! HTTP API handlers for flash-api

pub mod flashcards;
pub mod health;

pub use flashcards::{create_flashcard, get_flashcard, list_flashcards};
pub use health::health_routes;
