//! Database access layer for flash-api

mod flashcards;

pub use flashcards::{get_flashcard, insert_flashcard, list_flashcards};
