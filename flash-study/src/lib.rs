//! flash-study library - study client for the flashcard API
//!
//! The study loop is a reducer ([`state::update`]) over an explicit state
//! record, driven by [`runtime::StudyRuntime`], which performs the network
//! calls and timers the reducer asks for.

pub mod client;
pub mod command;
pub mod error;
pub mod feedback;
pub mod runtime;
pub mod state;
pub mod view;

pub use client::{ClientConfig, GenerationResponse, StudyClient};
pub use error::{Result, StudyError};
pub use feedback::{Feedback, FeedbackStatus};
pub use runtime::{RuntimeConfig, StudyRuntime};
pub use state::{update, Action, Effect, Mode, StudyState};
