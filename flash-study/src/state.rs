//! Study loop state machine
//!
//! All view state lives in [`StudyState`] and changes only through
//! [`update`], which returns the [`Effect`]s the runtime must carry out.
//! Effect outcomes come back as further [`Action`]s.
//!
//! Stale outcomes are filtered with the card epoch: it is bumped whenever
//! the presented card changes or the session resets, and every answer check
//! and scheduled advance carries the epoch it was issued under.

use std::path::PathBuf;

use flash_common::Flashcard;

use crate::client::GenerationResponse;
use crate::feedback::Feedback;

/// Top-level screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Upload,
    Study,
}

/// Complete view state of the study client
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudyState {
    pub mode: Mode,

    // Upload screen
    pub file: Option<PathBuf>,
    pub uploading: bool,
    pub upload_result: Option<GenerationResponse>,
    /// Polling the card list after a successful upload
    pub awaiting_generation: bool,
    /// Last card list fetch failure
    pub notice: Option<String>,

    // Study screen
    pub cards: Vec<Flashcard>,
    pub cursor: usize,
    pub answer: String,
    pub checking: bool,
    /// Set once the current answer has been graded
    pub answer_locked: bool,
    pub feedback: Option<Feedback>,

    pub epoch: u64,
}

/// Inputs to the reducer: user intents and effect outcomes
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Mounted,
    SelectFile(Option<PathBuf>),
    SubmitUpload,
    UploadFinished(GenerationResponse),
    CardsFetched(Result<Vec<Flashcard>, String>),
    StartStudy,
    EditAnswer(String),
    SubmitAnswer,
    AnswerChecked { epoch: u64, feedback: Feedback },
    NextCard,
    PrevCard,
    AutoAdvance { epoch: u64 },
    BackToUpload,
}

/// Work requested by the reducer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchCards,
    Upload { path: PathBuf },
    /// Poll the card list until it grows past `baseline`
    AwaitGeneration { baseline: usize },
    CheckAnswer {
        epoch: u64,
        flashcard_id: i64,
        answer: String,
    },
    ScheduleAdvance { epoch: u64 },
    /// Abort in-flight calls, timers and polling
    CancelPending,
}

impl StudyState {
    pub fn current_card(&self) -> Option<&Flashcard> {
        self.cards.get(self.cursor)
    }

    pub fn is_last_card(&self) -> bool {
        self.cursor + 1 >= self.cards.len()
    }

    /// Upload button enabled
    pub fn can_submit_upload(&self) -> bool {
        self.mode == Mode::Upload && self.file.is_some() && !self.uploading
    }

    /// Check button enabled
    pub fn can_submit_answer(&self) -> bool {
        self.mode == Mode::Study
            && !self.checking
            && !self.answer_locked
            && !self.answer.trim().is_empty()
            && self.current_card().is_some()
    }

    /// Manual navigation is offered once the answer has been graded
    pub fn can_navigate(&self) -> bool {
        self.mode == Mode::Study && self.answer_locked
    }

    fn begin_study(&mut self) {
        self.mode = Mode::Study;
        self.move_to(0);
    }

    fn move_to(&mut self, index: usize) {
        self.cursor = index;
        self.answer.clear();
        self.feedback = None;
        self.answer_locked = false;
        self.checking = false;
        self.epoch += 1;
    }

    /// Returns false when clamped
    fn step(&mut self, forward: bool) -> bool {
        let target = if forward {
            if self.is_last_card() {
                return false;
            }
            self.cursor + 1
        } else {
            match self.cursor.checked_sub(1) {
                Some(index) => index,
                None => return false,
            }
        };
        self.move_to(target);
        true
    }
}

/// Apply one action, returning the effects to run
pub fn update(state: &mut StudyState, action: Action) -> Vec<Effect> {
    match action {
        Action::Mounted => vec![Effect::FetchCards],

        Action::SelectFile(path) => {
            if state.mode == Mode::Upload && !state.uploading {
                state.file = path;
            }
            vec![]
        }

        Action::SubmitUpload => {
            if !state.can_submit_upload() {
                return vec![];
            }
            let Some(path) = state.file.clone() else {
                return vec![];
            };
            state.uploading = true;
            state.upload_result = None;
            vec![Effect::Upload { path }]
        }

        Action::UploadFinished(result) => {
            if !state.uploading {
                return vec![];
            }
            state.uploading = false;
            let success = result.success;
            state.upload_result = Some(result);
            if success {
                state.awaiting_generation = true;
                vec![Effect::AwaitGeneration {
                    baseline: state.cards.len(),
                }]
            } else {
                vec![]
            }
        }

        Action::CardsFetched(result) => {
            state.awaiting_generation = false;
            match result {
                Ok(cards) => {
                    state.notice = None;
                    state.cards = cards;
                    if state.cards.is_empty() {
                        state.mode = Mode::Upload;
                    } else {
                        state.begin_study();
                    }
                }
                Err(message) => {
                    state.notice = Some(format!("Failed to fetch flashcards: {}", message));
                }
            }
            vec![]
        }

        Action::StartStudy => {
            if state.mode == Mode::Upload && !state.cards.is_empty() {
                state.begin_study();
            }
            vec![]
        }

        Action::EditAnswer(text) => {
            if state.mode == Mode::Study && !state.answer_locked {
                state.answer = text;
            }
            vec![]
        }

        Action::SubmitAnswer => {
            if !state.can_submit_answer() {
                return vec![];
            }
            let Some(card) = state.current_card() else {
                return vec![];
            };
            let effect = Effect::CheckAnswer {
                epoch: state.epoch,
                flashcard_id: card.id,
                answer: state.answer.clone(),
            };
            state.checking = true;
            state.feedback = None;
            vec![effect]
        }

        Action::AnswerChecked { epoch, feedback } => {
            if epoch != state.epoch || state.mode != Mode::Study {
                return vec![];
            }
            state.checking = false;
            state.answer_locked = true;
            let correct = feedback.status.is_correct();
            state.feedback = Some(feedback);
            if correct {
                vec![Effect::ScheduleAdvance { epoch }]
            } else {
                vec![]
            }
        }

        Action::NextCard => {
            if state.can_navigate() {
                state.step(true);
            }
            vec![]
        }

        Action::PrevCard => {
            if state.can_navigate() {
                state.step(false);
            }
            vec![]
        }

        Action::AutoAdvance { epoch } => {
            if epoch == state.epoch && state.mode == Mode::Study {
                state.step(true);
            }
            vec![]
        }

        Action::BackToUpload => {
            let epoch = state.epoch + 1;
            *state = StudyState {
                epoch,
                ..StudyState::default()
            };
            vec![Effect::CancelPending]
        }
    }
}
