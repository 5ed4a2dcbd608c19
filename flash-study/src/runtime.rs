//! Effect runtime for the study loop
//!
//! Runs the [`Effect`]s produced by [`update`] as tokio tasks and feeds
//! their outcomes back through one action channel. State is only touched
//! by whoever owns the receiving end, so the loop stays single-threaded.
//!
//! Every task runs under a child of the session token. `CancelPending`
//! cancels the session and starts a new one, which silently drops in-flight
//! requests, pending advances and generation polling.

use std::future::Future;
use std::time::Duration;

use flash_common::config::StudyConfig;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::client::{GenerationResponse, StudyClient};
use crate::feedback::Feedback;
use crate::state::{update, Action, Effect, StudyState};

/// Timers used by the runtime
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub auto_advance: Duration,
    pub poll_interval: Duration,
    pub poll_attempts: u32,
}

impl From<&StudyConfig> for RuntimeConfig {
    fn from(study: &StudyConfig) -> Self {
        Self {
            auto_advance: Duration::from_millis(study.auto_advance_ms),
            poll_interval: Duration::from_millis(study.generation_poll_interval_ms),
            poll_attempts: study.generation_poll_attempts,
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::from(&StudyConfig::default())
    }
}

pub struct StudyRuntime {
    client: StudyClient,
    config: RuntimeConfig,
    actions: mpsc::UnboundedSender<Action>,
    session: CancellationToken,
}

impl StudyRuntime {
    /// Create a runtime and the receiver its outcomes arrive on
    pub fn new(
        client: StudyClient,
        config: RuntimeConfig,
    ) -> (Self, mpsc::UnboundedReceiver<Action>) {
        let (actions, receiver) = mpsc::unbounded_channel();
        let runtime = Self {
            client,
            config,
            actions,
            session: CancellationToken::new(),
        };
        (runtime, receiver)
    }

    /// Sender for user input, sharing the channel with effect outcomes
    pub fn sender(&self) -> mpsc::UnboundedSender<Action> {
        self.actions.clone()
    }

    /// Reduce one action and start its effects
    pub fn dispatch(&mut self, state: &mut StudyState, action: Action) {
        let effects = update(state, action);
        for effect in effects {
            self.run(effect);
        }
    }

    fn run(&mut self, effect: Effect) {
        debug!(?effect, "Running effect");
        match effect {
            Effect::FetchCards => {
                let client = self.client.clone();
                self.spawn(async move {
                    let result = client.fetch_flashcards().await.map_err(|e| {
                        warn!("Fetching flashcards failed: {}", e);
                        e.to_string()
                    });
                    Action::CardsFetched(result)
                });
            }

            Effect::Upload { path } => {
                let client = self.client.clone();
                self.spawn(async move {
                    let response = client.upload_pdf(&path).await.unwrap_or_else(|e| {
                        warn!(path = %path.display(), "Upload failed: {}", e);
                        GenerationResponse::connection_error(e)
                    });
                    Action::UploadFinished(response)
                });
            }

            Effect::AwaitGeneration { baseline } => {
                let client = self.client.clone();
                let interval = self.config.poll_interval;
                let attempts = self.config.poll_attempts;
                self.spawn(await_generation(client, interval, attempts, baseline));
            }

            Effect::CheckAnswer {
                epoch,
                flashcard_id,
                answer,
            } => {
                let client = self.client.clone();
                self.spawn(async move {
                    let feedback = client
                        .check_answer(flashcard_id, &answer)
                        .await
                        .unwrap_or_else(|e| {
                            warn!(flashcard_id, "Answer check failed: {}", e);
                            Feedback::transport_error(e)
                        });
                    Action::AnswerChecked { epoch, feedback }
                });
            }

            Effect::ScheduleAdvance { epoch } => {
                let delay = self.config.auto_advance;
                self.spawn(async move {
                    tokio::time::sleep(delay).await;
                    Action::AutoAdvance { epoch }
                });
            }

            Effect::CancelPending => {
                self.session.cancel();
                self.session = CancellationToken::new();
            }
        }
    }

    fn spawn<F>(&self, task: F)
    where
        F: Future<Output = Action> + Send + 'static,
    {
        let token = self.session.child_token();
        let actions = self.actions.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    debug!("Effect cancelled");
                }
                action = task => {
                    // Receiver gone means the UI is shutting down
                    let _ = actions.send(action);
                }
            }
        });
    }
}

/// Re-fetch the list until it holds more than `baseline` cards.
///
/// Gives up after `attempts` fetches and reports whatever the last fetch
/// returned.
async fn await_generation(
    client: StudyClient,
    interval: Duration,
    attempts: u32,
    baseline: usize,
) -> Action {
    let mut last: Result<Vec<_>, String> = Err("No cards generated".to_string());

    for attempt in 1..=attempts.max(1) {
        tokio::time::sleep(interval).await;
        match client.fetch_flashcards().await {
            Ok(cards) if cards.len() > baseline => {
                debug!(attempt, count = cards.len(), "Generated cards arrived");
                return Action::CardsFetched(Ok(cards));
            }
            Ok(cards) => {
                debug!(attempt, count = cards.len(), "No new cards yet");
                last = Ok(cards);
            }
            Err(e) => {
                warn!(attempt, "Polling flashcards failed: {}", e);
                last = Err(e.to_string());
            }
        }
    }

    warn!("Gave up waiting for generated cards");
    Action::CardsFetched(last)
}
