//! Integration tests for the study client
//!
//! Fake services are served by axum on ephemeral ports:
//! - flashcard API (`GET /flashcards`)
//! - agent service (`POST /upload-pdf`, `POST /check-answer`)
//!
//! The runtime is pumped until the state reaches the expected shape.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Multipart, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use flash_common::Flashcard;
use flash_study::{
    Action, ClientConfig, FeedbackStatus, Mode, RuntimeConfig, StudyClient, StudyError,
    StudyRuntime, StudyState,
};
use serde_json::{json, Value};
use tokio::sync::mpsc::UnboundedReceiver;

#[derive(Clone, Default)]
struct FakeServices {
    cards: Arc<Mutex<Vec<Flashcard>>>,
    lists: Arc<AtomicUsize>,
    uploads: Arc<AtomicUsize>,
    checks: Arc<AtomicUsize>,
    uploaded_names: Arc<Mutex<Vec<String>>>,
    /// Cards the upload handler adds to the list
    generated: Arc<Mutex<Vec<Flashcard>>>,
}

fn card(id: i64, answer: &str) -> Flashcard {
    Flashcard {
        id,
        title: Some("Topic".to_string()),
        question: Some(format!("Question {}?", id)),
        answer: Some(answer.to_string()),
    }
}

async fn list_cards(State(fake): State<FakeServices>) -> Json<Vec<Flashcard>> {
    fake.lists.fetch_add(1, Ordering::SeqCst);
    Json(fake.cards.lock().unwrap().clone())
}

async fn upload_pdf(State(fake): State<FakeServices>, mut multipart: Multipart) -> Json<Value> {
    fake.uploads.fetch_add(1, Ordering::SeqCst);
    while let Some(field) = multipart.next_field().await.unwrap() {
        if field.name() == Some("file") {
            let name = field.file_name().unwrap_or_default().to_string();
            let _ = field.bytes().await.unwrap();
            fake.uploaded_names.lock().unwrap().push(name);
        }
    }

    // Generation lands a little later, like the real service
    let generated = fake.generated.lock().unwrap().clone();
    let cards = fake.cards.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(60)).await;
        cards.lock().unwrap().extend(generated);
    });

    Json(json!({"success": true, "response": "Flashcards are being generated"}))
}

async fn check_answer(State(fake): State<FakeServices>, mut multipart: Multipart) -> Json<Value> {
    fake.checks.fetch_add(1, Ordering::SeqCst);
    let mut id = String::new();
    let mut answer = String::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        match field.name() {
            Some("flashcard_id") => id = field.text().await.unwrap(),
            Some("user_answer") => answer = field.text().await.unwrap(),
            _ => {}
        }
    }

    let expected = fake
        .cards
        .lock()
        .unwrap()
        .iter()
        .find(|c| c.id.to_string() == id)
        .and_then(|c| c.answer.clone())
        .unwrap_or_default();

    let status = if answer == expected { "correto" } else { "incorreto" };
    Json(json!({"status": status, "feedback": "graded", "official_answer": expected}))
}

async fn serve(fake: FakeServices) -> SocketAddr {
    let app = Router::new()
        .route("/flashcards", get(list_cards))
        .route("/upload-pdf", post(upload_pdf))
        .route("/check-answer", post(check_answer))
        .with_state(fake);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn client_for(addr: SocketAddr) -> StudyClient {
    let base = format!("http://{}", addr);
    StudyClient::new(ClientConfig {
        backend_url: base.clone(),
        agent_url: base,
        timeout: Duration::from_secs(5),
    })
    .unwrap()
}

fn fast_timers() -> RuntimeConfig {
    RuntimeConfig {
        auto_advance: Duration::from_millis(100),
        poll_interval: Duration::from_millis(20),
        poll_attempts: 50,
    }
}

/// Feed outcomes back into the reducer until `done` holds
async fn pump_until(
    state: &mut StudyState,
    runtime: &mut StudyRuntime,
    outcomes: &mut UnboundedReceiver<Action>,
    done: impl Fn(&StudyState) -> bool,
) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !done(&*state) {
            let action = outcomes.recv().await.expect("channel open");
            runtime.dispatch(state, action);
        }
    })
    .await
    .expect("state did not settle in time");
}

/// Deliver every outcome that arrives within `window`
async fn drain_for(
    state: &mut StudyState,
    runtime: &mut StudyRuntime,
    outcomes: &mut UnboundedReceiver<Action>,
    window: Duration,
) {
    let deadline = tokio::time::Instant::now() + window;
    while let Ok(Some(action)) = tokio::time::timeout_at(deadline, outcomes.recv()).await {
        runtime.dispatch(state, action);
    }
}

#[tokio::test]
async fn test_mount_loads_existing_cards_into_study() {
    let fake = FakeServices::default();
    fake.cards.lock().unwrap().extend([card(1, "a"), card(2, "b")]);
    let addr = serve(fake).await;

    let (mut runtime, mut outcomes) = StudyRuntime::new(client_for(addr), fast_timers());
    let mut state = StudyState::default();

    runtime.dispatch(&mut state, Action::Mounted);
    pump_until(&mut state, &mut runtime, &mut outcomes, |s| s.mode == Mode::Study).await;

    assert_eq!(state.cards.len(), 2);
    assert_eq!(state.cursor, 0);
}

#[tokio::test]
async fn test_upload_then_poll_until_generated_cards_appear() {
    let fake = FakeServices::default();
    fake.generated
        .lock()
        .unwrap()
        .extend([card(1, "a"), card(2, "b"), card(3, "c")]);
    let addr = serve(fake.clone()).await;

    let dir = tempfile::tempdir().unwrap();
    let pdf = dir.path().join("chapter1.pdf");
    std::fs::write(&pdf, b"%PDF-1.4 fake").unwrap();

    let (mut runtime, mut outcomes) = StudyRuntime::new(client_for(addr), fast_timers());
    let mut state = StudyState::default();

    // Mount fetch finds nothing
    runtime.dispatch(&mut state, Action::Mounted);
    drain_for(&mut state, &mut runtime, &mut outcomes, Duration::from_millis(50)).await;
    assert_eq!(state.mode, Mode::Upload);

    runtime.dispatch(&mut state, Action::SelectFile(Some(pdf)));
    runtime.dispatch(&mut state, Action::SubmitUpload);
    assert!(state.uploading);

    pump_until(&mut state, &mut runtime, &mut outcomes, |s| s.mode == Mode::Study).await;

    assert_eq!(fake.uploads.load(Ordering::SeqCst), 1);
    assert_eq!(*fake.uploaded_names.lock().unwrap(), vec!["chapter1.pdf".to_string()]);
    assert!(state.upload_result.as_ref().unwrap().success);
    assert!(!state.awaiting_generation);
    assert_eq!(state.cards.len(), 3);
}

#[tokio::test]
async fn test_generation_polling_gives_up_after_attempt_budget() {
    // Upload succeeds but the service never adds any cards
    let fake = FakeServices::default();
    let addr = serve(fake.clone()).await;

    let dir = tempfile::tempdir().unwrap();
    let pdf = dir.path().join("empty.pdf");
    std::fs::write(&pdf, b"%PDF-1.4 fake").unwrap();

    let timers = RuntimeConfig {
        poll_attempts: 2,
        ..fast_timers()
    };
    let (mut runtime, mut outcomes) = StudyRuntime::new(client_for(addr), timers);
    let mut state = StudyState::default();

    runtime.dispatch(&mut state, Action::Mounted);
    drain_for(&mut state, &mut runtime, &mut outcomes, Duration::from_millis(200)).await;
    let lists_before_upload = fake.lists.load(Ordering::SeqCst);
    assert_eq!(lists_before_upload, 1);

    runtime.dispatch(&mut state, Action::SelectFile(Some(pdf)));
    runtime.dispatch(&mut state, Action::SubmitUpload);
    pump_until(&mut state, &mut runtime, &mut outcomes, |s| {
        s.upload_result.is_some() && !s.uploading && !s.awaiting_generation
    })
    .await;

    // Nothing keeps polling once the budget is spent
    drain_for(&mut state, &mut runtime, &mut outcomes, Duration::from_millis(150)).await;

    assert_eq!(fake.lists.load(Ordering::SeqCst) - lists_before_upload, 2);
    assert!(state.upload_result.as_ref().unwrap().success);
    assert!(!state.awaiting_generation);
    assert_eq!(state.mode, Mode::Upload);
    assert!(state.cards.is_empty());
    assert!(state.notice.is_none());
}

#[tokio::test]
async fn test_submit_without_file_makes_no_request() {
    let fake = FakeServices::default();
    let addr = serve(fake.clone()).await;

    let (mut runtime, mut outcomes) = StudyRuntime::new(client_for(addr), fast_timers());
    let mut state = StudyState::default();

    runtime.dispatch(&mut state, Action::SubmitUpload);
    drain_for(&mut state, &mut runtime, &mut outcomes, Duration::from_millis(100)).await;

    assert_eq!(fake.uploads.load(Ordering::SeqCst), 0);
    assert!(!state.uploading);
    assert!(state.upload_result.is_none());
}

#[tokio::test]
async fn test_correct_answer_auto_advances_once() {
    let fake = FakeServices::default();
    fake.cards
        .lock()
        .unwrap()
        .extend([card(1, "a"), card(2, "b"), card(3, "c")]);
    let addr = serve(fake.clone()).await;

    let (mut runtime, mut outcomes) = StudyRuntime::new(client_for(addr), fast_timers());
    let mut state = StudyState::default();

    runtime.dispatch(&mut state, Action::Mounted);
    pump_until(&mut state, &mut runtime, &mut outcomes, |s| s.mode == Mode::Study).await;

    runtime.dispatch(&mut state, Action::EditAnswer("a".to_string()));
    runtime.dispatch(&mut state, Action::SubmitAnswer);
    pump_until(&mut state, &mut runtime, &mut outcomes, |s| s.answer_locked).await;
    assert_eq!(state.feedback.as_ref().unwrap().status, FeedbackStatus::Correct);
    assert_eq!(state.cursor, 0);

    pump_until(&mut state, &mut runtime, &mut outcomes, |s| s.cursor == 1).await;
    drain_for(&mut state, &mut runtime, &mut outcomes, Duration::from_millis(300)).await;

    assert_eq!(state.cursor, 1, "exactly one advance");
    assert!(state.feedback.is_none());
    assert_eq!(fake.checks.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_manual_navigation_beats_pending_advance() {
    let fake = FakeServices::default();
    fake.cards
        .lock()
        .unwrap()
        .extend([card(1, "a"), card(2, "b"), card(3, "c")]);
    let addr = serve(fake).await;

    let (mut runtime, mut outcomes) = StudyRuntime::new(client_for(addr), fast_timers());
    let mut state = StudyState::default();

    runtime.dispatch(&mut state, Action::Mounted);
    pump_until(&mut state, &mut runtime, &mut outcomes, |s| s.mode == Mode::Study).await;

    runtime.dispatch(&mut state, Action::EditAnswer("a".to_string()));
    runtime.dispatch(&mut state, Action::SubmitAnswer);
    pump_until(&mut state, &mut runtime, &mut outcomes, |s| s.answer_locked).await;

    // Move before the advance timer fires, then start typing on card 2
    runtime.dispatch(&mut state, Action::NextCard);
    runtime.dispatch(&mut state, Action::EditAnswer("draft".to_string()));
    drain_for(&mut state, &mut runtime, &mut outcomes, Duration::from_millis(300)).await;

    assert_eq!(state.cursor, 1);
    assert_eq!(state.answer, "draft");
    assert!(!state.answer_locked);
}

#[tokio::test]
async fn test_back_to_upload_cancels_pending_advance() {
    let fake = FakeServices::default();
    fake.cards.lock().unwrap().extend([card(1, "a"), card(2, "b")]);
    let addr = serve(fake).await;

    let (mut runtime, mut outcomes) = StudyRuntime::new(client_for(addr), fast_timers());
    let mut state = StudyState::default();

    runtime.dispatch(&mut state, Action::Mounted);
    pump_until(&mut state, &mut runtime, &mut outcomes, |s| s.mode == Mode::Study).await;
    runtime.dispatch(&mut state, Action::EditAnswer("a".to_string()));
    runtime.dispatch(&mut state, Action::SubmitAnswer);
    pump_until(&mut state, &mut runtime, &mut outcomes, |s| s.answer_locked).await;

    runtime.dispatch(&mut state, Action::BackToUpload);
    let reset = state.clone();

    // Anything still delivered must be a no-op for the reset state
    drain_for(&mut state, &mut runtime, &mut outcomes, Duration::from_millis(300)).await;

    assert_eq!(state, reset);
    assert_eq!(state.mode, Mode::Upload);
    assert!(state.cards.is_empty());
}

#[tokio::test]
async fn test_unreachable_services_become_messages() {
    // Bind then drop to get a port nobody listens on
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };

    let dir = tempfile::tempdir().unwrap();
    let pdf = dir.path().join("notes.pdf");
    std::fs::write(&pdf, b"%PDF").unwrap();

    let (mut runtime, mut outcomes) = StudyRuntime::new(client_for(addr), fast_timers());
    let mut state = StudyState::default();

    runtime.dispatch(&mut state, Action::Mounted);
    pump_until(&mut state, &mut runtime, &mut outcomes, |s| s.notice.is_some()).await;
    assert!(state.notice.as_deref().unwrap().starts_with("Failed to fetch flashcards"));

    runtime.dispatch(&mut state, Action::SelectFile(Some(pdf)));
    runtime.dispatch(&mut state, Action::SubmitUpload);
    pump_until(&mut state, &mut runtime, &mut outcomes, |s| !s.uploading).await;

    let result = state.upload_result.as_ref().unwrap();
    assert!(!result.success);
    assert!(result.message().starts_with("Connection error:"));

    // The user can retry by re-invoking the action
    runtime.dispatch(&mut state, Action::SubmitUpload);
    assert!(state.uploading);
}

#[tokio::test]
async fn test_client_reports_http_status() {
    let app = Router::new().route(
        "/flashcards",
        get(|| async {
            (
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Failed to fetch flashcards"})),
            )
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let err = client_for(addr).fetch_flashcards().await.unwrap_err();

    match err {
        StudyError::Status(code, body) => {
            assert_eq!(code, 500);
            assert!(body.contains("Failed to fetch flashcards"));
        }
        other => panic!("expected status error, got {:?}", other),
    }
}
