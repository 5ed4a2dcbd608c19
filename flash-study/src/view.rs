//! Plain-text rendering of the study state

use std::fmt::Write;

use crate::state::{Mode, StudyState};

const RESET: &str = "\x1b[0m";
const BAR_WIDTH: usize = 20;

/// Render the whole screen. `color` enables ANSI escapes.
pub fn render(state: &StudyState, color: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== Flashcard Study ===");
    match state.mode {
        Mode::Upload => render_upload(&mut out, state),
        Mode::Study => render_study(&mut out, state, color),
    }
    out
}

fn render_upload(out: &mut String, state: &StudyState) {
    let _ = writeln!(out, "Upload a PDF to generate flashcards.");
    match &state.file {
        Some(path) => {
            let _ = writeln!(out, "File: {}", path.display());
        }
        None => {
            let _ = writeln!(out, "File: (none, use `file <path>`)");
        }
    }

    if state.uploading {
        let _ = writeln!(out, "Processing...");
    } else if state.can_submit_upload() {
        let _ = writeln!(out, "Ready: `upload` to generate flashcards");
    }

    if let Some(result) = &state.upload_result {
        let heading = if result.success { "Success!" } else { "Error" };
        let _ = writeln!(out, "{} {}", heading, result.message());
    }

    if state.awaiting_generation {
        let _ = writeln!(out, "Waiting for generated flashcards...");
    }

    if let Some(notice) = &state.notice {
        let _ = writeln!(out, "{}", notice);
    }

    if !state.cards.is_empty() {
        let _ = writeln!(
            out,
            "{} flashcards available. Ready to study: `start`",
            state.cards.len()
        );
    }
}

fn render_study(out: &mut String, state: &StudyState, color: bool) {
    let total = state.cards.len();
    let _ = writeln!(
        out,
        "Study mode | Card {} of {} | `back` returns to upload",
        state.cursor + 1,
        total
    );
    let _ = writeln!(out, "{}", progress_bar(state.cursor + 1, total));

    let Some(card) = state.current_card() else {
        return;
    };

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", card.title_text());
    let _ = writeln!(out, "{}", card.question_text());
    let _ = writeln!(out);

    if state.answer.is_empty() {
        let _ = writeln!(out, "Your answer: (type `answer <text>`)");
    } else {
        let _ = writeln!(out, "Your answer: {}", state.answer);
    }

    if state.checking {
        let _ = writeln!(out, "Checking...");
    }

    if let Some(feedback) = &state.feedback {
        let style = feedback.status.style();
        let (start, end) = if color {
            (style.color.ansi(), RESET)
        } else {
            ("", "")
        };
        let _ = writeln!(
            out,
            "{}{} {} ({}){}",
            start,
            style.icon,
            style.label,
            feedback.status.as_str(),
            end
        );
        if !feedback.feedback.is_empty() {
            let _ = writeln!(out, "{}", feedback.feedback);
        }
        if let Some(official) = feedback.official_answer() {
            let _ = writeln!(out, "Official answer: {}", official);
        }
    }

    if state.can_navigate() {
        let prev = if state.cursor == 0 { "-" } else { "`prev`" };
        let next = if state.is_last_card() {
            "Finished"
        } else {
            "`next`"
        };
        let _ = writeln!(out, "{} | {}", prev, next);
    }
}

/// `[#####---------------] 25%`
fn progress_bar(position: usize, total: usize) -> String {
    if total == 0 {
        return format!("[{}] 0%", "-".repeat(BAR_WIDTH));
    }
    let position = position.min(total);
    let filled = position * BAR_WIDTH / total;
    let percent = position * 100 / total;
    format!(
        "[{}{}] {}%",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled),
        percent
    )
}
