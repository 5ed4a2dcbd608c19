//! Line commands of the terminal front end

use std::path::PathBuf;

use crate::state::Action;

pub const HELP: &str = "\
Commands:
  file <path>     select a PDF (no path clears the selection)
  upload          send the selected PDF for flashcard generation
  start           start studying the loaded flashcards
  answer <text>   submit an answer for the current card
  next | prev     move between cards after an answer was checked
  back            return to the upload screen
  help            show this text
  quit            exit";

/// A parsed input line
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Actions(Vec<Action>),
    Help,
    Quit,
    Unknown(String),
}

pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word.to_ascii_lowercase().as_str() {
        "" => Command::Actions(vec![]),
        "file" if rest.is_empty() => Command::Actions(vec![Action::SelectFile(None)]),
        "file" => Command::Actions(vec![Action::SelectFile(Some(expand_path(rest)))]),
        "upload" => Command::Actions(vec![Action::SubmitUpload]),
        "start" => Command::Actions(vec![Action::StartStudy]),
        "answer" => Command::Actions(vec![
            Action::EditAnswer(rest.to_string()),
            Action::SubmitAnswer,
        ]),
        "next" | "n" => Command::Actions(vec![Action::NextCard]),
        "prev" | "p" => Command::Actions(vec![Action::PrevCard]),
        "back" => Command::Actions(vec![Action::BackToUpload]),
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        _ => Command::Unknown(word.to_string()),
    }
}

/// Expand a leading `~/` to the home directory
fn expand_path(raw: &str) -> PathBuf {
    match raw.strip_prefix("~/") {
        Some(rest) => std::env::var_os("HOME")
            .map(|home| PathBuf::from(home).join(rest))
            .unwrap_or_else(|| PathBuf::from(raw)),
        None => PathBuf::from(raw),
    }
}
