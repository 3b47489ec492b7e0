// Console rendering of progress events
//
// Batch mode prints compact one-line previews of each step. Interactive mode
// shows the interviewer's full text and leaves the answer prompt to the loop.

use async_trait::async_trait;
use crossterm::style::Stylize;

use crate::arise::progress::{ProgressCallback, ProgressEvent};

/// Which driver the console is rendering for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleMode {
    Batch,
    Interactive,
}

/// Prints progress events to stdout
pub struct ConsoleProgress {
    mode: ConsoleMode,
    color: bool,
}

impl ConsoleProgress {
    pub fn new(mode: ConsoleMode) -> Self {
        Self { mode, color: true }
    }

    pub fn batch() -> Self {
        Self::new(ConsoleMode::Batch)
    }

    pub fn interactive() -> Self {
        Self::new(ConsoleMode::Interactive)
    }

    /// Disable ANSI styling (piped output, tests)
    pub fn plain(mut self) -> Self {
        self.color = false;
        self
    }

    /// Text to print for an event, or `None` when the event is silent
    pub fn render(&self, event: ProgressEvent, data: &str) -> Option<String> {
        let line = match (self.mode, event) {
            (_, ProgressEvent::Status) => self.dim(&format!("  → {data}")),
            (_, ProgressEvent::Vagueness) => format!("    {data}"),
            (ConsoleMode::Batch, ProgressEvent::PhaseStart) => {
                format!("\n  → {}", self.accent(data))
            }
            (ConsoleMode::Interactive, ProgressEvent::PhaseStart) => {
                format!("\n  {}", self.accent(&format!("━━ {data} ━━")))
            }
            (ConsoleMode::Batch, ProgressEvent::Interviewer) => {
                format!("    Q: {}", preview(data, 120))
            }
            (ConsoleMode::Interactive, ProgressEvent::Interviewer) => format!("\n{data}\n"),
            (_, ProgressEvent::UserSim) => format!("    A: {}", preview(data, 120)),
            (_, ProgressEvent::GenericFlag) => {
                self.warn(&format!("    ⚠ Generic: {}", preview(data, 60)))
            }
            (_, ProgressEvent::Refactored) => format!("\n{data}\n"),
            (_, ProgressEvent::PromptUser) => return None,
        };
        Some(line)
    }

    fn dim(&self, text: &str) -> String {
        if self.color {
            text.dark_grey().to_string()
        } else {
            text.to_string()
        }
    }

    fn accent(&self, text: &str) -> String {
        if self.color {
            text.cyan().bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn warn(&self, text: &str) -> String {
        if self.color {
            text.yellow().to_string()
        } else {
            text.to_string()
        }
    }
}

#[async_trait]
impl ProgressCallback for ConsoleProgress {
    async fn on_event(&self, event: ProgressEvent, data: &str) -> Option<String> {
        if let Some(line) = self.render(event, data) {
            println!("{line}");
        }
        // The loop reads the answer itself so Ctrl-C can interrupt the wait
        None
    }
}

/// First `max` characters of `text`, with "..." appended when cut
pub fn preview(text: &str, max: usize) -> String {
    let flat = text.replace('\n', " ");
    if flat.chars().count() <= max {
        return flat;
    }
    let cut: String = flat.chars().take(max).collect();
    format!("{cut}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_truncates_on_chars() {
        assert_eq!(preview("short", 10), "short");
        assert_eq!(preview("ééééé", 3), "ééé...");
        assert_eq!(preview("a\nb", 10), "a b");
    }

    #[test]
    fn test_batch_rendering() {
        let console = ConsoleProgress::batch().plain();
        assert_eq!(
            console.render(ProgressEvent::Status, "Scoring").unwrap(),
            "  → Scoring"
        );
        assert_eq!(
            console.render(ProgressEvent::PhaseStart, "Phase 1").unwrap(),
            "\n  → Phase 1"
        );
        let long = "q".repeat(200);
        let line = console.render(ProgressEvent::Interviewer, &long).unwrap();
        assert_eq!(line, format!("    Q: {}...", "q".repeat(120)));
        assert!(console
            .render(ProgressEvent::GenericFlag, "What?")
            .unwrap()
            .starts_with("    ⚠ Generic: What?"));
    }

    #[test]
    fn test_interactive_rendering() {
        let console = ConsoleProgress::interactive().plain();
        assert_eq!(
            console.render(ProgressEvent::PhaseStart, "Phase 2").unwrap(),
            "\n  ━━ Phase 2 ━━"
        );
        assert_eq!(
            console.render(ProgressEvent::Interviewer, "Full text").unwrap(),
            "\nFull text\n"
        );
        assert!(console.render(ProgressEvent::PromptUser, "Phase 2").is_none());
    }

    #[tokio::test]
    async fn test_callback_never_answers() {
        let console = ConsoleProgress::interactive().plain();
        assert!(console
            .on_event(ProgressEvent::PromptUser, "Phase 1")
            .await
            .is_none());
    }
}
