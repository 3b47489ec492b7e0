// Progress events, callbacks and the interactive answer hand-off
//
// The engine reports everything it does through a `ProgressCallback`. Only
// `PromptUser` expects something back: the respondent's answer. When a UI
// drives the engine from another task, `InputHandoff` makes that exchange
// explicit: events go out over a channel and answers come back over a
// single-slot channel. A cancellation token releases a blocked wait.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin};
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;

/// Events emitted while an idea is processed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProgressEvent {
    Status,
    Vagueness,
    PhaseStart,
    Interviewer,
    GenericFlag,
    /// Simulated answer (batch mode only)
    UserSim,
    /// Request for a human answer (interactive mode only)
    PromptUser,
    Refactored,
}

impl ProgressEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            ProgressEvent::Status => "status",
            ProgressEvent::Vagueness => "vagueness",
            ProgressEvent::PhaseStart => "phase_start",
            ProgressEvent::Interviewer => "interviewer",
            ProgressEvent::GenericFlag => "generic_flag",
            ProgressEvent::UserSim => "user_sim",
            ProgressEvent::PromptUser => "prompt_user",
            ProgressEvent::Refactored => "refactored",
        }
    }
}

impl std::fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Receiver of progress events.
///
/// The return value is only read for `PromptUser`, where it is the answer.
#[async_trait]
pub trait ProgressCallback: Send + Sync {
    async fn on_event(&self, event: ProgressEvent, data: &str) -> Option<String>;
}

/// Adapts a synchronous closure into a `ProgressCallback`
pub struct FnProgress<F> {
    f: F,
}

impl<F> FnProgress<F>
where
    F: Fn(ProgressEvent, &str) -> Option<String> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<F> ProgressCallback for FnProgress<F>
where
    F: Fn(ProgressEvent, &str) -> Option<String> + Send + Sync,
{
    async fn on_event(&self, event: ProgressEvent, data: &str) -> Option<String> {
        (self.f)(event, data)
    }
}

/// One forwarded event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressMessage {
    pub event: ProgressEvent,
    pub data: String,
}

/// Engine side of the interactive hand-off
pub struct InputHandoff {
    events: mpsc::UnboundedSender<ProgressMessage>,
    answers: Mutex<mpsc::Receiver<String>>,
    cancel: CancellationToken,
}

/// Caller side of the interactive hand-off
pub struct InputHandle {
    events: mpsc::UnboundedReceiver<ProgressMessage>,
    answers: mpsc::Sender<String>,
    cancel: CancellationToken,
}

impl InputHandoff {
    /// Create a connected pair sharing `cancel`.
    ///
    /// Pass the same token to the loop so it stops advancing once cancelled.
    pub fn new(cancel: CancellationToken) -> (Self, InputHandle) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (answer_tx, answer_rx) = mpsc::channel(1);

        let handoff = Self {
            events: event_tx,
            answers: Mutex::new(answer_rx),
            cancel: cancel.clone(),
        };
        let handle = InputHandle {
            events: event_rx,
            answers: answer_tx,
            cancel,
        };
        (handoff, handle)
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }
}

#[async_trait]
impl ProgressCallback for InputHandoff {
    async fn on_event(&self, event: ProgressEvent, data: &str) -> Option<String> {
        // A caller that stopped listening still gets to answer prompts
        let _ = self.events.send(ProgressMessage {
            event,
            data: data.to_string(),
        });

        if event != ProgressEvent::PromptUser {
            return None;
        }

        let mut answers = self.answers.lock().await;
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                tracing::debug!("Answer wait cancelled");
                None
            }
            answer = answers.recv() => answer,
        }
    }
}

impl InputHandle {
    /// Next event from the engine; `None` once the engine has finished
    pub async fn next_event(&mut self) -> Option<ProgressMessage> {
        self.events.recv().await
    }

    /// Supply the answer to the pending (or next) prompt.
    ///
    /// Returns false when the engine is gone.
    pub async fn submit(&self, answer: impl Into<String>) -> bool {
        self.answers.send(answer.into()).await.is_ok()
    }

    /// Release any blocked wait and stop the run
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

/// Process-wide stdin reader; lines buffered past the current one belong to
/// later prompts and must not be dropped with a short-lived reader.
static STDIN: Lazy<Mutex<BufReader<Stdin>>> =
    Lazy::new(|| Mutex::new(BufReader::new(tokio::io::stdin())));

/// Print `prompt` and read one line from stdin, without the trailing newline.
pub async fn read_stdin_line(prompt: &str) -> std::io::Result<String> {
    {
        let mut stdout = std::io::stdout();
        write!(stdout, "{prompt}")?;
        stdout.flush()?;
    }

    let mut stdin = STDIN.lock().await;
    read_trimmed_line(&mut *stdin).await
}

/// Read one line from `reader`, without the trailing newline.
///
/// Returns an empty string at end of input.
pub async fn read_trimmed_line<R>(reader: &mut R) -> std::io::Result<String>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = String::new();
    reader.read_line(&mut line).await?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
