// # Stdin Input Source
//
// This crate provides a stdin-based input source for the liveform system.
//
// ## Purpose
//
// This is a **terminal front-end** input boundary for:
// - Interactive use of the `liveform` binary
// - Scripted sessions (piping an edit script into the binary)
// - Debugging the engine without a GUI
//
// ## Line Protocol
//
// Each stdin line is one field edit carrying the full new value:
//
// ```text
// user <text>     set the username
// pass <text>     set the password
// again <text>    set the repeated password
// clear <field>   reset a field (user, pass or again)
// ```
//
// Unparseable lines are logged at warn and skipped; raw capture never
// fails the session.

use std::pin::Pin;
use std::sync::Arc;

use tokio::io::AsyncBufReadExt;
use tokio::sync::{RwLock, mpsc};
use tokio_stream::Stream;
use tokio_stream::wrappers::UnboundedReceiverStream;

use liveform_core::model::{Field, FieldChange, FormSnapshot};
use liveform_core::traits::InputSource;
use liveform_core::Result;

/// Stdin-based input source
///
/// Spawns a reader task on the first `changes()` call. The task parses
/// each line into a `FieldChange`, keeps the shared snapshot current,
/// and parks on EOF so the engine keeps serving its timers.
pub struct StdinInput {
    /// Current raw field values
    snapshot: Arc<RwLock<FormSnapshot>>,

    /// Keeps the change stream open across stdin EOF
    tx: mpsc::UnboundedSender<FieldChange>,

    /// Receiver handed to the first `changes()` caller
    rx: std::sync::Mutex<Option<mpsc::UnboundedReceiver<FieldChange>>>,
}

impl StdinInput {
    /// Create a new stdin input source
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            snapshot: Arc::new(RwLock::new(FormSnapshot::default())),
            tx,
            rx: std::sync::Mutex::new(Some(rx)),
        }
    }
}

impl Default for StdinInput {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl InputSource for StdinInput {
    async fn current(&self) -> Result<FormSnapshot> {
        Ok(self.snapshot.read().await.clone())
    }

    fn changes(&self) -> Pin<Box<dyn Stream<Item = FieldChange> + Send + 'static>> {
        let taken = self.rx.lock().unwrap().take();
        let Some(rx) = taken else {
            // Second subscription: stay pending rather than ending the
            // stream under the engine.
            return Box::pin(tokio_stream::pending());
        };

        let tx = self.tx.clone();
        let snapshot = self.snapshot.clone();

        tokio::spawn(async move {
            tracing::info!("Reading field edits from stdin (user/pass/again/clear)");

            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            let mut lines = stdin.lines();

            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        let Some(change) = parse_line(&line) else {
                            tracing::warn!("Unparseable input line, skipping: {:?}", line);
                            continue;
                        };

                        snapshot
                            .write()
                            .await
                            .set(change.field, change.value.clone());

                        if tx.send(change).is_err() {
                            tracing::error!("Change stream receiver dropped, stopping reader");
                            break;
                        }
                    }
                    Ok(None) => {
                        tracing::info!("Stdin closed, no further edits");
                        break;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to read stdin line: {}", e);
                        break;
                    }
                }
            }
        });

        Box::pin(UnboundedReceiverStream::new(rx))
    }
}

/// Parse one protocol line into a field edit
///
/// The value is everything after the first space, taken verbatim —
/// passwords may contain further spaces.
fn parse_line(line: &str) -> Option<FieldChange> {
    let trimmed = line.trim_end_matches(['\r', '\n']);

    let (command, rest) = match trimmed.split_once(' ') {
        Some((command, rest)) => (command, rest),
        None => (trimmed, ""),
    };

    match command {
        "user" => Some(FieldChange::new(Field::Username, rest)),
        "pass" => Some(FieldChange::new(Field::Password, rest)),
        "again" => Some(FieldChange::new(Field::PasswordAgain, rest)),
        "clear" => {
            let field = match rest.trim() {
                "user" => Field::Username,
                "pass" => Field::Password,
                "again" => Field::PasswordAgain,
                _ => return None,
            };
            Some(FieldChange::new(field, ""))
        }
        _ => None,
    }
}
