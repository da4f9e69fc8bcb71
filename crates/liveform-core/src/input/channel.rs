// # Channel Input Source
//
// In-process implementation of InputSource.
//
// ## Purpose
//
// Lets an embedding application (or a test) push field edits directly
// into the engine through an `InputHandle`, with no I/O involved.
//
// ## When to Use
//
// - Testing the engine with scripted edit sequences
// - Embedding the engine behind a front-end that already has its own
//   event delivery (GUI toolkit, web bridge)

use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::{RwLock, mpsc};
use tokio_stream::Stream;
use tokio_stream::wrappers::UnboundedReceiverStream;

use crate::model::{Field, FieldChange, FormSnapshot};
use crate::traits::InputSource;
use crate::{Error, Result};

/// Channel-backed input source
///
/// Created together with an [`InputHandle`]; edits pushed through the
/// handle show up on the `changes()` stream and in `current()`.
///
/// # Example
///
/// ```rust,no_run
/// use liveform_core::{ChannelInput, Field, InputSource};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let (input, handle) = ChannelInput::new();
///
///     handle.set(Field::Username, "joe").await?;
///
///     let snapshot = input.current().await?;
///     assert_eq!(snapshot.username, "joe");
///
///     Ok(())
/// }
/// ```
pub struct ChannelInput {
    /// Shared raw field values
    snapshot: Arc<RwLock<FormSnapshot>>,

    /// Receiver handed out by the first `changes()` call
    rx: std::sync::Mutex<Option<mpsc::UnboundedReceiver<FieldChange>>>,
}

impl ChannelInput {
    /// Create a new channel input with empty initial fields
    pub fn new() -> (Self, InputHandle) {
        Self::with_initial(FormSnapshot::default())
    }

    /// Create a channel input seeded with initial field values
    pub fn with_initial(initial: FormSnapshot) -> (Self, InputHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let snapshot = Arc::new(RwLock::new(initial));

        let input = Self {
            snapshot: snapshot.clone(),
            rx: std::sync::Mutex::new(Some(rx)),
        };
        let handle = InputHandle { snapshot, tx };

        (input, handle)
    }
}

#[async_trait::async_trait]
impl InputSource for ChannelInput {
    async fn current(&self) -> Result<FormSnapshot> {
        Ok(self.snapshot.read().await.clone())
    }

    fn changes(&self) -> Pin<Box<dyn Stream<Item = FieldChange> + Send + 'static>> {
        let taken = self.rx.lock().unwrap().take();
        match taken {
            Some(rx) => Box::pin(UnboundedReceiverStream::new(rx)),
            // Second subscription: stay pending so the engine keeps
            // serving its timers instead of busy-looping on a closed stream.
            None => Box::pin(tokio_stream::pending()),
        }
    }
}

/// Write side of a [`ChannelInput`]
///
/// Cheap to clone; every clone feeds the same input source.
#[derive(Clone)]
pub struct InputHandle {
    snapshot: Arc<RwLock<FormSnapshot>>,
    tx: mpsc::UnboundedSender<FieldChange>,
}

impl InputHandle {
    /// Replace the value of a field
    ///
    /// Updates the shared snapshot and forwards the edit to the engine.
    pub async fn set(&self, field: Field, value: impl Into<String>) -> Result<()> {
        let value = value.into();
        self.snapshot.write().await.set(field, value.clone());
        self.tx
            .send(FieldChange::new(field, value))
            .map_err(|_| Error::channel("input stream receiver dropped"))
    }

    /// Clear a field
    pub async fn clear(&self, field: Field) -> Result<()> {
        self.set(field, "").await
    }
}
