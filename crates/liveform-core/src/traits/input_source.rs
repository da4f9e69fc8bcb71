// # Input Source Trait
//
// Defines the interface for capturing raw field edits.
//
// ## Implementations
//
// - Channel-backed (in-process): `ChannelInput` in this crate
// - Stdin line protocol: `liveform-input-stdin` crate
// - Future: TUI key capture, HTTP form bridge
//
// ## Usage
//
// ```rust,ignore
// use liveform_core::InputSource;
// use tokio_stream::StreamExt;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let source = /* InputSource implementation */;
//
//     // Current raw values
//     let snapshot = source.current().await?;
//
//     // Stream of edits
//     let mut stream = source.changes();
//     while let Some(change) = stream.next().await {
//         println!("field edited: {:?}", change);
//     }
//
//     Ok(())
// }
// ```

use crate::model::{FieldChange, FormSnapshot};
use async_trait::async_trait;
use std::pin::Pin;
use tokio_stream::Stream;

/// Trait for input source implementations
///
/// This trait defines two core capabilities:
/// 1. **current()**: Fetch the current raw field values
/// 2. **changes()**: Stream of field edit events
///
/// Implementations must be thread-safe and usable across async tasks.
///
/// ## Responsibilities
///
/// Input sources capture *raw* edits only:
/// - Every edit must be forwarded immediately; debouncing, deduplication,
///   and validation are the engine's job.
/// - Each event carries the full new value of the edited field, not a diff.
/// - Implementations must not interpret or reject field values.
///
/// ## Task Spawning Rules
///
/// If an implementation spawns a reader task:
/// - The task must wait on its input (stdin, key events), not poll.
/// - The stream must stay open while the source is alive; a closed input
///   (EOF) parks the stream rather than terminating it, so the engine
///   keeps serving its timers.
/// - Dropping the stream must clean up without affecting `current()`.
#[async_trait]
pub trait InputSource: Send + Sync {
    /// Get the current raw field values
    ///
    /// Returns immediately with the latest snapshot, without waiting for
    /// any edits.
    async fn current(&self) -> Result<FormSnapshot, crate::Error>;

    /// Stream of field edits
    ///
    /// Yields a `FieldChange` for every edit, in the order the user made
    /// them. Must be cancellation-safe (dropping the stream cleans up
    /// resources).
    fn changes(&self) -> Pin<Box<dyn Stream<Item = FieldChange> + Send + 'static>>;
}
