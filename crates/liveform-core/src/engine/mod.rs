//! Core form validation engine
//!
//! The FormEngine is responsible for:
//! - Consuming raw field edits from an InputSource
//! - Debouncing each derived check behind its quiescence period
//! - Deriving the password status and overall validity
//! - Publishing the two observable outputs and monitoring events
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐
//! │  InputSource │─── FieldChange ───┐
//! └──────────────┘                   │
//!                                    ▼
//!                           ┌──────────────┐
//!                           │  FormEngine  │
//!                           └──────────────┘
//!                                    │
//!         ┌──────────────────────────┼──────────────────────────┐
//!         │                          │                          │
//!         ▼                          ▼                          ▼
//! ┌──────────────┐          ┌──────────────┐          ┌──────────────┐
//! │ inline_error │          │   is_valid   │          │    Events    │
//! │   (watch)    │          │   (watch)    │          │   (notify)   │
//! └──────────────┘          └──────────────┘          └──────────────┘
//! ```
//!
//! ## Derivation Flow
//!
//! 1. A field edit arrives and re-arms the timers of the checks it feeds
//! 2. A timer fires after its quiescence period with no newer edit
//! 3. Deduplicated checks skip values they already evaluated
//! 4. Once every password check has run, the status is derived
//!    (empty > weak > mismatch > valid, first match wins)
//! 5. Status and username check combine into the validity output
//!
//! The first derived status is withheld from the inline error output so
//! an untouched form shows no error.

mod debounce;

use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tokio_stream::StreamExt;
use tracing::{debug, info, trace, warn};

use crate::config::{DebounceConfig, FormConfig};
use crate::model::{
    CheckKind, Field, FieldChange, FormEvent, FormOutputs, FormSnapshot, PasswordStatus,
};
use crate::rules;
use crate::traits::InputSource;
use crate::Result;

use debounce::Debounce;

/// One debounced check: its timer, deduplication state, and last result
struct Check {
    timer: Debounce,
    /// Whether a repeat of the last evaluated input is skipped
    dedup: bool,
    last_input: Option<String>,
    /// Last computed result; `None` until the check has fired once
    latest: Option<bool>,
}

impl Check {
    fn new(delay: Duration, dedup: bool) -> Self {
        Self {
            timer: Debounce::new(delay),
            dedup,
            last_input: None,
            latest: None,
        }
    }

    /// Record `input` as evaluated; true when a deduplicated check
    /// already saw exactly this value and must not re-emit.
    fn suppressed(&mut self, input: &str) -> bool {
        if !self.dedup {
            return false;
        }
        if self.last_input.as_deref() == Some(input) {
            return true;
        }
        self.last_input = Some(input.to_string());
        false
    }
}

/// Mutable pipeline state for one engine run
struct Pipeline {
    snapshot: FormSnapshot,
    username: Check,
    strength: Check,
    empty: Check,
    equal: Check,
    status: Option<PasswordStatus>,
    first_status_seen: bool,
}

impl Pipeline {
    fn new(debounce: &DebounceConfig, snapshot: FormSnapshot) -> Self {
        Self {
            snapshot,
            username: Check::new(Duration::from_millis(debounce.username_ms), true),
            strength: Check::new(Duration::from_millis(debounce.strength_ms), true),
            empty: Check::new(Duration::from_millis(debounce.empty_ms), true),
            equal: Check::new(Duration::from_millis(debounce.equal_ms), false),
            status: None,
            first_status_seen: false,
        }
    }

    /// Apply a raw edit: update the snapshot and re-arm the timers of
    /// every check fed by the edited field.
    fn apply(&mut self, change: FieldChange) {
        self.snapshot.set(change.field, change.value);
        match change.field {
            Field::Username => {
                self.username.timer.arm();
            }
            Field::Password => {
                self.strength.timer.arm();
                self.empty.timer.arm();
                self.equal.timer.arm();
            }
            Field::PasswordAgain => {
                self.equal.timer.arm();
            }
        }
    }

    /// Arm every timer so the seeded snapshot gets an initial evaluation
    fn arm_all(&mut self) {
        self.username.timer.arm();
        self.strength.timer.arm();
        self.empty.timer.arm();
        self.equal.timer.arm();
    }
}

/// Core form validation engine
///
/// The engine orchestrates the raw edit → debounced check → derived
/// output flow. It runs until shutdown and holds no state across runs.
///
/// ## Lifecycle
///
/// 1. Create with [`FormEngine::new()`]
/// 2. Start with [`FormEngine::run()`]
/// 3. Engine runs until shutdown signal received
///
/// ## Threading
///
/// All derivation happens on the single engine task; the only writers
/// are the input source (raw capture) and the engine itself (outputs),
/// so no locking is involved in the pipeline.
pub struct FormEngine {
    /// Source of raw field edits
    input: Box<dyn InputSource>,

    /// Validation thresholds and quiescence periods
    config: FormConfig,

    /// Event sender for external monitoring
    event_tx: mpsc::Sender<FormEvent>,

    /// Inline error output
    error_tx: watch::Sender<String>,

    /// Overall validity output
    valid_tx: watch::Sender<bool>,
}

impl FormEngine {
    /// Create a new form engine
    ///
    /// # Parameters
    ///
    /// - `input`: input source implementation
    /// - `config`: validation configuration
    ///
    /// # Returns
    ///
    /// A tuple of (engine, outputs, event_receiver) where `outputs` holds
    /// the two observable bindings and `event_receiver` yields engine
    /// events for monitoring.
    pub fn new(
        input: Box<dyn InputSource>,
        config: FormConfig,
    ) -> Result<(Self, FormOutputs, mpsc::Receiver<FormEvent>)> {
        config.validate()?;

        let (event_tx, event_rx) = mpsc::channel(config.engine.event_channel_capacity);
        let (error_tx, error_rx) = watch::channel(String::new());
        let (valid_tx, valid_rx) = watch::channel(false);

        let outputs = FormOutputs {
            inline_error: error_rx,
            is_valid: valid_rx,
        };

        let engine = Self {
            input,
            config,
            event_tx,
            error_tx,
            valid_tx,
        };

        Ok((engine, outputs, event_rx))
    }

    /// Run the engine
    ///
    /// Consumes field edits and serves debounce timers until a shutdown
    /// signal (ctrl-c) is received.
    pub async fn run(&self) -> Result<()> {
        self.run_internal(None).await
    }

    /// Test-only helper to run the engine with a controlled shutdown signal
    ///
    /// Production code should use `run()`, which manages shutdown via
    /// ctrl-c rather than a programmatic channel.
    pub async fn run_with_shutdown(
        &self,
        shutdown_rx: Option<oneshot::Receiver<()>>,
    ) -> Result<()> {
        self.run_internal(shutdown_rx).await
    }

    async fn run_internal(&self, mut shutdown_rx: Option<oneshot::Receiver<()>>) -> Result<()> {
        // Seed the pipeline with the current raw values
        let snapshot = self.input.current().await?;
        let mut changes = self.input.changes();

        let mut state = Pipeline::new(&self.config.debounce, snapshot);
        // Initial settle: every check evaluates the seeded value once,
        // so an untouched form converges to Empty / not valid.
        state.arm_all();

        self.emit_event(FormEvent::Started);
        info!("Form engine started");

        loop {
            tokio::select! {
                Some(change) = changes.next() => {
                    trace!(field = %change.field, "field edited");
                    state.apply(change);
                }

                _ = state.username.timer.elapsed(), if state.username.timer.is_armed() => {
                    self.evaluate_username(&mut state);
                }

                _ = state.strength.timer.elapsed(), if state.strength.timer.is_armed() => {
                    self.evaluate_strength(&mut state);
                }

                _ = state.empty.timer.elapsed(), if state.empty.timer.is_armed() => {
                    self.evaluate_empty(&mut state);
                }

                _ = state.equal.timer.elapsed(), if state.equal.timer.is_armed() => {
                    self.evaluate_equal(&mut state);
                }

                _ = wait_shutdown(&mut shutdown_rx) => {
                    info!("Shutdown signal received");
                    self.emit_event(FormEvent::Stopped {
                        reason: "Shutdown signal".to_string(),
                    });
                    break;
                }
            }
        }

        Ok(())
    }

    /// Username length check (debounced, deduplicated)
    fn evaluate_username(&self, state: &mut Pipeline) {
        state.username.timer.disarm();
        let value = state.snapshot.username.clone();
        if state.username.suppressed(&value) {
            trace!("username unchanged since last evaluation, skipping");
            return;
        }

        let passed = rules::username_valid(&value, self.config.rules.min_username_chars);
        state.username.latest = Some(passed);
        debug!(passed, "username check evaluated");
        self.emit_event(FormEvent::CheckEvaluated {
            check: CheckKind::Username,
            passed,
        });

        self.publish_validity(state);
    }

    /// Password strength check (debounced, deduplicated)
    fn evaluate_strength(&self, state: &mut Pipeline) {
        state.strength.timer.disarm();
        let value = state.snapshot.password.clone();
        if state.strength.suppressed(&value) {
            trace!("password unchanged since last strength evaluation, skipping");
            return;
        }

        let passed = rules::password_strong(
            &value,
            self.config.rules.min_password_chars,
            &self.config.rules.required_symbols,
        );
        state.strength.latest = Some(passed);
        debug!(passed, "strength check evaluated");
        self.emit_event(FormEvent::CheckEvaluated {
            check: CheckKind::Strength,
            passed,
        });

        self.derive_status(state);
    }

    /// Password emptiness check (debounced, deduplicated)
    fn evaluate_empty(&self, state: &mut Pipeline) {
        state.empty.timer.disarm();
        let value = state.snapshot.password.clone();
        if state.empty.suppressed(&value) {
            trace!("password unchanged since last emptiness evaluation, skipping");
            return;
        }

        let passed = rules::password_empty(&value);
        state.empty.latest = Some(passed);
        debug!(passed, "emptiness check evaluated");
        self.emit_event(FormEvent::CheckEvaluated {
            check: CheckKind::Empty,
            passed,
        });

        self.derive_status(state);
    }

    /// Passwords-equal check (debounced, never deduplicated)
    ///
    /// Recomputed for every firing, even an already-seen pair: the check
    /// combines the latest values of both password fields.
    fn evaluate_equal(&self, state: &mut Pipeline) {
        state.equal.timer.disarm();

        let passed =
            rules::passwords_equal(&state.snapshot.password, &state.snapshot.password_again);
        state.equal.latest = Some(passed);
        debug!(passed, "equality check evaluated");
        self.emit_event(FormEvent::CheckEvaluated {
            check: CheckKind::Equal,
            passed,
        });

        self.derive_status(state);
    }

    /// Derive the password status from the three password checks
    fn derive_status(&self, state: &mut Pipeline) {
        // Combine-latest gating: every password check must have run once
        let (Some(empty), Some(strong), Some(equal)) =
            (state.empty.latest, state.strength.latest, state.equal.latest)
        else {
            return;
        };

        let status = rules::derive_status(empty, strong, equal);
        state.status = Some(status);
        self.emit_event(FormEvent::StatusChanged { status });

        if state.first_status_seen {
            let _ = self.error_tx.send(status.message().to_string());
        } else {
            // The very first derived status never surfaces an error; an
            // untouched form shows nothing until the user interacts.
            state.first_status_seen = true;
            debug!(?status, "first derived status, inline error withheld");
        }

        self.publish_validity(state);
    }

    /// Recompute overall validity from the status and the username check
    fn publish_validity(&self, state: &Pipeline) {
        let (Some(status), Some(username_ok)) = (state.status, state.username.latest) else {
            return;
        };

        let is_valid = status == PasswordStatus::Valid && username_ok;
        let _ = self.valid_tx.send(is_valid);
        self.emit_event(FormEvent::ValidityChanged { is_valid });
    }

    /// Emit a monitoring event
    fn emit_event(&self, event: FormEvent) {
        // Send event, logging a warning if the channel is full. Dropping
        // monitoring events must never stall validation.
        if self.event_tx.try_send(event).is_err() {
            warn!(
                "Event channel full, dropping event. Consider increasing event_channel_capacity."
            );
        }
    }
}

/// Wait for the configured shutdown trigger
///
/// Tests pass a oneshot receiver; production waits for ctrl-c.
async fn wait_shutdown(shutdown_rx: &mut Option<oneshot::Receiver<()>>) {
    match shutdown_rx {
        Some(rx) => {
            let _ = rx.await;
        }
        None => {
            let _ = tokio::signal::ctrl_c().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{ChannelInput, InputHandle};
    use tokio::task::JoinHandle;
    use tokio_test::assert_ok;

    struct Harness {
        handle: InputHandle,
        outputs: FormOutputs,
        events: mpsc::Receiver<FormEvent>,
        stop_tx: oneshot::Sender<()>,
        task: JoinHandle<Result<()>>,
    }

    impl Harness {
        fn start() -> Self {
            let (input, handle) = ChannelInput::new();
            let (engine, outputs, events) =
                FormEngine::new(Box::new(input), FormConfig::default()).unwrap();
            let (stop_tx, stop_rx) = oneshot::channel();
            let task = tokio::spawn(async move { engine.run_with_shutdown(Some(stop_rx)).await });
            Self {
                handle,
                outputs,
                events,
                stop_tx,
                task,
            }
        }

        fn drain_events(&mut self) -> Vec<FormEvent> {
            let mut out = Vec::new();
            while let Ok(event) = self.events.try_recv() {
                out.push(event);
            }
            out
        }

        async fn stop(self) {
            let _ = self.stop_tx.send(());
            assert_ok!(self.task.await.unwrap());
        }
    }

    async fn settle() {
        // Longest quiescence period is 800 ms; paused time auto-advances
        tokio::time::sleep(Duration::from_millis(900)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_untouched_form_settles_silently() {
        let mut harness = Harness::start();
        settle().await;

        // The initial status is Empty, but no error is shown and the
        // form is not submittable
        assert_eq!(*harness.outputs.inline_error.borrow(), "");
        assert!(!*harness.outputs.is_valid.borrow());

        let events = harness.drain_events();
        assert!(events.contains(&FormEvent::StatusChanged {
            status: PasswordStatus::Empty
        }));
        assert!(events.contains(&FormEvent::ValidityChanged { is_valid: false }));

        harness.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounce_collapses_rapid_edits() {
        let mut harness = Harness::start();
        // Let the engine arm its initial timers before typing
        tokio::time::sleep(Duration::from_millis(1)).await;

        // Three keystrokes inside the 200 ms strength window
        for typed in ["a", "ab$", "ab$123"] {
            harness.handle.set(Field::Password, typed).await.unwrap();
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        settle().await;

        let strength_evals: Vec<bool> = harness
            .drain_events()
            .into_iter()
            .filter_map(|event| match event {
                FormEvent::CheckEvaluated {
                    check: CheckKind::Strength,
                    passed,
                } => Some(passed),
                _ => None,
            })
            .collect();

        // Exactly one evaluation, of the final value
        assert_eq!(strength_evals, vec![true]);

        harness.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_dedup_skips_repeat_value_but_equal_refires() {
        let mut harness = Harness::start();
        tokio::time::sleep(Duration::from_millis(1)).await;

        harness.handle.set(Field::Password, "ab$123").await.unwrap();
        harness
            .handle
            .set(Field::PasswordAgain, "ab$123")
            .await
            .unwrap();
        settle().await;
        harness.drain_events();

        // Re-enter the identical password
        harness.handle.set(Field::Password, "ab$123").await.unwrap();
        settle().await;

        let events = harness.drain_events();
        let evaluated: Vec<CheckKind> = events
            .iter()
            .filter_map(|event| match event {
                FormEvent::CheckEvaluated { check, .. } => Some(*check),
                _ => None,
            })
            .collect();

        // Strength and emptiness are deduplicated; equality recomputes
        // for the already-seen pair and re-derives the status
        assert_eq!(evaluated, vec![CheckKind::Equal]);
        assert!(events.contains(&FormEvent::StatusChanged {
            status: PasswordStatus::Valid
        }));

        harness.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_validity_requires_username_and_status() {
        let mut harness = Harness::start();
        tokio::time::sleep(Duration::from_millis(1)).await;

        // Valid password pair, username too short
        harness.handle.set(Field::Username, "jo").await.unwrap();
        harness.handle.set(Field::Password, "ab$123").await.unwrap();
        harness
            .handle
            .set(Field::PasswordAgain, "ab$123")
            .await
            .unwrap();
        settle().await;

        assert_eq!(*harness.outputs.inline_error.borrow(), "");
        assert!(!*harness.outputs.is_valid.borrow());

        // Fixing the username flips the form valid
        harness.handle.set(Field::Username, "joe").await.unwrap();
        settle().await;
        assert!(*harness.outputs.is_valid.borrow());

        harness.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_config_rejected() {
        let (input, _handle) = ChannelInput::new();
        let mut config = FormConfig::default();
        config.rules.required_symbols.clear();

        assert!(FormEngine::new(Box::new(input), config).is_err());
    }
}
