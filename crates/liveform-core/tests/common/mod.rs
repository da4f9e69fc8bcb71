//! Test doubles and common utilities for architecture contract tests
//!
//! This module provides minimal test doubles that verify architectural
//! constraints without implementing real functionality.

// Not every contract test uses every helper.
#![allow(dead_code)]

use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use liveform_core::Result;
use liveform_core::model::{FieldChange, FormSnapshot};
use liveform_core::traits::InputSource;
use tokio::sync::mpsc;
use tokio_stream::Stream;

/// A controlled input source that counts how often the engine touches it
pub struct TrackingInput {
    /// Sender for the test to push edits
    test_tx: mpsc::UnboundedSender<FieldChange>,
    /// Receiver for the engine's change stream
    engine_rx: Arc<std::sync::Mutex<Option<mpsc::UnboundedReceiver<FieldChange>>>>,
    /// Call counter for current()
    current_call_count: Arc<AtomicUsize>,
    /// Call counter for changes()
    changes_call_count: Arc<AtomicUsize>,
}

impl TrackingInput {
    pub fn new() -> (Self, mpsc::UnboundedSender<FieldChange>) {
        let (test_tx, engine_rx) = mpsc::unbounded_channel();

        let source = Self {
            test_tx: test_tx.clone(),
            engine_rx: Arc::new(std::sync::Mutex::new(Some(engine_rx))),
            current_call_count: Arc::new(AtomicUsize::new(0)),
            changes_call_count: Arc::new(AtomicUsize::new(0)),
        };

        (source, test_tx)
    }

    /// Shared view of the call counters, usable after the source is boxed
    pub fn counters(&self) -> (Arc<AtomicUsize>, Arc<AtomicUsize>) {
        (
            self.current_call_count.clone(),
            self.changes_call_count.clone(),
        )
    }

    /// Push an edit the way a front-end would (convenience for tests)
    pub fn emit(&self, change: FieldChange) {
        let _ = self.test_tx.send(change);
    }
}

#[async_trait::async_trait]
impl InputSource for TrackingInput {
    async fn current(&self) -> Result<FormSnapshot> {
        self.current_call_count.fetch_add(1, Ordering::SeqCst);
        Ok(FormSnapshot::default())
    }

    fn changes(&self) -> Pin<Box<dyn Stream<Item = FieldChange> + Send + 'static>> {
        self.changes_call_count.fetch_add(1, Ordering::SeqCst);

        // Take the receiver (only called once)
        let rx = self
            .engine_rx
            .lock()
            .unwrap()
            .take()
            .expect("changes() can only be called once");

        Box::pin(tokio_stream::wrappers::UnboundedReceiverStream::new(rx))
    }
}

/// An input source that never emits edits (for idle testing)
pub struct IdleInput;

#[async_trait::async_trait]
impl InputSource for IdleInput {
    async fn current(&self) -> Result<FormSnapshot> {
        Ok(FormSnapshot::default())
    }

    fn changes(&self) -> Pin<Box<dyn Stream<Item = FieldChange> + Send + 'static>> {
        Box::pin(tokio_stream::pending())
    }
}
