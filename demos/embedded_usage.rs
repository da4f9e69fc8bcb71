//! Minimal embedding example for liveform-core
//!
//! This example demonstrates using liveform-core as a library in a custom
//! application. Edits are pushed through a `ChannelInput` handle and the
//! engine lifecycle is fully managed by the application.

use std::time::Duration;

use liveform_core::{ChannelInput, Field, FormConfig, FormEngine};
use tokio::sync::oneshot;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let (input, handle) = ChannelInput::new();
    let (engine, outputs, mut events) = FormEngine::new(Box::new(input), FormConfig::default())?;

    // Log every engine event as it happens
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            tracing::info!(?event, "engine event");
        }
    });

    let (stop_tx, stop_rx) = oneshot::channel();
    let engine_task = tokio::spawn(async move { engine.run_with_shutdown(Some(stop_rx)).await });

    // Simulate a user filling in the form
    handle.set(Field::Username, "joe").await?;
    handle.set(Field::Password, "ab$123").await?;
    handle.set(Field::PasswordAgain, "ab$123").await?;

    // Wait out the longest quiescence period so every check settles
    tokio::time::sleep(Duration::from_millis(1000)).await;

    println!("inline error: {:?}", *outputs.inline_error.borrow());
    println!("form valid:   {}", *outputs.is_valid.borrow());

    let _ = stop_tx.send(());
    engine_task.await??;

    Ok(())
}
