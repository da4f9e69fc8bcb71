// # liveform-core
//
// Core library for the event-driven sign-up form validation system.
//
// ## Architecture Overview
//
// This library provides everything needed to run live form validation:
// - **InputSource**: Trait for capturing raw field edits as a stream
// - **FormEngine**: Debounced derivation pipeline from raw fields to outputs
// - **Rules**: Pure validation predicates and the status derivation
// - **ChannelInput**: In-process input source for embedding and tests
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Raw capture is separate from derivation
// 2. **Event-Driven**: Field edits arrive as an async stream, never polled
// 3. **Debounced**: Each derived check waits out a quiescence period
// 4. **Library-First**: The engine runs embedded without any front-end

pub mod config;
pub mod engine;
pub mod error;
pub mod input;
pub mod model;
pub mod rules;
pub mod traits;

// Re-export core types for convenience
pub use config::{DebounceConfig, EngineConfig, FormConfig, RuleConfig};
pub use engine::FormEngine;
pub use error::{Error, Result};
pub use input::{ChannelInput, InputHandle};
pub use model::{Field, FieldChange, FormEvent, FormOutputs, FormSnapshot, PasswordStatus};
pub use traits::InputSource;
