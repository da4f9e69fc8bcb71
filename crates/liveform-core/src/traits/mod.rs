//! Trait seams of the validation system
//!
//! Front-ends implement `InputSource` to feed the engine; everything else
//! is driven by the engine itself.

pub mod input_source;

pub use input_source::InputSource;
