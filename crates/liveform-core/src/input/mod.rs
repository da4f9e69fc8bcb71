//! Input source implementations bundled with the core

pub mod channel;

pub use channel::{ChannelInput, InputHandle};
