//! # Events Module
//!
//! Event-driven progress reporting for UI layers.
//!
//! The core engine emits events through channels, allowing any consumer
//! (CLI, GUI, web) to subscribe and display progress without the engine
//! knowing about presentation.

mod channel;
mod types;

pub use channel::{null_sender, EventChannel, EventReceiver, EventSender};
pub use types::*;
