//! Core logic including the conversation adapter and the submit/reveal
//! interaction loop.

#![deny(missing_docs)]
#![deny(clippy::missing_safety_doc)]

#[macro_use]
extern crate tracing;

mod adapter;
mod controller;

pub use adapter::ConversationAdapter;
pub use controller::{Controller, ControllerBuilder, InteractionState};
