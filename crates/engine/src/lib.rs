//! An abstraction layer for external conversational engines.
//!
//! This crate establishes a unified protocol for the chat session core
//! to talk to an externally supplied conversational engine, so that the
//! core can be wired to different engines (or a scripted fake in tests)
//! without modifying its own codebase.
//!
//! Types in this crate don't define any behavior, instead they are the
//! constraints that the implementors should adhere to. An engine handle
//! owns its append-only turn history internally; callers only append to
//! it through the defined calls and never inspect it directly.

#![deny(missing_docs)]

mod engine;
mod error;
mod turn;

pub use engine::*;
pub use error::*;
pub use turn::*;
