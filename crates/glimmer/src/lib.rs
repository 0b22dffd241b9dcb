//! An out-of-the-box chat session with a typewriter reveal.
//!
//! The crate includes a terminal front-end for using it directly. And
//! you can also use it as a library to embed the session core into
//! your own host apps.

#![deny(missing_docs)]

mod session;

pub use session::{Session, SessionBuilder};

/// Re-exports of [`glimmer_core`] crate.
pub mod core {
    pub use glimmer_core::*;
}
