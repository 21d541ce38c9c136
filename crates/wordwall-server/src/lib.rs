//! HTTP API for the wordwall live word display.
//!
//! This crate provides an Axum server that exposes:
//!
//! - **Long-poll endpoint** (`GET /api/words?since=`) that parks until the
//!   active words change or the timeout elapses
//! - **Submission endpoint** (`POST /api/word`) that replaces the oldest
//!   visible word
//! - **Config and status endpoints** for the display frontend and operators
//!
//! # Architecture
//!
//! Handlers are thin: every read and mutation goes through the shared
//! [`WordService`](wordwall_core::WordService), which serializes all state
//! changes and wakes parked polls. A parked poll is a suspended future, so
//! thousands of idle viewers cost no threads.

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod startup;
pub mod state;

// Re-export primary types for convenience.
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use startup::{StartupError, spawn_server};
pub use state::AppState;
