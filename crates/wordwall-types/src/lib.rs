//! Shared wire types for the wordwall live word display.
//!
//! Every type that crosses the HTTP boundary lives here so the server and
//! the browser frontend agree on one shape. Types flow to `TypeScript` via
//! `ts-rs`; field names are camelCase on the wire to match what the
//! frontend already consumes.
//!
//! # Modules
//!
//! - [`words`] -- Visible word slots and the long-poll update payload
//! - [`api`] -- Request and response bodies for the REST endpoints

pub mod api;
pub mod words;

pub use api::{ConfigResponse, StatusResponse, SubmitWordRequest, SubmitWordResponse};
pub use words::{WordSlot, WordsUpdate};
