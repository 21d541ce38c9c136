//! Core of the wordwall live word display.
//!
//! A small, fixed number of words is visible at any time. Words change
//! either when a client submits one (it replaces the oldest visible word)
//! or when a visible word outlives the timeout (it is rotated for a random
//! predefined word). Any number of viewers long-poll for changes and are
//! woken together, exactly once, on each mutation batch.
//!
//! # Modules
//!
//! - [`buffer`] -- Fixed-capacity active word buffer and change token
//! - [`rotation`] -- Timeout-driven replacement policy
//! - [`notifier`] -- Registry of parked long-poll readers
//! - [`service`] -- [`WordService`], the single owner of all mutable state
//! - [`runner`] -- Background rotation loop
//! - [`source`] -- Predefined word list and its fallback
//! - [`config`] -- YAML + environment configuration
//! - [`clock`] -- Epoch-millisecond time source

pub mod buffer;
pub mod clock;
pub mod config;
pub mod error;
pub mod notifier;
pub mod rotation;
pub mod runner;
pub mod service;
pub mod source;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, WallConfig};
pub use error::WordError;
pub use rotation::ROTATION_TICK;
pub use service::WordService;
pub use source::{CandidatePool, SourceError};
