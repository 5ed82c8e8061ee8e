//! Gesture recognition for pointer, mouse and touch input.
//!
//! Recognizers live in a [`RecognizerRegistry`] owned by one window. Input
//! events go through [`RecognizerRegistry::dispatch`], which drives each
//! recognizer's state machine and arbitrates between recognizers that share
//! a target.

pub mod config;
pub mod base;
pub mod error;
pub mod event;
pub mod recognizer;
pub mod recognizers;
pub mod registry;
pub mod state;

pub use base::*;
pub use config::*;
pub use error::*;
pub use event::*;
pub use recognizer::*;
pub use recognizers::*;
pub use registry::*;
pub use state::*;
