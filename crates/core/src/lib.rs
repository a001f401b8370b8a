//! Core chat logic: conversation state, session loop, configurations.

#![deny(missing_docs)]
#![deny(clippy::missing_safety_doc)]

#[macro_use]
extern crate tracing;

pub mod config;
pub mod conversation;
mod model_client;
mod session;

pub use session::{ChatSession, SessionError};
