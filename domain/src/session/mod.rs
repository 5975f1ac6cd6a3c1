//! Session management domain module

pub mod entities;

pub use entities::{Role, Transcript, Turn};
