//! Core domain concepts

pub mod model;

pub use model::{DEFAULT_CONTEXT_WINDOW, DEFAULT_MODEL, ModelId, ModelInfo};
