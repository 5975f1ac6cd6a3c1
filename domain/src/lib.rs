//! Domain layer for parley
//!
//! This crate contains the core business logic, entities, and value objects
//! of the conversational core. It has no dependencies on infrastructure or
//! presentation concerns.
//!
//! # Core Concepts
//!
//! ## Transcript
//!
//! The LLM provider is stateless; the [`Transcript`](session::Transcript)
//! is what gives a session the illusion of continuity. It is replayed to
//! the provider on every completion call.
//!
//! ## Credential
//!
//! A provider API key owned by one user. At rest it exists only encrypted;
//! the only outward-facing form is the masked preview from
//! [`credential::mask_credential`].

pub mod catalog;
pub mod core;
pub mod credential;
pub mod session;
pub mod util;

// Re-export commonly used types
pub use catalog::CatalogPolicy;
pub use core::model::{DEFAULT_MODEL, ModelId, ModelInfo};
pub use credential::{
    FIXED_MASK, NoCredentialAvailable, Resolved, StoredChoice, mask_credential, resolve,
};
pub use session::{Role, Transcript, Turn};
pub use util::truncate_str;
