//! Provider gateway adapters

pub mod groq;

pub use groq::GroqGateway;
