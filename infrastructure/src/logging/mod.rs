//! Structured logging adapters

pub mod jsonl_chat_log;

pub use jsonl_chat_log::JsonlChatLog;
