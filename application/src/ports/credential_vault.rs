//! Credential vault port
//!
//! Symmetric encryption of user-supplied provider credentials at rest.
//! One master key, loaded once at process start; key rotation is not
//! supported, so ciphertext written under an old key always fails to
//! decrypt rather than returning garbled plaintext.

use thiserror::Error;

/// Errors that can occur during vault operations
#[derive(Error, Debug)]
pub enum VaultError {
    /// Master key absent or malformed. Fatal at startup, never per-request.
    #[error("vault configuration error: {0}")]
    Configuration(String),

    /// Ciphertext not produced by this vault, tampered with, or written
    /// under a different master key.
    #[error("credential unreadable")]
    Decryption,
}

/// Vault for provider credentials
///
/// The contract callers must honor: a `decrypt` result is used within the
/// same logical call and discarded, never stored. Everything that leaves
/// the trust boundary goes through `preview`.
pub trait CredentialVault: Send + Sync {
    /// Encrypt a plaintext credential into an opaque blob.
    fn encrypt(&self, plaintext: &str) -> Result<String, VaultError>;

    /// Decrypt a blob produced by [`encrypt`](Self::encrypt).
    fn decrypt(&self, ciphertext: &str) -> Result<String, VaultError>;

    /// Masked preview of an encrypted credential (first 4 + last 4 chars,
    /// or a fixed mask). Never fails: any decryption problem collapses to
    /// the fixed mask, so preview is always safe to expose.
    fn preview(&self, ciphertext: &str) -> String;
}
