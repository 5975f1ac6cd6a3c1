//! AES-256-GCM credential vault.
//!
//! Implements the [`CredentialVault`] port with one symmetric master key
//! loaded at process start. Each blob is `base64(nonce || ciphertext)` with
//! a fresh random 96-bit nonce, so encrypting the same key twice yields
//! different blobs. There is no key rotation: a blob written under a
//! different master key fails authentication and decrypts to nothing,
//! never to garbled plaintext.

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use parley_application::ports::credential_vault::{CredentialVault, VaultError};
use parley_domain::{FIXED_MASK, mask_credential};

const NONCE_LEN: usize = 12;
const MASTER_KEY_LEN: usize = 32;

/// Credential vault backed by AES-256-GCM.
pub struct AesGcmVault {
    cipher: Aes256Gcm,
}

impl AesGcmVault {
    /// Build a vault from a base64-encoded 32-byte master key.
    ///
    /// An absent or malformed key is a configuration error and should
    /// abort startup rather than surface per-request.
    pub fn from_base64_key(master_key: &str) -> Result<Self, VaultError> {
        let bytes = BASE64.decode(master_key.trim()).map_err(|e| {
            VaultError::Configuration(format!("master key is not valid base64: {}", e))
        })?;
        if bytes.len() != MASTER_KEY_LEN {
            return Err(VaultError::Configuration(format!(
                "master key must be {} bytes, got {}",
                MASTER_KEY_LEN,
                bytes.len()
            )));
        }
        let key = Key::<Aes256Gcm>::from_slice(&bytes);
        Ok(Self {
            cipher: Aes256Gcm::new(key),
        })
    }

    /// Generate a fresh master key in the accepted base64 form.
    ///
    /// Operator convenience for initial deployment.
    pub fn generate_master_key() -> String {
        let key = Aes256Gcm::generate_key(&mut OsRng);
        BASE64.encode(key)
    }
}

// The cipher holds key material; keep it out of Debug output.
impl std::fmt::Debug for AesGcmVault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AesGcmVault").finish_non_exhaustive()
    }
}

impl CredentialVault for AesGcmVault {
    fn encrypt(&self, plaintext: &str) -> Result<String, VaultError> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|_| VaultError::Decryption)?;

        let mut blob = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        blob.extend_from_slice(&nonce);
        blob.extend_from_slice(&ciphertext);
        Ok(BASE64.encode(blob))
    }

    fn decrypt(&self, ciphertext: &str) -> Result<String, VaultError> {
        let blob = BASE64
            .decode(ciphertext.trim())
            .map_err(|_| VaultError::Decryption)?;
        if blob.len() <= NONCE_LEN {
            return Err(VaultError::Decryption);
        }
        let (nonce, payload) = blob.split_at(NONCE_LEN);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce), payload)
            .map_err(|_| VaultError::Decryption)?;
        String::from_utf8(plaintext).map_err(|_| VaultError::Decryption)
    }

    fn preview(&self, ciphertext: &str) -> String {
        match self.decrypt(ciphertext) {
            Ok(plaintext) => mask_credential(&plaintext),
            Err(_) => FIXED_MASK.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vault() -> AesGcmVault {
        AesGcmVault::from_base64_key(&AesGcmVault::generate_master_key()).unwrap()
    }

    #[test]
    fn round_trip() {
        let v = vault();
        let blob = v.encrypt("gsk_1234567890abcdef").unwrap();
        assert_eq!(v.decrypt(&blob).unwrap(), "gsk_1234567890abcdef");
    }

    #[test]
    fn encrypting_twice_yields_distinct_blobs() {
        let v = vault();
        let a = v.encrypt("gsk_key").unwrap();
        let b = v.encrypt("gsk_key").unwrap();
        assert_ne!(a, b);
        assert_eq!(v.decrypt(&a).unwrap(), v.decrypt(&b).unwrap());
    }

    #[test]
    fn other_master_key_cannot_decrypt() {
        let blob = vault().encrypt("gsk_secret").unwrap();
        let other = vault();
        assert!(matches!(
            other.decrypt(&blob).unwrap_err(),
            VaultError::Decryption
        ));
    }

    #[test]
    fn tampered_blob_fails_authentication() {
        let v = vault();
        let blob = v.encrypt("gsk_secret").unwrap();
        let mut bytes = BASE64.decode(&blob).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0x01;
        let tampered = BASE64.encode(bytes);
        assert!(matches!(
            v.decrypt(&tampered).unwrap_err(),
            VaultError::Decryption
        ));
    }

    #[test]
    fn garbage_input_fails_cleanly() {
        let v = vault();
        assert!(v.decrypt("not base64 at all!!").is_err());
        assert!(v.decrypt("").is_err());
        // Valid base64 but shorter than a nonce
        assert!(v.decrypt(&BASE64.encode([0u8; 8])).is_err());
    }

    #[test]
    fn malformed_master_key_is_configuration_error() {
        assert!(matches!(
            AesGcmVault::from_base64_key("not-base64!").unwrap_err(),
            VaultError::Configuration(_)
        ));
        // Right encoding, wrong length
        assert!(matches!(
            AesGcmVault::from_base64_key(&BASE64.encode([0u8; 16])).unwrap_err(),
            VaultError::Configuration(_)
        ));
    }

    #[test]
    fn preview_masks_and_never_errors() {
        let v = vault();
        let blob = v.encrypt("gsk_1234567890abcdef").unwrap();
        assert_eq!(v.preview(&blob), "gsk_...cdef");

        let short = v.encrypt("tiny").unwrap();
        assert_eq!(v.preview(&short), FIXED_MASK);

        // Unreadable blob collapses to the fixed mask instead of an error
        assert_eq!(v.preview("garbage"), FIXED_MASK);
    }
}
