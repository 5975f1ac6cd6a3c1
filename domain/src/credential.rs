//! Credential masking and resolution policy
//!
//! A credential is a provider API key owned by exactly one user. Plaintext
//! exists only inside the scope of a single call; the only form that may
//! cross the trust boundary outward is the masked preview produced here.

use crate::core::model::ModelId;
use thiserror::Error;

/// Preview returned for short keys and for any key that cannot be read.
pub const FIXED_MASK: &str = "****";

/// Masked preview of a plaintext credential.
///
/// Keys longer than 8 characters show the first and last 4 characters
/// ("gsk_...a9f2"); anything shorter collapses to the fixed mask so that
/// no more than half of a short key can ever leak.
pub fn mask_credential(plaintext: &str) -> String {
    let chars: Vec<char> = plaintext.chars().collect();
    if chars.len() <= 8 {
        return FIXED_MASK.to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

/// No usable credential after exhausting every source.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("no credential available")]
pub struct NoCredentialAvailable;

/// A stored account's contribution to resolution: the decrypted key (if
/// any) and the model preference (if any).
#[derive(Debug, Clone, Default)]
pub struct StoredChoice {
    pub credential: Option<String>,
    pub model: Option<ModelId>,
}

/// The credential and model a request will actually use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub credential: String,
    pub model: ModelId,
}

/// Single precedence rule for which credential and model a request uses.
///
/// Credential and model are resolved independently:
/// 1. explicit values supplied by the caller,
/// 2. the user's stored credential / model preference,
/// 3. the process-wide default credential / baseline model.
///
/// Only the credential can fail to resolve; the model always falls back to
/// [`ModelId::default`].
pub fn resolve(
    explicit_credential: Option<String>,
    explicit_model: Option<ModelId>,
    stored: StoredChoice,
    default_credential: Option<String>,
) -> Result<Resolved, NoCredentialAvailable> {
    let credential = explicit_credential
        .or(stored.credential)
        .or(default_credential)
        .ok_or(NoCredentialAvailable)?;
    let model = explicit_model.or(stored.model).unwrap_or_default();
    Ok(Resolved { credential, model })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_long_key() {
        assert_eq!(mask_credential("gsk_1234567890abcdef"), "gsk_...cdef");
    }

    #[test]
    fn mask_short_key_is_fixed() {
        assert_eq!(mask_credential("12345678"), FIXED_MASK);
        assert_eq!(mask_credential(""), FIXED_MASK);
    }

    #[test]
    fn mask_nine_chars_shows_ends() {
        assert_eq!(mask_credential("123456789"), "1234...6789");
    }

    #[test]
    fn mask_never_leaks_middle() {
        let key = "gsk_secret_middle_part_a9f2";
        let preview = mask_credential(key);
        assert!(!preview.contains("secret_middle"));
        assert_eq!(preview, "gsk_...a9f2");
    }

    #[test]
    fn explicit_beats_stored_beats_default() {
        let stored = StoredChoice {
            credential: Some("stored-key".into()),
            model: Some(ModelId::new("stored-model")),
        };

        let r = resolve(
            Some("explicit-key".into()),
            Some(ModelId::new("explicit-model")),
            stored.clone(),
            Some("default-key".into()),
        )
        .unwrap();
        assert_eq!(r.credential, "explicit-key");
        assert_eq!(r.model, ModelId::new("explicit-model"));

        let r = resolve(None, None, stored, Some("default-key".into())).unwrap();
        assert_eq!(r.credential, "stored-key");
        assert_eq!(r.model, ModelId::new("stored-model"));

        let r = resolve(None, None, StoredChoice::default(), Some("default-key".into())).unwrap();
        assert_eq!(r.credential, "default-key");
        assert_eq!(r.model, ModelId::default());
    }

    #[test]
    fn credential_and_model_resolve_independently() {
        // Model selected, no key yet: stored model applies over the
        // default credential.
        let stored = StoredChoice {
            credential: None,
            model: Some(ModelId::new("gemma2-9b-it")),
        };
        let r = resolve(None, None, stored, Some("default-key".into())).unwrap();
        assert_eq!(r.credential, "default-key");
        assert_eq!(r.model, ModelId::new("gemma2-9b-it"));

        // Key present, model still default.
        let stored = StoredChoice {
            credential: Some("stored-key".into()),
            model: None,
        };
        let r = resolve(None, None, stored, None).unwrap();
        assert_eq!(r.model, ModelId::default());
    }

    #[test]
    fn no_source_at_all_fails() {
        let err = resolve(None, None, StoredChoice::default(), None).unwrap_err();
        assert_eq!(err, NoCredentialAvailable);
    }
}
