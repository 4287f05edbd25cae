//! EnvelopeCipher — process-wide AEAD cipher, key loaded once at startup.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{Key, XChaCha20Poly1305, XNonce};
use rand::rngs::OsRng;
use rand::RngCore;

use safespace_core::errors::CryptoError;

/// Environment variable holding the base64-encoded 32-byte key.
pub const ENCRYPTION_KEY_ENV: &str = "SAFESPACE_ENCRYPTION_KEY";

/// Token version prefix. Bump if the envelope layout ever changes.
const TOKEN_PREFIX: &str = "ss1.";

/// XChaCha20-Poly1305 nonce length in bytes.
const NONCE_LEN: usize = 24;

/// Symmetric authenticated cipher for report payloads.
pub struct EnvelopeCipher {
    cipher: XChaCha20Poly1305,
    /// True when the key was generated at startup instead of configured.
    ephemeral: bool,
}

impl EnvelopeCipher {
    /// Build from raw 32-byte key material.
    pub fn from_key(key: &[u8; 32]) -> Self {
        Self {
            cipher: XChaCha20Poly1305::new(Key::from_slice(key)),
            ephemeral: false,
        }
    }

    /// Load the key from the environment. If unset, generate an ephemeral
    /// key and warn loudly: data encrypted under it is unrecoverable after
    /// restart. Accepted degraded mode for development only.
    pub fn from_env() -> Result<Self, CryptoError> {
        match std::env::var(ENCRYPTION_KEY_ENV) {
            Ok(encoded) => Self::from_encoded(&encoded),
            Err(_) => {
                tracing::warn!(
                    env_var = ENCRYPTION_KEY_ENV,
                    "no encryption key configured; generated an EPHEMERAL key. \
                     Encrypted reports will be UNRECOVERABLE after restart. \
                     Do not run production this way."
                );
                Ok(Self::ephemeral())
            }
        }
    }

    /// Strict variant for production: an unset key is a hard startup failure.
    pub fn from_env_required() -> Result<Self, CryptoError> {
        match std::env::var(ENCRYPTION_KEY_ENV) {
            Ok(encoded) => Self::from_encoded(&encoded),
            Err(_) => Err(CryptoError::KeyMissing {
                env_var: ENCRYPTION_KEY_ENV,
            }),
        }
    }

    /// Generate a random in-process key.
    pub fn ephemeral() -> Self {
        let mut key = [0u8; 32];
        OsRng.fill_bytes(&mut key);
        Self {
            cipher: XChaCha20Poly1305::new(Key::from_slice(&key)),
            ephemeral: true,
        }
    }

    fn from_encoded(encoded: &str) -> Result<Self, CryptoError> {
        let bytes = BASE64
            .decode(encoded.trim())
            .map_err(|e| CryptoError::KeyInvalid {
                reason: format!("key is not valid base64: {e}"),
            })?;
        let key: [u8; 32] = bytes.try_into().map_err(|v: Vec<u8>| CryptoError::KeyInvalid {
            reason: format!("key must be 32 bytes, got {}", v.len()),
        })?;
        Ok(Self::from_key(&key))
    }

    /// Whether this cipher runs on a generated (non-configured) key.
    pub fn is_ephemeral(&self) -> bool {
        self.ephemeral
    }

    /// Encrypt a payload into a self-contained token.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<String, CryptoError> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = XNonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(nonce, plaintext)
            .map_err(|_| CryptoError::EncryptionFailed {
                reason: "aead encrypt rejected payload".to_string(),
            })?;

        let mut envelope = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        envelope.extend_from_slice(&nonce_bytes);
        envelope.extend_from_slice(&ciphertext);
        Ok(format!("{TOKEN_PREFIX}{}", BASE64.encode(envelope)))
    }

    /// Decrypt a token. Tampered, truncated, or wrong-key tokens fail with
    /// `DecryptionFailed` — never silent garbage.
    pub fn decrypt(&self, token: &str) -> Result<Vec<u8>, CryptoError> {
        let encoded = token
            .strip_prefix(TOKEN_PREFIX)
            .ok_or_else(|| CryptoError::DecryptionFailed {
                reason: "unrecognized token format".to_string(),
            })?;

        let envelope = BASE64
            .decode(encoded)
            .map_err(|e| CryptoError::DecryptionFailed {
                reason: format!("token is not valid base64: {e}"),
            })?;

        if envelope.len() < NONCE_LEN {
            return Err(CryptoError::DecryptionFailed {
                reason: "token too short to contain a nonce".to_string(),
            });
        }

        let (nonce_bytes, ciphertext) = envelope.split_at(NONCE_LEN);
        self.cipher
            .decrypt(XNonce::from_slice(nonce_bytes), ciphertext)
            .map_err(|_| CryptoError::DecryptionFailed {
                reason: "authentication tag mismatch".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let cipher = EnvelopeCipher::ephemeral();
        let payload = b"I need to report an incident from yesterday's standup";
        let token = cipher.encrypt(payload).unwrap();
        assert!(token.starts_with("ss1."));
        assert_eq!(cipher.decrypt(&token).unwrap(), payload);
    }

    #[test]
    fn round_trip_empty_and_binary() {
        let cipher = EnvelopeCipher::ephemeral();
        assert_eq!(cipher.decrypt(&cipher.encrypt(b"").unwrap()).unwrap(), b"");
        let blob: Vec<u8> = (0..=255).collect();
        assert_eq!(cipher.decrypt(&cipher.encrypt(&blob).unwrap()).unwrap(), blob);
    }

    #[test]
    fn tampered_token_fails() {
        let cipher = EnvelopeCipher::ephemeral();
        let token = cipher.encrypt(b"sensitive").unwrap();
        // Flip a character in the ciphertext portion.
        let mut chars: Vec<char> = token.chars().collect();
        let last = chars.len() - 1;
        chars[last] = if chars[last] == 'A' { 'B' } else { 'A' };
        let tampered: String = chars.into_iter().collect();
        assert!(matches!(
            cipher.decrypt(&tampered),
            Err(CryptoError::DecryptionFailed { .. })
        ));
    }

    #[test]
    fn wrong_key_fails() {
        let token = EnvelopeCipher::ephemeral().encrypt(b"sensitive").unwrap();
        let other = EnvelopeCipher::ephemeral();
        assert!(matches!(
            other.decrypt(&token),
            Err(CryptoError::DecryptionFailed { .. })
        ));
    }

    #[test]
    fn garbage_tokens_fail() {
        let cipher = EnvelopeCipher::ephemeral();
        for bad in ["", "ss1.", "ss1.!!!", "not-a-token", "ss2.AAAA"] {
            assert!(cipher.decrypt(bad).is_err(), "{bad:?}");
        }
    }

    #[test]
    fn fixed_key_round_trips_across_instances() {
        let key = [7u8; 32];
        let token = EnvelopeCipher::from_key(&key).encrypt(b"survives restart").unwrap();
        let reopened = EnvelopeCipher::from_key(&key);
        assert_eq!(reopened.decrypt(&token).unwrap(), b"survives restart");
    }
}
