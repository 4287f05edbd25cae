/// Encryption-service errors.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    /// Tampered, truncated, or wrong-key token. Never manifests as
    /// silently-wrong plaintext.
    #[error("decryption failed: {reason}")]
    DecryptionFailed { reason: String },

    #[error("encryption failed: {reason}")]
    EncryptionFailed { reason: String },

    /// The configured key material is unusable (wrong length, bad encoding).
    #[error("invalid encryption key: {reason}")]
    KeyInvalid { reason: String },

    /// Production mode requires a configured key; none was found.
    #[error("encryption key not configured (set {env_var})")]
    KeyMissing { env_var: &'static str },
}
