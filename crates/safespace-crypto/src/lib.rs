//! # safespace-crypto
//!
//! Symmetric envelope encryption for report payloads. XChaCha20-Poly1305
//! gives confidentiality + integrity; tokens are self-contained (version
//! prefix + base64(nonce || ciphertext)), so callers never track nonces.

mod cipher;

pub use cipher::{EnvelopeCipher, ENCRYPTION_KEY_ENV};
