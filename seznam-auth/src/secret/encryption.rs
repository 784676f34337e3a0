//! AES-256-GCM primitives used to seal secrets at rest.
//!
//! The key is 32 bytes provided as a hex-encoded string (64 characters). Output is
//! base64 of the random nonce followed by the ciphertext.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use rand::Rng;

use crate::error::{secret_error, Error, ErrorKind, SecretErrorKind};

/// 12-byte nonce size for AES-GCM
const NONCE_SIZE: usize = 12;

/// Parsed 256-bit key.
#[derive(Clone)]
pub(crate) struct Key([u8; 32]);

impl Key {
    pub(crate) fn from_hex(key_hex: &str) -> Result<Self, Error> {
        let bytes = hex::decode(key_hex).map_err(|e| Error {
            source: Some(Box::new(e)),
            error_kind: ErrorKind::Secret(SecretErrorKind::SealFailed),
        })?;
        if bytes.len() != 32 {
            return Err(secret_error(
                SecretErrorKind::SealFailed,
                "encryption key must be 32 bytes",
            ));
        }
        let mut key = [0u8; 32];
        key.copy_from_slice(&bytes);
        Ok(Key(key))
    }
}

/// Encrypts plaintext with a fresh random nonce.
pub(crate) fn encrypt(plaintext: &str, key: &Key) -> Result<String, Error> {
    let cipher = Aes256Gcm::new_from_slice(&key.0)
        .map_err(|_| secret_error(SecretErrorKind::SealFailed, "invalid key length"))?;

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    rand::thread_rng().fill(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext.as_bytes())
        .map_err(|_| secret_error(SecretErrorKind::SealFailed, "encryption failed"))?;

    let mut combined = nonce_bytes.to_vec();
    combined.extend(ciphertext);

    Ok(BASE64.encode(combined))
}

/// Decrypts a value produced by [`encrypt`].
pub(crate) fn decrypt(ciphertext_b64: &str, key: &Key) -> Result<String, Error> {
    let cipher = Aes256Gcm::new_from_slice(&key.0)
        .map_err(|_| secret_error(SecretErrorKind::OpenFailed, "invalid key length"))?;

    let combined = BASE64.decode(ciphertext_b64).map_err(|e| Error {
        source: Some(Box::new(e)),
        error_kind: ErrorKind::Secret(SecretErrorKind::OpenFailed),
    })?;

    if combined.len() < NONCE_SIZE {
        return Err(secret_error(
            SecretErrorKind::OpenFailed,
            "ciphertext shorter than nonce",
        ));
    }

    let (nonce_bytes, ciphertext) = combined.split_at(NONCE_SIZE);
    let nonce = Nonce::from_slice(nonce_bytes);

    let plaintext_bytes = cipher
        .decrypt(nonce, ciphertext)
        .map_err(|_| secret_error(SecretErrorKind::OpenFailed, "decryption failed"))?;

    String::from_utf8(plaintext_bytes).map_err(|e| Error {
        source: Some(Box::new(e)),
        error_kind: ErrorKind::Secret(SecretErrorKind::OpenFailed),
    })
}
