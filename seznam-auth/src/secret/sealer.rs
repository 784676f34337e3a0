//! Sealing of secrets that are handed to the host for storage.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use super::encryption::{self, Key};
use crate::error::{secret_error, Error, SecretErrorKind};

/// Algorithm tag written next to AES-GCM sealed values.
pub const AES_256_GCM: &str = "aes-256-gcm";

/// An opaque secret as stored by the host.
///
/// A plain string is a value that was stored without an encryption key configured;
/// opening it yields the string unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SealedSecret {
    Encrypted { ciphertext: String, algorithm: String },
    Plain(String),
}

impl SealedSecret {
    pub fn is_encrypted(&self) -> bool {
        matches!(self, SealedSecret::Encrypted { .. })
    }
}

/// Host facility that seals secrets before they are persisted and opens them
/// just before use.
pub trait SecretSealer: Send + Sync {
    fn seal(&self, plaintext: &str) -> Result<SealedSecret, Error>;

    fn open(&self, sealed: &SealedSecret) -> Result<SecretString, Error>;
}

/// Sealer used when no encryption key is configured. Values are stored as-is.
#[derive(Debug, Clone, Default)]
pub struct PlaintextSealer;

impl SecretSealer for PlaintextSealer {
    fn seal(&self, plaintext: &str) -> Result<SealedSecret, Error> {
        Ok(SealedSecret::Plain(plaintext.to_string()))
    }

    fn open(&self, sealed: &SealedSecret) -> Result<SecretString, Error> {
        match sealed {
            SealedSecret::Plain(value) => Ok(SecretString::new(value.clone())),
            SealedSecret::Encrypted { .. } => Err(secret_error(
                SecretErrorKind::OpenFailed,
                "value is encrypted but no encryption key is configured",
            )),
        }
    }
}

/// AES-256-GCM sealer keyed by a 32-byte hex key.
#[derive(Clone)]
pub struct AesGcmSealer {
    key: Key,
}

impl AesGcmSealer {
    /// Create a sealer from a hex-encoded 32-byte key.
    pub fn new(key_hex: &str) -> Result<Self, Error> {
        Ok(Self {
            key: Key::from_hex(key_hex)?,
        })
    }
}

impl std::fmt::Debug for AesGcmSealer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AesGcmSealer").finish_non_exhaustive()
    }
}

impl SecretSealer for AesGcmSealer {
    fn seal(&self, plaintext: &str) -> Result<SealedSecret, Error> {
        Ok(SealedSecret::Encrypted {
            ciphertext: encryption::encrypt(plaintext, &self.key)?,
            algorithm: AES_256_GCM.to_string(),
        })
    }

    fn open(&self, sealed: &SealedSecret) -> Result<SecretString, Error> {
        match sealed {
            SealedSecret::Plain(value) => Ok(SecretString::new(value.clone())),
            SealedSecret::Encrypted {
                ciphertext,
                algorithm,
            } => {
                if algorithm != AES_256_GCM {
                    return Err(secret_error(
                        SecretErrorKind::OpenFailed,
                        &format!("unsupported algorithm {}", algorithm),
                    ));
                }
                Ok(SecretString::new(encryption::decrypt(
                    ciphertext, &self.key,
                )?))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use secrecy::ExposeSecret;

    const TEST_KEY: &str = "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";

    #[test]
    fn test_plaintext_sealer_stores_value_as_is() {
        let sealer = PlaintextSealer;
        let sealed = sealer.seal("tok").unwrap();
        assert_eq!(sealed, SealedSecret::Plain("tok".to_string()));
        assert_eq!(sealer.open(&sealed).unwrap().expose_secret(), "tok");
    }

    #[test]
    fn test_plaintext_sealer_cannot_open_encrypted_value() {
        let sealed = AesGcmSealer::new(TEST_KEY).unwrap().seal("tok").unwrap();
        let result = PlaintextSealer.open(&sealed);
        assert!(matches!(
            result,
            Err(Error {
                error_kind: ErrorKind::Secret(SecretErrorKind::OpenFailed),
                ..
            })
        ));
    }

    #[test]
    fn test_aes_sealer_hides_plaintext() {
        let sealer = AesGcmSealer::new(TEST_KEY).unwrap();
        let sealed = sealer.seal("tok").unwrap();
        assert!(sealed.is_encrypted());
        assert_eq!(sealer.open(&sealed).unwrap().expose_secret(), "tok");
    }

    #[test]
    fn test_aes_sealer_opens_values_stored_unencrypted() {
        let sealer = AesGcmSealer::new(TEST_KEY).unwrap();
        let sealed = SealedSecret::Plain("s1".to_string());
        assert_eq!(sealer.open(&sealed).unwrap().expose_secret(), "s1");
    }

    #[test]
    fn test_aes_sealer_rejects_unknown_algorithm() {
        let sealer = AesGcmSealer::new(TEST_KEY).unwrap();
        let sealed = SealedSecret::Encrypted {
            ciphertext: "AAAA".to_string(),
            algorithm: "rot13".to_string(),
        };
        assert!(sealer.open(&sealed).is_err());
    }

    #[test]
    fn test_sealed_secret_serializes_untagged() {
        let plain = serde_json::to_value(SealedSecret::Plain("tok".into())).unwrap();
        assert_eq!(plain, serde_json::json!("tok"));

        let encrypted: SealedSecret = serde_json::from_value(serde_json::json!({
            "ciphertext": "abc",
            "algorithm": "aes-256-gcm"
        }))
        .unwrap();
        assert!(encrypted.is_encrypted());
    }
}
