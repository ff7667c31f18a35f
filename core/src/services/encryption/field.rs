//! Deterministic field encryption for PII columns.
//!
//! Two sub-keys are derived from the master key with HMAC-SHA256. The nonce
//! for each value is the first 12 bytes of HMAC(nonce_key, plaintext), so
//! equal plaintexts encrypt to equal ciphertexts and exact-match lookups
//! (duplicate detection) work against encrypted columns. The stored form is
//! `v1:` followed by base64 of `nonce || ciphertext || tag`.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Key, Nonce,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::errors::{DomainError, DomainResult};

type HmacSha256 = Hmac<Sha256>;

const VERSION_PREFIX: &str = "v1:";
const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;
const ENCRYPTION_KEY_LABEL: &[u8] = b"kurator/field-encryption/v1";
const NONCE_KEY_LABEL: &[u8] = b"kurator/field-nonce/v1";

pub struct FieldEncryptor {
    cipher: Aes256Gcm,
    nonce_key: [u8; 32],
}

impl std::fmt::Debug for FieldEncryptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldEncryptor").finish_non_exhaustive()
    }
}

impl FieldEncryptor {
    /// Build from a raw 32-byte master key
    pub fn new(master_key: &[u8]) -> DomainResult<Self> {
        if master_key.len() != 32 {
            return Err(DomainError::Internal {
                message: "Encryption key must be 32 bytes".to_string(),
            });
        }

        let encryption_key = derive_key(master_key, ENCRYPTION_KEY_LABEL)?;
        let nonce_key = derive_key(master_key, NONCE_KEY_LABEL)?;
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&encryption_key));

        Ok(Self { cipher, nonce_key })
    }

    /// Build from the base64 form used in configuration
    pub fn from_base64(encoded: &str) -> DomainResult<Self> {
        let key = BASE64
            .decode(encoded.trim())
            .map_err(|_| DomainError::Internal {
                message: "Encryption key is not valid base64".to_string(),
            })?;
        Self::new(&key)
    }

    pub fn encrypt(&self, plaintext: &str) -> DomainResult<String> {
        let digest = hmac_sha256(&self.nonce_key, plaintext.as_bytes())?;
        let nonce_bytes = &digest[..NONCE_LEN];

        let ciphertext = self
            .cipher
            .encrypt(Nonce::from_slice(nonce_bytes), plaintext.as_bytes())
            .map_err(|_| DomainError::Internal {
                message: "Field encryption failed".to_string(),
            })?;

        let mut payload = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        payload.extend_from_slice(nonce_bytes);
        payload.extend_from_slice(&ciphertext);

        Ok(format!("{}{}", VERSION_PREFIX, BASE64.encode(payload)))
    }

    pub fn decrypt(&self, stored: &str) -> DomainResult<String> {
        let encoded = stored
            .strip_prefix(VERSION_PREFIX)
            .ok_or_else(|| decrypt_error("unsupported ciphertext version"))?;
        let payload = BASE64
            .decode(encoded)
            .map_err(|_| decrypt_error("ciphertext is not valid base64"))?;
        if payload.len() < NONCE_LEN + TAG_LEN {
            return Err(decrypt_error("ciphertext is too short"));
        }

        let (nonce, ciphertext) = payload.split_at(NONCE_LEN);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| decrypt_error("authentication tag mismatch"))?;

        String::from_utf8(plaintext).map_err(|_| decrypt_error("plaintext is not UTF-8"))
    }

    pub fn encrypt_opt(&self, plaintext: Option<&str>) -> DomainResult<Option<String>> {
        plaintext.map(|value| self.encrypt(value)).transpose()
    }

    pub fn decrypt_opt(&self, stored: Option<&str>) -> DomainResult<Option<String>> {
        stored.map(|value| self.decrypt(value)).transpose()
    }

    /// Whether a stored value carries the ciphertext prefix
    pub fn is_encrypted(value: &str) -> bool {
        value.starts_with(VERSION_PREFIX)
    }
}

fn derive_key(master_key: &[u8], label: &[u8]) -> DomainResult<[u8; 32]> {
    let digest = hmac_sha256(master_key, label)?;
    let mut key = [0u8; 32];
    key.copy_from_slice(&digest);
    Ok(key)
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> DomainResult<Vec<u8>> {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(key).map_err(|_| DomainError::Internal {
        message: "Invalid HMAC key".to_string(),
    })?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

fn decrypt_error(reason: &str) -> DomainError {
    DomainError::Internal {
        message: format!("Field decryption failed: {}", reason),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encryptor() -> FieldEncryptor {
        let key: Vec<u8> = (0u8..32).collect();
        FieldEncryptor::new(&key).unwrap()
    }

    #[test]
    fn test_encryption_is_deterministic() {
        let enc = encryptor();
        let a = enc.encrypt("Anna Sokolova").unwrap();
        let b = enc.encrypt("Anna Sokolova").unwrap();
        let c = enc.encrypt("Anna Sokolov").unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(FieldEncryptor::is_encrypted(&a));
        assert!(!a.contains("Anna"));
        assert_eq!(enc.decrypt(&a).unwrap(), "Anna Sokolova");
    }

    #[test]
    fn test_unicode_and_empty_values() {
        let enc = encryptor();
        let cipher = enc.encrypt("Иван Петров").unwrap();
        assert_eq!(enc.decrypt(&cipher).unwrap(), "Иван Петров");
        let empty = enc.encrypt("").unwrap();
        assert_eq!(enc.decrypt(&empty).unwrap(), "");
    }

    #[test]
    fn test_different_keys_do_not_decrypt() {
        let other = FieldEncryptor::new(&[7u8; 32]).unwrap();
        let cipher = encryptor().encrypt("secret note").unwrap();
        assert!(other.decrypt(&cipher).is_err());
    }

    #[test]
    fn test_tampered_ciphertext_is_rejected() {
        let enc = encryptor();
        let cipher = enc.encrypt("+7 495 123-45-67").unwrap();
        let mut payload = BASE64.decode(&cipher[3..]).unwrap();
        let last = payload.len() - 1;
        payload[last] ^= 0x01;
        let tampered = format!("v1:{}", BASE64.encode(payload));

        let err = enc.decrypt(&tampered).unwrap_err().to_string();
        assert!(err.contains("tag mismatch"));
        assert!(!err.contains("495"));
    }

    #[test]
    fn test_malformed_inputs() {
        let enc = encryptor();
        assert!(enc.decrypt("plain text").is_err());
        assert!(enc.decrypt("v1:!!!").is_err());
        assert!(enc.decrypt(&format!("v1:{}", BASE64.encode([0u8; 10]))).is_err());
    }

    #[test]
    fn test_optional_helpers() {
        let enc = encryptor();
        assert_eq!(enc.encrypt_opt(None).unwrap(), None);
        let stored = enc.encrypt_opt(Some("note")).unwrap();
        assert_eq!(enc.decrypt_opt(stored.as_deref()).unwrap().as_deref(), Some("note"));
    }

    #[test]
    fn test_key_validation() {
        assert!(FieldEncryptor::new(&[0u8; 16]).is_err());
        assert!(FieldEncryptor::from_base64("not base64!").is_err());
        assert!(FieldEncryptor::from_base64(kurator_shared::config::security::DEV_ENCRYPTION_KEY).is_ok());
    }
}
