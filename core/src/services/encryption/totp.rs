//! Time-based one-time passwords (RFC 6238).

use constant_time_eq::constant_time_eq;
use hmac::{Hmac, Mac};
use rand::{rngs::OsRng, RngCore};
use sha1::Sha1;

use crate::errors::{DomainError, DomainResult};

type HmacSha1 = Hmac<Sha1>;

const STEP_SECONDS: i64 = 30;
const DIGITS: usize = 6;
const SECRET_BYTES: usize = 20;
/// Accepted clock drift in steps on each side
const SKEW_STEPS: i64 = 1;

const BASE32: base32::Alphabet = base32::Alphabet::RFC4648 { padding: false };

#[derive(Debug, Clone)]
pub struct TotpService {
    issuer: String,
}

impl TotpService {
    pub fn new(issuer: impl Into<String>) -> Self {
        Self {
            issuer: issuer.into(),
        }
    }

    /// 160-bit random secret, base32 without padding
    pub fn generate_secret(&self) -> String {
        let mut bytes = [0u8; SECRET_BYTES];
        OsRng.fill_bytes(&mut bytes);
        base32::encode(BASE32, &bytes)
    }

    /// `otpauth://` URI for authenticator apps
    pub fn provisioning_uri(&self, secret: &str, account: &str) -> String {
        format!(
            "otpauth://totp/{issuer}:{account}?secret={secret}&issuer={issuer}&algorithm=SHA1&digits={digits}&period={period}",
            issuer = percent_encode(&self.issuer),
            account = percent_encode(account),
            secret = secret,
            digits = DIGITS,
            period = STEP_SECONDS,
        )
    }

    /// Code for the step containing `unix_time`
    pub fn code_at(&self, secret: &str, unix_time: i64) -> DomainResult<String> {
        let key = decode_secret(secret)?;
        hotp(&key, unix_time.div_euclid(STEP_SECONDS))
    }

    /// Check a code against the current step and one step either side
    pub fn verify(&self, secret: &str, code: &str, unix_time: i64) -> DomainResult<bool> {
        let code = code.trim();
        if code.len() != DIGITS || !code.bytes().all(|b| b.is_ascii_digit()) {
            return Ok(false);
        }

        let key = decode_secret(secret)?;
        let counter = unix_time.div_euclid(STEP_SECONDS);
        let mut matched = false;
        for offset in -SKEW_STEPS..=SKEW_STEPS {
            let expected = hotp(&key, counter + offset)?;
            // Every window is compared so timing does not reveal which one matched
            matched |= constant_time_eq(expected.as_bytes(), code.as_bytes());
        }
        Ok(matched)
    }
}

fn decode_secret(secret: &str) -> DomainResult<Vec<u8>> {
    let normalized: String = secret
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '=')
        .map(|c| c.to_ascii_uppercase())
        .collect();
    base32::decode(BASE32, &normalized)
        .filter(|key| !key.is_empty())
        .ok_or_else(|| DomainError::internal("TOTP secret is not valid base32"))
}

fn hotp(key: &[u8], counter: i64) -> DomainResult<String> {
    let mut mac = <HmacSha1 as Mac>::new_from_slice(key)
        .map_err(|_| DomainError::internal("Invalid TOTP key"))?;
    mac.update(&(counter as u64).to_be_bytes());
    let digest = mac.finalize().into_bytes();

    // Dynamic truncation, RFC 4226 section 5.3
    let offset = (digest[digest.len() - 1] & 0x0f) as usize;
    let binary = u32::from_be_bytes([
        digest[offset] & 0x7f,
        digest[offset + 1],
        digest[offset + 2],
        digest[offset + 3],
    ]);
    Ok(format!("{:06}", binary % 1_000_000))
}

fn percent_encode(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}
