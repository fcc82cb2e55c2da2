//! Stateless signed sessions.
//!
//! A session cookie is `token.signature.label` where `signature` is
//! HMAC-SHA256 of `token` under the server secret. Verification recomputes
//! the tag; there is no server-side session table, so a session can only be
//! revoked early by rotating the secret.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::features::auth::model::SessionCredential;
use crate::modules::storage::token::{generate_url_safe_token, TokenError};
use crate::shared::constants::SESSION_TOKEN_BYTES;

type HmacSha256 = Hmac<Sha256>;

/// HMAC-SHA256 tag over `token`, unpadded base64url encoded
pub fn sign(token: &str, secret: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key size");
    mac.update(token.as_bytes());
    URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes())
}

/// Mint a fresh credential for `identity_label`
pub fn issue(identity_label: &str, secret: &str) -> Result<SessionCredential, TokenError> {
    let token = generate_url_safe_token(SESSION_TOKEN_BYTES)?;
    let signature = sign(&token, secret);
    Ok(SessionCredential {
        token,
        signature,
        identity_label: identity_label.to_string(),
    })
}

/// True if `cookie_value` is well-formed and carries a valid signature
pub fn verify(cookie_value: &str, secret: &str) -> bool {
    let Some(credential) = SessionCredential::parse(cookie_value) else {
        return false;
    };
    let expected = sign(&credential.token, secret);
    expected
        .as_bytes()
        .ct_eq(credential.signature.as_bytes())
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_issued_credential_verifies() {
        for label in ["password", "google", "github", "microsoft"] {
            let credential = issue(label, SECRET).unwrap();
            assert!(verify(&credential.to_cookie_value(), SECRET));
        }
    }

    #[test]
    fn test_signature_is_deterministic() {
        assert_eq!(sign("token", SECRET), sign("token", SECRET));
        assert_ne!(sign("token", SECRET), sign("token", "other-secret"));
        assert_ne!(sign("token", SECRET), sign("token2", SECRET));
    }

    #[test]
    fn test_flipped_signature_bit_fails() {
        let credential = issue("password", SECRET).unwrap();
        for i in 0..credential.signature.len() {
            let mut bytes = credential.signature.clone().into_bytes();
            bytes[i] ^= 0x01;
            let tampered = SessionCredential {
                signature: String::from_utf8(bytes).unwrap(),
                ..credential.clone()
            };
            assert!(!verify(&tampered.to_cookie_value(), SECRET));
        }
    }

    #[test]
    fn test_swapped_token_fails() {
        let a = issue("password", SECRET).unwrap();
        let b = issue("password", SECRET).unwrap();
        let forged = SessionCredential {
            token: a.token,
            ..b
        };
        assert!(!verify(&forged.to_cookie_value(), SECRET));
    }

    #[test]
    fn test_other_secret_fails() {
        let credential = issue("password", SECRET).unwrap();
        assert!(!verify(&credential.to_cookie_value(), "rotated"));
    }

    #[test]
    fn test_malformed_cookie_fails() {
        assert!(!verify("", SECRET));
        assert!(!verify("just-a-token", SECRET));
        let token = "abc";
        assert!(!verify(&format!("{}.{}", token, sign(token, SECRET)), SECRET));
        assert!(verify(&format!("{}.{}.", token, sign(token, SECRET)), SECRET));
    }
}
