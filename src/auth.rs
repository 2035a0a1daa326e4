//! Operator verification and the reversal confirmation gate
//!
//! Passwords and the reversal secret are stored and compared as SHA-256
//! digests, checked in constant time. The confirmation step for destructive
//! batch reversal is deliberately weak (a shared secret, no lockout); it is
//! a confirm-then-mutate gate, not real authorization.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::models::Credential;

/// Operator created on first run if the credentials file does not exist.
pub const DEFAULT_OPERATOR: &str = "CamilaM";
pub const DEFAULT_PASSWORD: &str = "1234";

/// SHA-256 digest of the fixed reversal confirmation secret.
const REVERSAL_SECRET_HASH: &str =
    "4ba8f8bb649de380a28fc36fb8ac27309321b1b61bb4f1f32009145d9d276efb";

/// Hex-encoded SHA-256 digest of the input.
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(64);
    for byte in digest {
        out.push_str(&format!("{:02x}", byte));
    }
    out
}

/// An authenticated operator, passed explicitly to handlers instead of
/// living in ambient session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub username: String,
}

/// Check a username/password pair against the credential rows. Empty input
/// never verifies. The digest comparison is constant-time.
pub fn verify_operator(
    credentials: &[Credential],
    username: &str,
    password: &str,
) -> Option<Session> {
    if username.is_empty() || password.is_empty() {
        return None;
    }
    let row = credentials.iter().find(|c| c.username == username)?;
    let supplied = sha256_hex(password);
    if bool::from(supplied.as_bytes().ct_eq(row.password_hash.as_bytes())) {
        Some(Session {
            username: username.to_string(),
        })
    } else {
        None
    }
}

/// Proof that the operator confirmed a destructive batch reversal. Only
/// `confirm_reversal` can mint one.
#[derive(Debug)]
pub struct ReversalToken(());

/// Check the out-of-band confirmation secret for sale reversal. Returns a
/// token on success; reversal through the ledger requires it.
pub fn confirm_reversal(secret: &str) -> Option<ReversalToken> {
    let supplied = sha256_hex(secret);
    if bool::from(supplied.as_bytes().ct_eq(REVERSAL_SECRET_HASH.as_bytes())) {
        Some(ReversalToken(()))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_credentials() -> Vec<Credential> {
        vec![Credential {
            username: DEFAULT_OPERATOR.to_string(),
            password_hash: sha256_hex(DEFAULT_PASSWORD),
        }]
    }

    #[test]
    fn test_sha256_hex_known_digest() {
        // sha256("1234")
        assert_eq!(
            sha256_hex("1234"),
            "03ac674216f3e15c761ee1a5e255f067953623c8b388b4459e13f978d7c846f4"
        );
    }

    #[test]
    fn test_verify_operator_accepts_default_login() {
        let creds = default_credentials();
        let session = verify_operator(&creds, DEFAULT_OPERATOR, DEFAULT_PASSWORD);
        assert_eq!(session.unwrap().username, DEFAULT_OPERATOR);
    }

    #[test]
    fn test_verify_operator_rejects_wrong_password() {
        let creds = default_credentials();
        assert!(verify_operator(&creds, DEFAULT_OPERATOR, "wrong").is_none());
    }

    #[test]
    fn test_verify_operator_rejects_unknown_user() {
        let creds = default_credentials();
        assert!(verify_operator(&creds, "nobody", DEFAULT_PASSWORD).is_none());
    }

    #[test]
    fn test_verify_operator_rejects_empty_input() {
        let creds = default_credentials();
        assert!(verify_operator(&creds, "", DEFAULT_PASSWORD).is_none());
        assert!(verify_operator(&creds, DEFAULT_OPERATOR, "").is_none());
    }

    #[test]
    fn test_confirm_reversal_accepts_secret() {
        assert!(confirm_reversal("112915").is_some());
    }

    #[test]
    fn test_confirm_reversal_rejects_wrong_secret() {
        assert!(confirm_reversal("000000").is_none());
        assert!(confirm_reversal("").is_none());
    }
}
