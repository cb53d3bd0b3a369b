//! Session Token
//!
//! Cookie value of the form `<session-id>.<base64url(HMAC-SHA256(secret, session-id))>`.
//! The signature lets forged ids be rejected without a store lookup.

use std::fmt;

use kernel::id::SessionId;
use platform::crypto;

/// Signed, opaque session token
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    /// Sign a session id
    pub fn issue(session_id: &SessionId, secret: &[u8; 32]) -> Self {
        let session_id = session_id.to_string();
        let signature = crypto::hmac_sha256(secret, session_id.as_bytes());

        Self(format!("{}.{}", session_id, crypto::to_base64url(&signature)))
    }

    /// Recover the session id from a token signed with `secret`
    ///
    /// Returns `None` for malformed or forged tokens.
    pub fn verify(token: &str, secret: &[u8; 32]) -> Option<SessionId> {
        let (session_id_str, signature_b64) = token.split_once('.')?;
        let signature = crypto::from_base64url(signature_b64).ok()?;

        if !crypto::verify_hmac_sha256(secret, session_id_str.as_bytes(), &signature) {
            return None;
        }

        session_id_str.parse().ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SessionToken").field(&"[REDACTED]").finish()
    }
}
