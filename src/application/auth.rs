//! Caller identity, the admin gate, and signed session tokens.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac, digest::KeyInit};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Identity of whoever is making the current request.
///
/// Built by the transport layer from the session; the application never looks
/// at cookies or headers itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallerContext {
    pub email: Option<String>,
}

impl CallerContext {
    pub fn anonymous() -> Self {
        Self { email: None }
    }

    pub fn signed_in(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.email.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthorizationError {
    #[error("sign-in required")]
    Unauthenticated,
    #[error("administrator access required")]
    Forbidden,
}

pub trait AdminGate: Send + Sync {
    fn is_admin(&self, caller: &CallerContext) -> bool;

    /// Fail closed unless the caller is an administrator.
    fn authorize(&self, caller: &CallerContext) -> Result<(), AuthorizationError> {
        if self.is_admin(caller) {
            Ok(())
        } else if caller.is_authenticated() {
            Err(AuthorizationError::Forbidden)
        } else {
            Err(AuthorizationError::Unauthenticated)
        }
    }
}

/// Grants admin rights to exactly one configured e-mail address.
#[derive(Debug, Clone)]
pub struct EmailAdminGate {
    admin_email: String,
}

impl EmailAdminGate {
    pub fn new(admin_email: impl Into<String>) -> Self {
        Self {
            admin_email: admin_email.into().trim().to_string(),
        }
    }
}

impl AdminGate for EmailAdminGate {
    fn is_admin(&self, caller: &CallerContext) -> bool {
        if self.admin_email.is_empty() {
            return false;
        }
        caller
            .email
            .as_deref()
            .is_some_and(|email| email.trim().eq_ignore_ascii_case(&self.admin_email))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("session secret cannot key HMAC-SHA256")]
pub struct InvalidSessionSecret;

/// Issues and verifies `base64url(email).hex(hmac_sha256(secret, email))` tokens.
#[derive(Clone)]
pub struct SessionTokens {
    mac: HmacSha256,
}

impl SessionTokens {
    pub fn new(secret: impl AsRef<[u8]>) -> Result<Self, InvalidSessionSecret> {
        let mac = <HmacSha256 as KeyInit>::new_from_slice(secret.as_ref())
            .map_err(|_| InvalidSessionSecret)?;
        Ok(Self { mac })
    }

    pub fn issue(&self, email: &str) -> String {
        let encoded = URL_SAFE_NO_PAD.encode(email.as_bytes());
        let signature = hex::encode(self.keyed(email).finalize().into_bytes());
        format!("{encoded}.{signature}")
    }

    /// Return the signed-in e-mail when the token is well-formed and authentic.
    pub fn verify(&self, token: &str) -> Option<String> {
        let (encoded, signature) = token.trim().split_once('.')?;
        let email_bytes = URL_SAFE_NO_PAD.decode(encoded).ok()?;
        let email = String::from_utf8(email_bytes).ok()?;
        if email.is_empty() {
            return None;
        }

        let presented = hex::decode(signature).ok()?;
        self.keyed(&email).verify_slice(&presented).ok()?;

        Some(email)
    }

    fn keyed(&self, email: &str) -> HmacSha256 {
        let mut mac = self.mac.clone();
        mac.update(email.as_bytes());
        mac
    }
}

impl std::fmt::Debug for SessionTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTokens").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_email_matches_case_insensitively() {
        let gate = EmailAdminGate::new("Admin@Example.com");
        assert!(gate.is_admin(&CallerContext::signed_in("admin@example.com")));
        assert!(!gate.is_admin(&CallerContext::signed_in("reader@example.com")));
        assert!(!gate.is_admin(&CallerContext::anonymous()));
    }

    #[test]
    fn authorize_distinguishes_anonymous_from_forbidden() {
        let gate = EmailAdminGate::new("admin@example.com");

        assert_eq!(
            gate.authorize(&CallerContext::anonymous()),
            Err(AuthorizationError::Unauthenticated)
        );
        assert_eq!(
            gate.authorize(&CallerContext::signed_in("reader@example.com")),
            Err(AuthorizationError::Forbidden)
        );
        assert_eq!(
            gate.authorize(&CallerContext::signed_in("admin@example.com")),
            Ok(())
        );
    }

    #[test]
    fn blank_admin_email_admits_nobody() {
        let gate = EmailAdminGate::new("  ");
        assert!(!gate.is_admin(&CallerContext::signed_in("")));
    }

    #[test]
    fn issued_tokens_verify() {
        let tokens = SessionTokens::new("0123456789abcdef").expect("secret");
        let token = tokens.issue("admin@example.com");
        assert_eq!(tokens.verify(&token).as_deref(), Some("admin@example.com"));
    }

    #[test]
    fn tokens_from_another_secret_are_rejected() {
        let issuer = SessionTokens::new("0123456789abcdef").expect("secret");
        let verifier = SessionTokens::new("fedcba9876543210").expect("secret");
        let token = issuer.issue("admin@example.com");
        assert_eq!(verifier.verify(&token), None);
    }

    #[test]
    fn tampered_email_is_rejected() {
        let tokens = SessionTokens::new("0123456789abcdef").expect("secret");
        let token = tokens.issue("reader@example.com");
        let (_, signature) = token.split_once('.').expect("token shape");
        let forged = format!(
            "{}.{signature}",
            URL_SAFE_NO_PAD.encode("admin@example.com")
        );
        assert_eq!(tokens.verify(&forged), None);
    }

    #[test]
    fn malformed_tokens_are_rejected() {
        let tokens = SessionTokens::new("0123456789abcdef").expect("secret");
        assert_eq!(tokens.verify(""), None);
        assert_eq!(tokens.verify("no-dot"), None);
        assert_eq!(tokens.verify("!!!.abcd"), None);
        assert_eq!(tokens.verify("YQ.not-hex"), None);
    }

    #[test]
    fn signature_is_hmac_sha256_over_the_email() {
        let secret = "0123456789abcdef";
        let tokens = SessionTokens::new(secret).expect("secret");

        let mut mac = <HmacSha256 as KeyInit>::new_from_slice(secret.as_bytes()).expect("key");
        mac.update(b"admin@example.com");
        let expected = format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode("admin@example.com"),
            hex::encode(mac.finalize().into_bytes())
        );

        assert_eq!(tokens.issue("admin@example.com"), expected);
    }

    #[test]
    fn truncated_signature_is_rejected() {
        let tokens = SessionTokens::new("0123456789abcdef").expect("secret");
        let token = tokens.issue("admin@example.com");
        assert_eq!(tokens.verify(&token[..token.len() - 2]), None);
    }
}
