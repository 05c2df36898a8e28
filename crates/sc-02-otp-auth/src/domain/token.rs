//! HMAC-SHA256 session tokens
//!
//! Token text is `hex(claims_json).hex(mac)`. The claims bind the opaque
//! user id, never the phone number, so a token survives a phone change and
//! dies with the identity.

use super::config::TokenConfig;
use super::errors::{AuthError, AuthResult};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use shared_types::{Timestamp, UserId};
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: UserId,
    pub iat: Timestamp,
    pub exp: Timestamp,
    pub jti: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: Timestamp,
}

pub struct TokenSigner {
    secret: Vec<u8>,
    ttl_ms: u64,
}

impl TokenSigner {
    pub fn new(config: &TokenConfig) -> Self {
        Self {
            secret: config.secret.as_bytes().to_vec(),
            ttl_ms: config.ttl_ms(),
        }
    }

    fn mac(&self) -> AuthResult<HmacSha256> {
        HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| AuthError::Internal(format!("hmac key: {e}")))
    }

    pub fn issue(&self, user: UserId, now: Timestamp) -> AuthResult<IssuedToken> {
        let claims = TokenClaims {
            sub: user,
            iat: now,
            exp: now.saturating_add(self.ttl_ms),
            jti: Uuid::new_v4(),
        };
        let payload = serde_json::to_vec(&claims)
            .map_err(|e| AuthError::Internal(format!("encode claims: {e}")))?;
        let mut mac = self.mac()?;
        mac.update(&payload);
        let signature = mac.finalize().into_bytes();
        Ok(IssuedToken {
            token: format!("{}.{}", hex::encode(&payload), hex::encode(signature)),
            expires_at: claims.exp,
        })
    }

    /// Checks the signature and, when `enforce_expiry` is set, the expiry.
    pub fn decode(&self, token: &str, now: Timestamp, enforce_expiry: bool) -> AuthResult<TokenClaims> {
        let (payload_hex, sig_hex) = token
            .trim()
            .split_once('.')
            .ok_or(AuthError::TokenInvalid("malformed token"))?;
        let payload =
            hex::decode(payload_hex).map_err(|_| AuthError::TokenInvalid("malformed token"))?;
        let signature =
            hex::decode(sig_hex).map_err(|_| AuthError::TokenInvalid("malformed token"))?;

        let mut mac = self.mac()?;
        mac.update(&payload);
        mac.verify_slice(&signature)
            .map_err(|_| AuthError::TokenInvalid("bad signature"))?;

        let claims: TokenClaims = serde_json::from_slice(&payload)
            .map_err(|_| AuthError::TokenInvalid("malformed claims"))?;
        if enforce_expiry && now > claims.exp {
            return Err(AuthError::TokenExpired);
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::DAY_MS;

    fn signer() -> TokenSigner {
        TokenSigner::new(&TokenConfig {
            secret: "test-secret".into(),
            ttl_secs: 7 * 24 * 3600,
        })
    }

    #[test]
    fn test_issue_then_decode() {
        let s = signer();
        let user = UserId::new();
        let issued = s.issue(user, 1_000).unwrap();
        assert_eq!(issued.expires_at, 1_000 + 7 * DAY_MS);
        let claims = s.decode(&issued.token, 2_000, true).unwrap();
        assert_eq!(claims.sub, user);
        assert_eq!(claims.iat, 1_000);
    }

    #[test]
    fn test_expiry_enforced_only_when_asked() {
        let s = signer();
        let issued = s.issue(UserId::new(), 0).unwrap();
        let later = issued.expires_at + 1;
        assert_eq!(s.decode(&issued.token, later, true), Err(AuthError::TokenExpired));
        assert!(s.decode(&issued.token, later, false).is_ok());
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let s = signer();
        let issued = s.issue(UserId::new(), 0).unwrap();
        let (payload, sig) = issued.token.split_once('.').unwrap();
        let mut bytes = hex::decode(payload).unwrap();
        bytes[10] ^= 0x01;
        let forged = format!("{}.{}", hex::encode(bytes), sig);
        assert_eq!(
            s.decode(&forged, 0, false),
            Err(AuthError::TokenInvalid("bad signature"))
        );
    }

    #[test]
    fn test_other_secret_rejected() {
        let issued = signer().issue(UserId::new(), 0).unwrap();
        let other = TokenSigner::new(&TokenConfig::default());
        assert!(matches!(
            other.decode(&issued.token, 0, false),
            Err(AuthError::TokenInvalid(_))
        ));
    }

    #[test]
    fn test_garbage_rejected() {
        let s = signer();
        assert!(matches!(s.decode("nope", 0, true), Err(AuthError::TokenInvalid(_))));
        assert!(matches!(s.decode("zz.zz", 0, true), Err(AuthError::TokenInvalid(_))));
    }
}
