//! # Inbound Port - OtpAuthApi

use crate::domain::{AuthResult, LoginIdentity, RefreshedToken, SendCodeOutcome, Session};
use async_trait::async_trait;

#[async_trait]
pub trait OtpAuthApi: Send + Sync {
    /// Issues a code for a provisioned phone.
    ///
    /// # Errors
    /// - `Validation`: missing or malformed country code / phone
    /// - `NotRegistered`, `AccountBlocked`, `AccountDeleted`
    /// - `RateLimited`: within the cooldown since the last send
    /// - `QuotaExceeded`: daily quota used up
    async fn send_code(&self, country_code: &str, phone_no: &str) -> AuthResult<SendCodeOutcome>;

    /// Consumes a code and opens a session.
    ///
    /// # Errors
    /// - `OtpNotFound`, `OtpExpired`, `InvalidOtp`, `AttemptsExhausted`
    fn verify_code(&self, country_code: &str, phone_no: &str, code: &str) -> AuthResult<Session>;

    /// Resolves a bearer token to the live identity.
    fn verify_token(&self, token: &str) -> AuthResult<LoginIdentity>;

    /// Re-issues a token. Expiry of the old token is ignored, its signature is not.
    fn refresh_token(&self, token: &str) -> AuthResult<RefreshedToken>;
}
