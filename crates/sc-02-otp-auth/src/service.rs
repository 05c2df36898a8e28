//! OTP Auth Service - send/verify codes, issue/verify/refresh tokens

use crate::adapters::{MemoryOtpStore, MemoryRateLimitStore};
use crate::domain::{
    admit, apply_attempt, generate_code, AuthError, AuthResult, LoginIdentity, OtpConfig,
    OtpRecord, RefreshedToken, SendCodeOutcome, Session, SmsStatus, TokenConfig, TokenSigner,
};
use crate::ports::{IdentityDirectory, OtpAuthApi, OtpStore, RateLimitStore, SmsSender};
use async_trait::async_trait;
use shared_types::{PhoneKey, Timestamp, TimeSource, UserStatus, ValidationError};
use std::sync::Arc;

pub struct OtpAuthService {
    config: OtpConfig,
    signer: TokenSigner,
    directory: Arc<dyn IdentityDirectory>,
    sms: Arc<dyn SmsSender>,
    otp_store: Arc<dyn OtpStore>,
    rate_store: Arc<dyn RateLimitStore>,
    clock: Arc<dyn TimeSource>,
}

/// Counts returned by a purge sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PurgeReport {
    pub otp_records: usize,
    pub rate_records: usize,
}

fn ensure_login_allowed(status: UserStatus) -> AuthResult<()> {
    match status {
        UserStatus::Blocked => Err(AuthError::AccountBlocked),
        UserStatus::Deleted => Err(AuthError::AccountDeleted),
        UserStatus::Pending | UserStatus::Active => Ok(()),
    }
}

impl OtpAuthService {
    /// Service backed by the in-memory stores.
    pub fn new(
        config: OtpConfig,
        token: &TokenConfig,
        directory: Arc<dyn IdentityDirectory>,
        sms: Arc<dyn SmsSender>,
        clock: Arc<dyn TimeSource>,
    ) -> Self {
        Self::with_stores(
            config,
            token,
            directory,
            sms,
            Arc::new(MemoryOtpStore::new()),
            Arc::new(MemoryRateLimitStore::new()),
            clock,
        )
    }

    pub fn with_stores(
        config: OtpConfig,
        token: &TokenConfig,
        directory: Arc<dyn IdentityDirectory>,
        sms: Arc<dyn SmsSender>,
        otp_store: Arc<dyn OtpStore>,
        rate_store: Arc<dyn RateLimitStore>,
        clock: Arc<dyn TimeSource>,
    ) -> Self {
        Self {
            config,
            signer: TokenSigner::new(token),
            directory,
            sms,
            otp_store,
            rate_store,
            clock,
        }
    }

    pub fn config(&self) -> &OtpConfig {
        &self.config
    }

    /// Emulates storage-level TTL expiry.
    pub fn purge_expired(&self) -> PurgeReport {
        let now = self.clock.now();
        PurgeReport {
            otp_records: self.otp_store.purge_expired(now),
            rate_records: self.rate_store.purge_expired(now),
        }
    }

    fn known_identity(&self, country_code: &str, phone_no: &str) -> AuthResult<(PhoneKey, LoginIdentity)> {
        let (key, phone) = PhoneKey::parse(country_code, phone_no)?;
        let identity = self
            .directory
            .lookup(&phone)
            .ok_or(AuthError::NotRegistered)?;
        // The number is only registered under its provisioned country code.
        if key != PhoneKey::new(&identity.country_code, &identity.phone_no) {
            return Err(AuthError::NotRegistered);
        }
        ensure_login_allowed(identity.status)?;
        Ok((key, identity))
    }

    /// Live identity behind a token's subject.
    fn live_subject(&self, token: &str, now: Timestamp, enforce_expiry: bool) -> AuthResult<LoginIdentity> {
        let claims = self.signer.decode(token, now, enforce_expiry)?;
        let identity = self
            .directory
            .resolve(claims.sub)
            .ok_or(AuthError::UserNotFound)?;
        match identity.status {
            UserStatus::Deleted => Err(AuthError::UserNotFound),
            UserStatus::Blocked => Err(AuthError::AccountBlocked),
            UserStatus::Pending | UserStatus::Active => Ok(identity),
        }
    }
}

#[async_trait]
impl OtpAuthApi for OtpAuthService {
    async fn send_code(&self, country_code: &str, phone_no: &str) -> AuthResult<SendCodeOutcome> {
        let (key, identity) = self.known_identity(country_code, phone_no)?;
        let now = self.clock.now();

        // Rate check, code upsert and counter update under the key's lock.
        let mut code = String::new();
        let admitted = self.rate_store.admit_with(&key, &mut |existing| {
            let next = admit(&key, existing, now, &self.config)?;
            code = generate_code(&mut rand::thread_rng());
            self.otp_store.upsert(OtpRecord::new(
                key.clone(),
                code.clone(),
                now,
                self.config.code_ttl_ms(),
            ));
            Ok(next)
        });
        if let Err(err) = &admitted {
            tracing::warn!(subsystem = "otp-auth", phone_key = %key, error = %err, "OTP request rejected");
        }
        let admitted = admitted?;

        let delivered = self.sms.send(&key, &code).await;
        let (sms_status, message) = if delivered {
            (SmsStatus::Sent, "OTP sent successfully")
        } else {
            tracing::warn!(subsystem = "otp-auth", phone_key = %key, "SMS delivery failed, code still valid");
            (SmsStatus::Pending, "OTP generated (SMS delivery pending)")
        };
        tracing::info!(
            subsystem = "otp-auth",
            phone_key = %key,
            daily_count = admitted.daily_request_count,
            sms_status = ?sms_status,
            "OTP issued"
        );

        Ok(SendCodeOutcome {
            message: message.to_string(),
            expires_in: self.config.code_ttl_secs,
            role: identity.role,
            role_name: identity.role.display_name().to_string(),
            sms_status,
        })
    }

    fn verify_code(&self, country_code: &str, phone_no: &str, code: &str) -> AuthResult<Session> {
        let code = code.trim();
        if code.is_empty() {
            return Err(ValidationError::MissingField("otp").into());
        }
        let (key, identity) = self.known_identity(country_code, phone_no)?;
        let now = self.clock.now();

        let mut outcome: AuthResult<()> = Err(AuthError::OtpNotFound);
        let found = self.otp_store.attempt(&key, &mut |record| {
            let (disposition, result) = apply_attempt(record, code, now, self.config.max_attempts);
            outcome = result;
            disposition
        });
        if !found {
            return Err(AuthError::OtpNotFound);
        }
        if let Err(err) = outcome {
            tracing::info!(subsystem = "otp-auth", phone_key = %key, error = %err, "OTP verification failed");
            return Err(err);
        }

        let (user, is_new_user) = self.directory.activate(identity.id)?;
        let issued = self.signer.issue(user.id, now)?;
        tracing::info!(
            subsystem = "otp-auth",
            user_id = %user.id,
            role = %user.role,
            is_new_user,
            "Login succeeded"
        );

        let message = if is_new_user {
            "Account activated and logged in successfully"
        } else {
            "Logged in successfully"
        };
        Ok(Session {
            message: message.to_string(),
            token: issued.token,
            expires_at: issued.expires_at,
            user_id: user.id,
            is_new_user,
            welcome_message: user.role.welcome_message(),
            user,
        })
    }

    fn verify_token(&self, token: &str) -> AuthResult<LoginIdentity> {
        self.live_subject(token, self.clock.now(), true)
    }

    fn refresh_token(&self, token: &str) -> AuthResult<RefreshedToken> {
        let now = self.clock.now();
        let user = self.live_subject(token, now, false)?;
        let issued = self.signer.issue(user.id, now)?;
        tracing::debug!(subsystem = "otp-auth", user_id = %user.id, "Token refreshed");
        Ok(RefreshedToken {
            token: issued.token,
            expires_at: issued.expires_at,
            user,
        })
    }
}
