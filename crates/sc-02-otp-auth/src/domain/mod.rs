//! Domain layer for the OTP and token subsystem

pub mod config;
pub mod errors;
pub mod otp;
pub mod rate_limit;
pub mod session;
pub mod token;

pub use config::{OtpConfig, TokenConfig, DEFAULT_TOKEN_SECRET};
pub use errors::{AuthError, AuthResult};
pub use otp::{apply_attempt, generate_code, Disposition, OtpRecord};
pub use rate_limit::{admit, RateLimitRecord};
pub use session::{LoginIdentity, RefreshedToken, SendCodeOutcome, Session, SmsStatus};
pub use token::{IssuedToken, TokenClaims, TokenSigner};
