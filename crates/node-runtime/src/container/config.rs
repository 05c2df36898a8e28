//! # Node Configuration
//!
//! Unified configuration for all subsystems and runtime parameters.
//!
//! ## Security Requirements
//!
//! - the token secret MUST NOT be the built-in default in production
//! - All timeouts and limits have sane defaults with override capability
//!
//! ## Environment Variables
//!
//! | Variable | Section |
//! |----------|---------|
//! | `SC_HOST`, `SC_PORT`, `SC_REQUEST_TIMEOUT_SECS`, `SC_CORS_ORIGINS` | server |
//! | `SC_TOKEN_SECRET`, `SC_TOKEN_TTL_SECS` | security |
//! | `SC_OTP_TTL_SECS`, `SC_OTP_MAX_ATTEMPTS`, `SC_OTP_COOLDOWN_SECS`, `SC_OTP_DAILY_QUOTA` | otp |
//! | `SC_REWARD_THRESHOLD_KG`, `SC_REWARD_RATE_BPS` | rewards |
//! | `SC_ADMIN_PHONE`, `SC_ADMIN_COUNTRY_CODE`, `SC_ADMIN_NAME` | bootstrap |
//! | `SC_PURGE_INTERVAL_SECS` | maintenance |
//! | `SC_ENV` (`production` enforces [`NodeConfig::validate_for_production`]) | node |

use std::env;
use std::str::FromStr;
use std::time::Duration;

use sc_02_otp_auth::{OtpConfig, TokenConfig};
use sc_04_rewards::RewardConfig;
use sc_05_api_gateway::GatewayConfig;
use shared_types::{PhoneKey, PhoneNumber};

/// Complete node configuration.
#[derive(Debug, Clone, Default)]
pub struct NodeConfig {
    /// HTTP gateway configuration.
    pub server: GatewayConfig,
    /// Session token configuration.
    pub security: TokenConfig,
    /// OTP issuance and rate limiting.
    pub otp: OtpConfig,
    /// Reward tiers.
    pub rewards: RewardConfig,
    /// Super admin seeded at startup.
    pub bootstrap: BootstrapConfig,
    /// Background maintenance.
    pub maintenance: MaintenanceConfig,
    /// Refuse to start with development defaults.
    pub production: bool,
}

impl NodeConfig {
    /// Load configuration from `SC_*` environment variables on top of the
    /// defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`NodeConfig::from_env`] with an injectable source.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        override_parsed(&get, "SC_HOST", &mut config.server.host)?;
        override_parsed(&get, "SC_PORT", &mut config.server.port)?;
        override_parsed(
            &get,
            "SC_REQUEST_TIMEOUT_SECS",
            &mut config.server.request_timeout_secs,
        )?;
        if let Some(origins) = get("SC_CORS_ORIGINS") {
            config.server.cors.allowed_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from)
                .collect();
        }

        if let Some(secret) = get("SC_TOKEN_SECRET") {
            config.security.secret = secret;
        }
        override_parsed(&get, "SC_TOKEN_TTL_SECS", &mut config.security.ttl_secs)?;

        override_parsed(&get, "SC_OTP_TTL_SECS", &mut config.otp.code_ttl_secs)?;
        override_parsed(&get, "SC_OTP_MAX_ATTEMPTS", &mut config.otp.max_attempts)?;
        override_parsed(&get, "SC_OTP_COOLDOWN_SECS", &mut config.otp.cooldown_secs)?;
        override_parsed(&get, "SC_OTP_DAILY_QUOTA", &mut config.otp.daily_quota)?;

        override_parsed(
            &get,
            "SC_REWARD_THRESHOLD_KG",
            &mut config.rewards.threshold_kg,
        )?;
        override_parsed(&get, "SC_REWARD_RATE_BPS", &mut config.rewards.rate_bps)?;

        if let Some(phone) = get("SC_ADMIN_PHONE") {
            config.bootstrap.phone_no = phone;
        }
        if let Some(cc) = get("SC_ADMIN_COUNTRY_CODE") {
            config.bootstrap.country_code = cc;
        }
        if let Some(name) = get("SC_ADMIN_NAME") {
            config.bootstrap.name = name;
        }

        override_parsed(
            &get,
            "SC_PURGE_INTERVAL_SECS",
            &mut config.maintenance.purge_interval_secs,
        )?;

        config.production = get("SC_ENV")
            .map(|v| matches!(v.trim().to_lowercase().as_str(), "production" | "prod"))
            .unwrap_or(false);

        config.validate()?;
        Ok(config)
    }

    /// Structural checks that apply in every environment.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        if self.security.secret.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "SC_TOKEN_SECRET",
                value: String::new(),
            });
        }
        if self.security.ttl_secs == 0 {
            return Err(ConfigError::zero("SC_TOKEN_TTL_SECS"));
        }
        if self.otp.max_attempts == 0 {
            return Err(ConfigError::zero("SC_OTP_MAX_ATTEMPTS"));
        }
        if self.otp.code_ttl_secs == 0 {
            return Err(ConfigError::zero("SC_OTP_TTL_SECS"));
        }
        if self.rewards.threshold_kg == 0 {
            return Err(ConfigError::zero("SC_REWARD_THRESHOLD_KG"));
        }
        if self.maintenance.purge_interval_secs == 0 {
            return Err(ConfigError::zero("SC_PURGE_INTERVAL_SECS"));
        }
        self.bootstrap.phone()?;
        Ok(())
    }

    /// Validate configuration for production readiness.
    ///
    /// # Returns
    ///
    /// Returns `Err` if:
    /// - the token secret is the built-in development default
    pub fn validate_for_production(&self) -> Result<(), ConfigError> {
        if self.security.uses_default_secret() {
            return Err(ConfigError::InsecureTokenSecret);
        }
        Ok(())
    }
}

fn override_parsed<T: FromStr>(
    get: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    slot: &mut T,
) -> Result<(), ConfigError> {
    if let Some(raw) = get(key) {
        *slot = raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value: raw })?;
    }
    Ok(())
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Token secret is the development default.
    #[error(
        "SECURITY VIOLATION: token secret is the development default. \
         Set SC_TOKEN_SECRET environment variable."
    )]
    InsecureTokenSecret,

    /// A variable could not be parsed or is out of range.
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    /// Gateway section rejected.
    #[error("server configuration: {0}")]
    Server(#[from] sc_05_api_gateway::ConfigError),

    /// Bootstrap phone number is malformed.
    #[error("invalid bootstrap admin phone: {0}")]
    BootstrapPhone(String),
}

impl ConfigError {
    fn zero(key: &'static str) -> Self {
        Self::InvalidValue {
            key,
            value: "0".to_string(),
        }
    }
}

/// Super admin ensured on every start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapConfig {
    pub phone_no: String,
    pub country_code: String,
    pub name: String,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            phone_no: "9999999999".to_string(),
            country_code: "91".to_string(),
            name: "Super Admin".to_string(),
        }
    }
}

impl BootstrapConfig {
    /// Validated phone number; the country code is checked alongside.
    pub fn phone(&self) -> Result<PhoneNumber, ConfigError> {
        PhoneKey::parse(&self.country_code, &self.phone_no)
            .map(|(_, phone)| phone)
            .map_err(|e| ConfigError::BootstrapPhone(e.to_string()))
    }
}

/// Background maintenance configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaintenanceConfig {
    /// Interval between expired OTP/rate-limit sweeps and ledger audits.
    pub purge_interval_secs: u64,
}

impl Default for MaintenanceConfig {
    fn default() -> Self {
        Self {
            purge_interval_secs: 60,
        }
    }
}

impl MaintenanceConfig {
    pub fn purge_interval(&self) -> Duration {
        Duration::from_secs(self.purge_interval_secs)
    }
}
