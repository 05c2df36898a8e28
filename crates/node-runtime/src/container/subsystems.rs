//! # Subsystem Container
//!
//! Holds all subsystem instances and wires them together.
//!
//! ## Initialization Order
//!
//! Subsystems are initialized in dependency order:
//!
//! ```text
//! Level 0: Identity (no dependencies)
//! Level 1: OTP Auth, Stock Ledger (read identity through adapters)
//! Level 2: Rewards (reads identity and the stock ledger)
//! Level 3: API Gateway state (handles to all of the above)
//! ```
//!
//! ## Thread Safety
//!
//! - All subsystems wrapped in `Arc` for shared ownership
//! - Each service guards its own state; no lock spans two subsystems

use std::sync::Arc;

use tracing::{info, instrument};

use sc_01_identity::{IdentityError, IdentityService, User};
use sc_02_otp_auth::{LoggingSmsSender, OtpAuthService, PurgeReport, SmsSender};
use sc_03_stock_ledger::{IntegrityReport, StockLedgerApi, StockLedgerService};
use sc_04_rewards::RewardService;
use sc_05_api_gateway::AppState;
use shared_types::{SystemTimeSource, TimeSource};

use crate::adapters::{
    BeneficiaryDirectoryAdapter, LoginDirectoryAdapter, PartyDirectoryAdapter,
    RewardAccountsAdapter,
};
use crate::container::config::{ConfigError, NodeConfig};

/// Errors raised while seeding the node.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("super admin seeding failed: {0}")]
    Identity(#[from] IdentityError),
}

/// Outcome of one maintenance pass.
#[derive(Debug, Clone)]
pub struct MaintenanceReport {
    pub purged: PurgeReport,
    pub integrity: IntegrityReport,
}

/// Central container holding all subsystem instances.
///
/// This is the main integration point where all subsystems are wired together
/// with the adapters implementing their outbound ports.
pub struct SubsystemContainer {
    /// Identity & mapping registry (Subsystem 1)
    pub identity: Arc<IdentityService>,

    /// OTP login and session tokens (Subsystem 2)
    pub auth: Arc<OtpAuthService>,

    /// Stock ledger and product catalog (Subsystem 3)
    pub ledger: Arc<StockLedgerService>,

    /// Reward engine (Subsystem 4)
    pub rewards: Arc<RewardService>,

    /// Node configuration (immutable after initialization).
    pub config: NodeConfig,
}

impl SubsystemContainer {
    /// Create a container on the wall clock with the logging SMS sender.
    pub fn new(config: NodeConfig) -> Self {
        Self::with_parts(config, Arc::new(SystemTimeSource), Arc::new(LoggingSmsSender))
    }

    /// Create a container with an explicit clock and SMS sender.
    #[instrument(name = "subsystem_init", skip_all)]
    pub fn with_parts(
        config: NodeConfig,
        clock: Arc<dyn TimeSource>,
        sms: Arc<dyn SmsSender>,
    ) -> Self {
        info!("Initializing Steel-Chain subsystem container");

        // Level 0
        let identity = Arc::new(IdentityService::new(clock.clone()));
        info!("  [1] Identity initialized");

        // Level 1
        let auth = Arc::new(OtpAuthService::new(
            config.otp.clone(),
            &config.security,
            Arc::new(LoginDirectoryAdapter::new(identity.clone())),
            sms,
            clock.clone(),
        ));
        info!(
            "  [2] OTP Auth initialized (ttl={}s, max_attempts={}, cooldown={}s, quota={})",
            config.otp.code_ttl_secs,
            config.otp.max_attempts,
            config.otp.cooldown_secs,
            config.otp.daily_quota
        );

        let ledger = Arc::new(StockLedgerService::new(
            Arc::new(PartyDirectoryAdapter::new(identity.clone())),
            clock.clone(),
        ));
        info!("  [3] Stock Ledger initialized");

        // Level 2
        let rewards = Arc::new(RewardService::new(
            config.rewards,
            Arc::new(BeneficiaryDirectoryAdapter::new(identity.clone())),
            Arc::new(RewardAccountsAdapter::new(ledger.clone())),
            clock,
        ));
        info!(
            "  [4] Rewards initialized (threshold={}kg, rate={}bps)",
            config.rewards.threshold_kg,
            config.rewards.rate_bps
        );

        info!("All subsystems initialized successfully");

        Self {
            identity,
            auth,
            ledger,
            rewards,
            config,
        }
    }

    /// Ensure the configured super admin exists.
    pub fn seed_super_admin(&self) -> Result<User, SeedError> {
        let bootstrap = &self.config.bootstrap;
        let phone = bootstrap.phone()?;
        let admin =
            self.identity
                .bootstrap_super_admin(phone, &bootstrap.country_code, &bootstrap.name)?;
        Ok(admin)
    }

    /// Handles for the HTTP gateway.
    pub fn app_state(&self) -> AppState {
        AppState {
            identity: self.identity.clone(),
            auth: self.auth.clone(),
            ledger: self.ledger.clone(),
            rewards: self.rewards.clone(),
        }
    }

    /// Drop expired OTP and rate-limit records, then replay the ledger.
    pub fn run_maintenance(&self) -> MaintenanceReport {
        MaintenanceReport {
            purged: self.auth.purge_expired(),
            integrity: self.ledger.verify_integrity(),
        }
    }
}
