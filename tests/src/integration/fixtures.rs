//! Shared test fixtures: a fully wired node on a mock clock.

use std::sync::Arc;

use node_runtime::{NodeConfig, SubsystemContainer};
use sc_01_identity::{IdentityApi, NewUser, User};
use sc_02_otp_auth::{AuthResult, OtpAuthApi, RecordingSmsSender, Session};
use sc_03_stock_ledger::{DispatchRequest, ProductFilter, StockLedgerApi};
use shared_types::{
    MockTimeSource, PhoneKey, PhoneNumber, Principal, ProductId, Quantity, Role, UserId, DAY_MS,
    DAY_NUMBER_EPOCH_MS,
};

pub const ADMIN_PHONE: &str = "9999999999";

/// 2026-01-11 00:00 UTC, day 11 of the business calendar.
pub const START_MS: u64 = DAY_NUMBER_EPOCH_MS + 10 * DAY_MS;

pub struct Node {
    pub container: Arc<SubsystemContainer>,
    pub sms: Arc<RecordingSmsSender>,
    pub clock: Arc<MockTimeSource>,
    pub admin: UserId,
    /// First sample product, seeded at start.
    pub product: ProductId,
}

/// ASO → Dealer → Barbender, all active, dealer mapped to the ASO.
pub struct Hierarchy {
    pub aso: User,
    pub dealer: User,
    pub barbender: User,
}

impl Node {
    pub async fn start() -> Self {
        Self::with_config(NodeConfig::default()).await
    }

    pub async fn with_config(config: NodeConfig) -> Self {
        let clock = Arc::new(MockTimeSource::new(START_MS));
        let sms = Arc::new(RecordingSmsSender::new());
        let container = Arc::new(SubsystemContainer::with_parts(
            config,
            clock.clone(),
            sms.clone(),
        ));
        let admin = container.seed_super_admin().unwrap().id;
        let mut node = Self {
            container,
            sms,
            clock,
            admin,
            product: ProductId::new(),
        };
        node.login(ADMIN_PHONE).await.unwrap();
        node.ledger().seed_sample_products(admin).unwrap();
        node.product = node
            .ledger()
            .list_products(ProductFilter::default())
            .first()
            .map(|p| p.id)
            .unwrap();
        node
    }

    pub fn identity(&self) -> &dyn IdentityApi {
        self.container.identity.as_ref()
    }

    pub fn auth(&self) -> &dyn OtpAuthApi {
        self.container.auth.as_ref()
    }

    pub fn ledger(&self) -> &dyn StockLedgerApi {
        self.container.ledger.as_ref()
    }

    pub fn principal(&self, id: UserId) -> Principal {
        self.identity().principal(id).unwrap()
    }

    /// Last code texted to `phone` (country code 91).
    pub fn last_code(&self, phone: &str) -> Option<String> {
        self.sms
            .last_code(&PhoneKey::new("91", &PhoneNumber::parse(phone).unwrap()))
    }

    /// Full OTP round trip: request a code, read it off the SMS sender, verify.
    pub async fn login(&self, phone: &str) -> AuthResult<Session> {
        self.auth().send_code("91", phone).await?;
        let code = self.last_code(phone).unwrap();
        self.auth().verify_code("91", phone, &code)
    }

    pub fn provision(&self, by: UserId, phone: &str, role: Role) -> User {
        self.identity()
            .provision_user(
                &self.principal(by),
                &NewUser {
                    phone_no: phone.to_string(),
                    country_code: None,
                    name: format!("{} {}", role.display_name(), &phone[phone.len() - 2..]),
                    email: None,
                    role,
                },
            )
            .unwrap()
    }

    /// Provision, then log in once so the account is ACTIVE.
    pub async fn active_user(&self, by: UserId, phone: &str, role: Role) -> User {
        let user = self.provision(by, phone, role);
        self.login(phone).await.unwrap();
        self.identity().get_user(user.id).unwrap()
    }

    pub async fn hierarchy(&self) -> Hierarchy {
        let aso = self.active_user(self.admin, "9100000001", Role::Aso).await;
        let dealer = self.active_user(self.admin, "9100000002", Role::Dealer).await;
        self.identity()
            .map_dealer_to_aso(&self.principal(self.admin), aso.id, dealer.id)
            .unwrap();
        let barbender = self
            .active_user(dealer.id, "9100000003", Role::Barbender)
            .await;
        Hierarchy {
            aso: self.identity().get_user(aso.id).unwrap(),
            dealer: self.identity().get_user(dealer.id).unwrap(),
            barbender,
        }
    }

    /// Dispatch `kg` from the ASO and receive it at the dealer.
    pub fn stock_dealer(&self, h: &Hierarchy, kg: u64) {
        let dispatch = self
            .ledger()
            .dispatch(
                h.aso.id,
                DispatchRequest {
                    dealer_id: h.dealer.id,
                    product_id: self.product,
                    quantity: Quantity::from_kg(kg),
                    notes: None,
                },
            )
            .unwrap();
        self.ledger().receive(h.dealer.id, dispatch.id).unwrap();
    }
}
