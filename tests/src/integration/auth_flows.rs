//! # OTP Login Flows
//!
//! Identity (1) ←→ OTP Auth (2) through the login directory adapter:
//! codes are only issued to provisioned phones, the first successful
//! verification activates a PENDING identity, and every token check reads
//! the live identity record.

#[cfg(test)]
mod tests {
    use super::super::fixtures::{Node, ADMIN_PHONE};
    use node_runtime::NodeConfig;
    use sc_01_identity::IdentityApi;
    use sc_02_otp_auth::AuthError;
    use shared_types::{PhoneKey, Role, UserStatus, DAY_MS, SECOND_MS};

    #[tokio::test]
    async fn test_first_login_activates_pending_user() {
        let node = Node::start().await;
        let dealer = node.provision(node.admin, "9200000001", Role::Dealer);
        assert_eq!(dealer.status, UserStatus::Pending);

        let session = node.login("9200000001").await.unwrap();
        assert!(session.is_new_user);
        assert_eq!(session.user_id, dealer.id);
        assert_eq!(session.welcome_message, "Welcome, Dealer!");

        let stored = node.identity().get_user(dealer.id).unwrap();
        assert_eq!(stored.status, UserStatus::Active);
        assert!(stored.last_otp_validated.is_some());

        // second login is not a new user any more
        node.clock.advance(61 * SECOND_MS);
        let again = node.login("9200000001").await.unwrap();
        assert!(!again.is_new_user);
    }

    #[tokio::test]
    async fn test_unregistered_phone_gets_no_code() {
        let node = Node::start().await;
        let err = node.auth().send_code("91", "9200000099").await.unwrap_err();
        assert_eq!(err, AuthError::NotRegistered);
        assert!(node.last_code("9200000099").is_none());
    }

    #[tokio::test]
    async fn test_phone_is_bound_to_its_country_code() {
        let mut config = NodeConfig::default();
        config.otp.daily_quota = 2;
        let node = Node::with_config(config).await;
        let dealer = node.provision(node.admin, "9200000006", Role::Dealer);
        assert_eq!(dealer.country_code, "91");

        node.auth().send_code("91", "9200000006").await.unwrap();
        node.clock.advance(61 * SECOND_MS);
        node.auth().send_code("91", "9200000006").await.unwrap();
        node.clock.advance(61 * SECOND_MS);
        assert_eq!(
            node.auth().send_code("91", "9200000006").await.unwrap_err(),
            AuthError::QuotaExceeded { limit: 2 }
        );

        // same digits under another country code: no fresh quota, no code
        let err = node.auth().send_code("44", "9200000006").await.unwrap_err();
        assert_eq!(err, AuthError::NotRegistered);
        let (foreign, _) = PhoneKey::parse("44", "9200000006").unwrap();
        assert!(node.sms.last_code(&foreign).is_none());

        let code = node.last_code("9200000006").unwrap();
        let err = node.auth().verify_code("44", "9200000006", &code).unwrap_err();
        assert_eq!(err, AuthError::NotRegistered);
        assert_eq!(
            node.identity().get_user(dealer.id).unwrap().status,
            UserStatus::Pending
        );

        let session = node.auth().verify_code("91", "9200000006", &code).unwrap();
        assert_eq!(session.user_id, dealer.id);
    }

    #[tokio::test]
    async fn test_unblocking_never_logged_in_user_keeps_it_pending() {
        let node = Node::start().await;
        let dealer = node.provision(node.admin, "9200000007", Role::Dealer);
        let admin = node.principal(node.admin);

        node.identity()
            .set_status(&admin, dealer.id, UserStatus::Blocked)
            .unwrap();
        let unblocked = node
            .identity()
            .set_status(&admin, dealer.id, UserStatus::Active)
            .unwrap();
        assert_eq!(unblocked.status, UserStatus::Pending);
        assert!(unblocked.last_otp_validated.is_none());

        let session = node.login("9200000007").await.unwrap();
        assert!(session.is_new_user);
        assert_eq!(
            node.identity().get_user(dealer.id).unwrap().status,
            UserStatus::Active
        );

        // after a real login, unblocking restores ACTIVE
        node.identity()
            .set_status(&admin, dealer.id, UserStatus::Blocked)
            .unwrap();
        let unblocked = node
            .identity()
            .set_status(&admin, dealer.id, UserStatus::Active)
            .unwrap();
        assert_eq!(unblocked.status, UserStatus::Active);
    }

    #[tokio::test]
    async fn test_cooldown_then_daily_quota() {
        let mut config = NodeConfig::default();
        config.otp.daily_quota = 3;
        let node = Node::with_config(config).await;
        node.provision(node.admin, "9200000002", Role::Aso);

        node.auth().send_code("91", "9200000002").await.unwrap();
        node.clock.advance(10 * SECOND_MS);
        let err = node.auth().send_code("91", "9200000002").await.unwrap_err();
        assert_eq!(err, AuthError::RateLimited { wait_secs: 50 });

        node.clock.advance(50 * SECOND_MS);
        node.auth().send_code("91", "9200000002").await.unwrap();
        node.clock.advance(60 * SECOND_MS);
        node.auth().send_code("91", "9200000002").await.unwrap();
        node.clock.advance(60 * SECOND_MS);
        let err = node.auth().send_code("91", "9200000002").await.unwrap_err();
        assert_eq!(err, AuthError::QuotaExceeded { limit: 3 });

        // the window rolls over once it has been idle for a full day
        node.clock.advance(DAY_MS + SECOND_MS);
        node.auth().send_code("91", "9200000002").await.unwrap();
    }

    #[tokio::test]
    async fn test_wrong_codes_exhaust_attempts() {
        let node = Node::start().await;
        node.provision(node.admin, "9200000003", Role::Dealer);
        node.auth().send_code("91", "9200000003").await.unwrap();
        let code = node.last_code("9200000003").unwrap();
        let wrong = if code == "000000" { "111111" } else { "000000" };

        for remaining in (0..5).rev() {
            let err = node.auth().verify_code("91", "9200000003", wrong).unwrap_err();
            assert_eq!(err, AuthError::InvalidOtp { remaining_attempts: remaining });
        }
        let err = node.auth().verify_code("91", "9200000003", wrong).unwrap_err();
        assert_eq!(err, AuthError::AttemptsExhausted);

        // record is gone; even the right code fails now
        let err = node.auth().verify_code("91", "9200000003", &code).unwrap_err();
        assert_eq!(err, AuthError::OtpNotFound);
    }

    #[tokio::test]
    async fn test_expired_code_is_rejected() {
        let node = Node::start().await;
        node.provision(node.admin, "9200000004", Role::Dealer);
        node.auth().send_code("91", "9200000004").await.unwrap();
        let code = node.last_code("9200000004").unwrap();

        node.clock.advance(5 * 60 * SECOND_MS + 1);
        let err = node.auth().verify_code("91", "9200000004", &code).unwrap_err();
        assert!(matches!(err, AuthError::OtpExpired | AuthError::OtpNotFound));
    }

    #[tokio::test]
    async fn test_expired_token_refreshes_but_tampered_does_not() {
        let node = Node::start().await;
        node.clock.advance(61 * SECOND_MS);
        let session = node.login(ADMIN_PHONE).await.unwrap();

        node.clock.advance(8 * DAY_MS);
        assert_eq!(
            node.auth().verify_token(&session.token).unwrap_err(),
            AuthError::TokenExpired
        );

        let refreshed = node.auth().refresh_token(&session.token).unwrap();
        assert_eq!(refreshed.user.id, node.admin);
        assert!(node.auth().verify_token(&refreshed.token).is_ok());

        let mut tampered = session.token.clone();
        let last = tampered.pop().unwrap();
        tampered.push(if last == '0' { '1' } else { '0' });
        assert!(matches!(
            node.auth().refresh_token(&tampered).unwrap_err(),
            AuthError::TokenInvalid(_)
        ));
    }

    #[tokio::test]
    async fn test_status_changes_apply_to_live_tokens() {
        let node = Node::start().await;
        let dealer = node.provision(node.admin, "9200000005", Role::Dealer);
        let session = node.login("9200000005").await.unwrap();
        let admin = node.principal(node.admin);

        node.identity()
            .set_status(&admin, dealer.id, UserStatus::Blocked)
            .unwrap();
        assert_eq!(
            node.auth().verify_token(&session.token).unwrap_err(),
            AuthError::AccountBlocked
        );
        node.clock.advance(61 * SECOND_MS);
        assert_eq!(
            node.auth().send_code("91", "9200000005").await.unwrap_err(),
            AuthError::AccountBlocked
        );

        node.identity()
            .set_status(&admin, dealer.id, UserStatus::Deleted)
            .unwrap();
        assert_eq!(
            node.auth().verify_token(&session.token).unwrap_err(),
            AuthError::UserNotFound
        );
        assert_eq!(
            node.auth().refresh_token(&session.token).unwrap_err(),
            AuthError::UserNotFound
        );
    }
}
