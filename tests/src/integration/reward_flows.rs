//! # Reward Flows
//!
//! Sales recorded by the Stock Ledger (3) feed the Reward engine (4), which
//! pays claims back into the ledger's reward-eligible accounts.

#[cfg(test)]
mod tests {
    use super::super::fixtures::{Hierarchy, Node};
    use sc_01_identity::IdentityApi;
    use sc_03_stock_ledger::{SaleRequest, StockLedgerApi};
    use sc_04_rewards::{LoyaltyTier, RewardApi, RewardError};
    use shared_types::{Period, Quantity, Role, TimeSource, UserStatus, DAY_MS, HOUR_MS};

    fn sell(node: &Node, h: &Hierarchy, kg: u64) {
        node.ledger()
            .sell(
                h.dealer.id,
                SaleRequest {
                    barbender_id: h.barbender.id,
                    product_id: node.product,
                    quantity: Quantity::from_kg(kg),
                    notes: None,
                },
            )
            .unwrap();
    }

    #[tokio::test]
    async fn test_both_sides_of_a_sale_earn() {
        let node = Node::start().await;
        let h = node.hierarchy().await;
        node.stock_dealer(&h, 400);
        sell(&node, &h, 250);
        let rewards = node.container.rewards.as_ref();

        for user in [h.dealer.id, h.barbender.id] {
            let summary = rewards.summary(user, None).unwrap();
            assert_eq!(summary.period, Period::month_of(node.clock.now()));
            assert_eq!(summary.calc.total_kg, Quantity::from_kg(250));
            assert_eq!(summary.calc.eligible_kg, Quantity::from_kg(200));
            assert_eq!(summary.calc.claimable_reward_kg, Quantity::from_kg(10));
            assert_eq!(summary.current_balance, Quantity::from_kg(250));

            let claim = rewards.claim(user, None).unwrap();
            assert_eq!(claim.reward_kg, Quantity::from_kg(10));
            assert_eq!(claim.message, "Reward of 10kg claimed!");
            assert_eq!(claim.new_balance, Quantity::from_kg(260));
            assert_eq!(
                node.ledger().balances(user).reward_eligible_qty,
                Quantity::from_kg(260)
            );
        }
        assert!(node.ledger().verify_integrity().is_consistent());
    }

    #[tokio::test]
    async fn test_claims_are_incremental() {
        let node = Node::start().await;
        let h = node.hierarchy().await;
        node.stock_dealer(&h, 1_000);
        let rewards = node.container.rewards.as_ref();

        sell(&node, &h, 250);
        rewards.claim(h.dealer.id, None).unwrap();
        assert_eq!(
            rewards.claim(h.dealer.id, None).unwrap_err(),
            RewardError::NothingToClaim
        );

        // 310 kg: 300 eligible, 200 already covered
        node.clock.advance(HOUR_MS);
        sell(&node, &h, 60);
        let summary = rewards.summary(h.dealer.id, None).unwrap();
        assert_eq!(summary.calc.already_claimed_eligible_kg, Quantity::from_kg(200));
        assert_eq!(summary.calc.claimable_eligible_kg, Quantity::from_kg(100));

        let claim = rewards.claim(h.dealer.id, None).unwrap();
        assert_eq!(claim.reward_kg, Quantity::from_kg(5));
        assert_eq!(claim.reward.newly_covered_kg, Quantity::from_kg(100));
        assert_eq!(claim.new_balance, Quantity::from_kg(325));

        let history = rewards.history(h.dealer.id).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].reward_kg, Quantity::from_kg(5));
    }

    #[tokio::test]
    async fn test_new_month_starts_from_zero() {
        let node = Node::start().await;
        let h = node.hierarchy().await;
        node.stock_dealer(&h, 500);
        sell(&node, &h, 450);
        let rewards = node.container.rewards.as_ref();
        let january = Period::month_of(node.clock.now());

        node.clock.advance(25 * DAY_MS);
        let summary = rewards.summary(h.dealer.id, None).unwrap();
        assert_ne!(summary.period, january);
        assert!(summary.calc.total_kg.is_zero());
        assert_eq!(
            rewards.claim(h.dealer.id, None).unwrap_err(),
            RewardError::NothingToClaim
        );

        // last month can still be claimed explicitly
        let claim = rewards.claim(h.dealer.id, Some(january)).unwrap();
        assert_eq!(claim.reward_kg, Quantity::from_kg(20));
        assert_eq!(claim.reward.period, january);
    }

    #[tokio::test]
    async fn test_loyalty_tier_follows_balance() {
        let node = Node::start().await;
        let h = node.hierarchy().await;
        node.stock_dealer(&h, 1_200);
        let rewards = node.container.rewards.as_ref();

        sell(&node, &h, 100);
        assert_eq!(rewards.summary(h.dealer.id, None).unwrap().tier, LoyaltyTier::Bronze);
        sell(&node, &h, 500);
        assert_eq!(rewards.summary(h.dealer.id, None).unwrap().tier, LoyaltyTier::Silver);
        sell(&node, &h, 400);
        assert_eq!(rewards.summary(h.dealer.id, None).unwrap().tier, LoyaltyTier::Gold);
    }

    #[tokio::test]
    async fn test_ineligible_and_inactive_users() {
        let node = Node::start().await;
        let h = node.hierarchy().await;
        node.stock_dealer(&h, 300);
        sell(&node, &h, 200);
        let rewards = node.container.rewards.as_ref();

        assert_eq!(
            rewards.summary(h.aso.id, None).unwrap_err(),
            RewardError::NotEligible(Role::Aso)
        );

        node.identity()
            .set_status(&node.principal(h.dealer.id), h.barbender.id, UserStatus::Blocked)
            .unwrap();
        // blocked users can look, not claim
        assert!(rewards.summary(h.barbender.id, None).is_ok());
        assert_eq!(
            rewards.claim(h.barbender.id, None).unwrap_err(),
            RewardError::AccountInactive(UserStatus::Blocked)
        );
    }
}
