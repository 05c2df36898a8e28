//! # Stock Movement Flows
//!
//! ASO dispatch → dealer receipt → sale to barbender, with the double-entry
//! ledger, the daily stock rows and the identity hierarchy checked together.

#[cfg(test)]
mod tests {
    use super::super::fixtures::{Hierarchy, Node};
    use proptest::prelude::*;
    use sc_01_identity::IdentityApi;
    use sc_03_stock_ledger::{
        DispatchFilter, DispatchRequest, DispatchStatus, DispatchView, LedgerError,
        PurchaseRequest, SaleRequest, SaleView, StockLedgerApi,
    };
    use shared_types::{ErrorKind, Quantity, Role, UserStatus, DAY_MS, HOUR_MS};

    fn sale(h: &Hierarchy, node: &Node, kg: u64) -> SaleRequest {
        SaleRequest {
            barbender_id: h.barbender.id,
            product_id: node.product,
            quantity: Quantity::from_kg(kg),
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_dispatch_receive_once() {
        let node = Node::start().await;
        let h = node.hierarchy().await;

        let dispatch = node
            .ledger()
            .dispatch(
                h.aso.id,
                DispatchRequest {
                    dealer_id: h.dealer.id,
                    product_id: node.product,
                    quantity: Quantity::from_kg(500),
                    notes: Some("truck 7".into()),
                },
            )
            .unwrap();
        assert_eq!(dispatch.status, DispatchStatus::Pending);
        // nothing moves until the dealer confirms
        assert!(node.ledger().balances(h.dealer.id).available_qty.is_zero());

        let outcome = node.ledger().receive(h.dealer.id, dispatch.id).unwrap();
        assert_eq!(outcome.dispatch.status, DispatchStatus::Received);
        assert_eq!(outcome.new_balance, Quantity::from_kg(500));
        assert_eq!(outcome.daily_stock.total_received, Quantity::from_kg(500));
        assert_eq!(outcome.daily_stock.closing_balance, Quantity::from_kg(500));

        let err = node.ledger().receive(h.dealer.id, dispatch.id).unwrap_err();
        assert_eq!(
            err,
            LedgerError::AlreadyProcessed {
                id: dispatch.id,
                status: DispatchStatus::Received
            }
        );
        assert_eq!(node.ledger().balances(h.dealer.id).available_qty, Quantity::from_kg(500));

        let history = node
            .ledger()
            .dispatches(DispatchView::Aso(h.aso.id), DispatchFilter::default());
        assert_eq!(history.dispatches.len(), 1);
        assert_eq!(history.total_received, Quantity::from_kg(500));
    }

    #[tokio::test]
    async fn test_cancelled_dispatch_cannot_be_received() {
        let node = Node::start().await;
        let h = node.hierarchy().await;
        let dispatch = node
            .ledger()
            .dispatch(
                h.aso.id,
                DispatchRequest {
                    dealer_id: h.dealer.id,
                    product_id: node.product,
                    quantity: Quantity::from_kg(40),
                    notes: None,
                },
            )
            .unwrap();

        let cancelled = node.ledger().cancel_dispatch(h.aso.id, dispatch.id).unwrap();
        assert_eq!(cancelled.status, DispatchStatus::Cancelled);
        assert!(cancelled.cancelled_at.is_some());

        let err = node.ledger().receive(h.dealer.id, dispatch.id).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyProcessed);
        assert!(node.ledger().balances(h.dealer.id).available_qty.is_zero());

        let pending = node.ledger().dispatches(
            DispatchView::Dealer(h.dealer.id),
            DispatchFilter {
                status: Some(DispatchStatus::Pending),
            },
        );
        assert!(pending.dispatches.is_empty());
    }

    #[tokio::test]
    async fn test_only_dispatching_aso_or_admin_cancels() {
        let node = Node::start().await;
        let h = node.hierarchy().await;
        let rival = node.active_user(node.admin, "9400000005", Role::Aso).await;
        let dispatch = node
            .ledger()
            .dispatch(
                h.aso.id,
                DispatchRequest {
                    dealer_id: h.dealer.id,
                    product_id: node.product,
                    quantity: Quantity::from_kg(25),
                    notes: None,
                },
            )
            .unwrap();

        for actor in [rival.id, h.dealer.id] {
            let err = node.ledger().cancel_dispatch(actor, dispatch.id).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::NotAuthorized);
        }
        assert_eq!(
            node.ledger().get_dispatch(dispatch.id).unwrap().status,
            DispatchStatus::Pending
        );

        let cancelled = node.ledger().cancel_dispatch(node.admin, dispatch.id).unwrap();
        assert_eq!(cancelled.status, DispatchStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_other_dealer_cannot_receive() {
        let node = Node::start().await;
        let h = node.hierarchy().await;
        let intruder = node.active_user(node.admin, "9400000001", Role::Dealer).await;
        let dispatch = node
            .ledger()
            .dispatch(
                h.aso.id,
                DispatchRequest {
                    dealer_id: h.dealer.id,
                    product_id: node.product,
                    quantity: Quantity::from_kg(10),
                    notes: None,
                },
            )
            .unwrap();

        let err = node.ledger().receive(intruder.id, dispatch.id).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotAuthorized);
    }

    #[tokio::test]
    async fn test_sale_moves_stock_and_rejects_oversell() {
        let node = Node::start().await;
        let h = node.hierarchy().await;
        node.stock_dealer(&h, 300);

        let outcome = node.ledger().sell(h.dealer.id, sale(&h, &node, 120)).unwrap();
        assert_eq!(outcome.dealer_balance.available_qty, Quantity::from_kg(180));
        assert_eq!(outcome.dealer_balance.reward_eligible_qty, Quantity::from_kg(120));
        assert_eq!(outcome.barbender_balance.available_qty, Quantity::from_kg(120));
        assert_eq!(outcome.barbender_balance.reward_eligible_qty, Quantity::from_kg(120));

        let err = node.ledger().sell(h.dealer.id, sale(&h, &node, 181)).unwrap_err();
        assert_eq!(
            err,
            LedgerError::InsufficientStock {
                available: Quantity::from_kg(180),
                requested: Quantity::from_kg(181),
            }
        );

        let err = node.ledger().sell(h.dealer.id, sale(&h, &node, 0)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationError);

        let sales = node.ledger().sales(SaleView::Barbender(h.barbender.id));
        assert_eq!(sales.sales.len(), 1);
        assert_eq!(sales.total, Quantity::from_kg(120));
        assert!(node.ledger().verify_integrity().is_consistent());
    }

    #[tokio::test]
    async fn test_cannot_sell_to_another_dealers_barbender() {
        let node = Node::start().await;
        let h = node.hierarchy().await;
        node.stock_dealer(&h, 50);
        let rival = node.active_user(node.admin, "9400000002", Role::Dealer).await;
        let stranger = node.provision(rival.id, "9400000003", Role::Barbender);

        let mut request = sale(&h, &node, 10);
        request.barbender_id = stranger.id;
        let err = node.ledger().sell(h.dealer.id, request).unwrap_err();
        assert_eq!(
            err,
            LedgerError::NotOwned {
                barbender: stranger.id,
                dealer: h.dealer.id
            }
        );
        assert_eq!(err.kind(), ErrorKind::NotAuthorized);
    }

    #[tokio::test]
    async fn test_blocked_barbender_cannot_buy_but_pending_can() {
        let node = Node::start().await;
        let h = node.hierarchy().await;
        node.stock_dealer(&h, 50);
        let dealer = node.principal(h.dealer.id);

        let fresh = node.provision(h.dealer.id, "9400000004", Role::Barbender);
        let mut request = sale(&h, &node, 5);
        request.barbender_id = fresh.id;
        assert!(node.ledger().sell(h.dealer.id, request).is_ok());

        node.identity()
            .set_status(&dealer, h.barbender.id, UserStatus::Blocked)
            .unwrap();
        let err = node.ledger().sell(h.dealer.id, sale(&h, &node, 5)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AccountBlocked);
    }

    #[tokio::test]
    async fn test_daily_rows_carry_closing_balance_forward() {
        let node = Node::start().await;
        let h = node.hierarchy().await;

        node.stock_dealer(&h, 200);
        node.ledger().sell(h.dealer.id, sale(&h, &node, 70)).unwrap();
        let day_one = node.ledger().daily_report(h.dealer.id);
        assert_eq!(day_one.daily_stock.opening_balance, Quantity::ZERO);
        assert_eq!(day_one.daily_stock.total_received, Quantity::from_kg(200));
        assert_eq!(day_one.daily_stock.total_dispatched, Quantity::from_kg(70));
        assert_eq!(day_one.daily_stock.closing_balance, Quantity::from_kg(130));

        // a quiet day in between, then more stock
        node.clock.advance(2 * DAY_MS + HOUR_MS);
        let quiet = node.ledger().daily_report(h.dealer.id);
        assert_eq!(quiet.daily_stock.opening_balance, Quantity::from_kg(130));
        assert_eq!(quiet.history.len(), 1);

        node.stock_dealer(&h, 20);
        let day_three = node.ledger().daily_report(h.dealer.id);
        assert_eq!(day_three.daily_stock.opening_balance, Quantity::from_kg(130));
        assert_eq!(day_three.daily_stock.closing_balance, Quantity::from_kg(150));
        assert_eq!(day_three.current_balance, Quantity::from_kg(150));
        assert_eq!(day_three.history.len(), 2);
        assert_eq!(day_three.daily_stock.sequential_day - day_one.daily_stock.sequential_day, 2);

        let received = node.ledger().received_summary(h.dealer.id);
        assert_eq!(received.len(), 2);
        assert_eq!(received[0].total_received, Quantity::from_kg(20));
    }

    #[tokio::test]
    async fn test_outside_purchase_counts_for_barbender() {
        let node = Node::start().await;
        let h = node.hierarchy().await;

        let outcome = node
            .ledger()
            .record_purchase(
                h.barbender.id,
                PurchaseRequest {
                    source_name: "  Local Yard ".into(),
                    location: Some("Pune".into()),
                    product_id: None,
                    quantity: Quantity::from_kg(35),
                    notes: None,
                },
            )
            .unwrap();
        assert_eq!(outcome.purchase.source_name, "Local Yard");
        assert_eq!(outcome.balances.reward_eligible_qty, Quantity::from_kg(35));

        let history = node.ledger().purchases_of(h.barbender.id);
        assert_eq!(history.total, Quantity::from_kg(35));
        assert_eq!(history.purchases.len(), 1);
        // the dealer's books are untouched
        assert!(node.ledger().balances(h.dealer.id).available_qty.is_zero());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        /// Whatever mix of sales is attempted, received stock is either still
        /// on the dealer's shelf or in a recorded sale.
        #[test]
        fn prop_stock_is_conserved(received in 1u64..500, attempts in prop::collection::vec(1u64..200, 1..12)) {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            rt.block_on(async {
                let node = Node::start().await;
                let h = node.hierarchy().await;
                node.stock_dealer(&h, received);

                for kg in attempts {
                    let _ = node.ledger().sell(h.dealer.id, sale(&h, &node, kg));
                }

                let on_shelf = node.ledger().balances(h.dealer.id).available_qty;
                let sold = node.ledger().sales(SaleView::Dealer(h.dealer.id)).total;
                prop_assert_eq!(on_shelf.grams() + sold.grams(), Quantity::from_kg(received).grams());
                prop_assert_eq!(node.ledger().daily_report(h.dealer.id).daily_stock.closing_balance, on_shelf);
                prop_assert!(node.ledger().verify_integrity().is_consistent());
                Ok(())
            })?;
        }
    }
}
