//! # ASO ↔ Dealer Mapping Flows
//!
//! The mapping registry in Identity (1) gates dispatches in the Stock
//! Ledger (3): an ASO may only ship to dealers currently mapped to it.

#[cfg(test)]
mod tests {
    use super::super::fixtures::Node;
    use sc_01_identity::{IdentityApi, IdentityError};
    use sc_03_stock_ledger::{DispatchRequest, LedgerError, StockLedgerApi};
    use shared_types::{Quantity, Role, UserStatus};

    #[tokio::test]
    async fn test_dealer_maps_to_one_aso_at_a_time() {
        let node = Node::start().await;
        let h = node.hierarchy().await;
        let other_aso = node.active_user(node.admin, "9300000001", Role::Aso).await;
        let admin = node.principal(node.admin);

        let err = node
            .identity()
            .map_dealer_to_aso(&admin, other_aso.id, h.dealer.id)
            .unwrap_err();
        assert_eq!(
            err,
            IdentityError::AlreadyMapped {
                dealer: h.dealer.id,
                aso: h.aso.id
            }
        );

        let aso = node.principal(h.aso.id);
        let assigned = node.identity().assigned_dealers(&aso).unwrap();
        assert_eq!(assigned.len(), 1);
        assert_eq!(assigned[0].id, h.dealer.id);
        assert!(node.identity().unmapped_dealers(&admin).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_remap_moves_dispatch_rights() {
        let node = Node::start().await;
        let h = node.hierarchy().await;
        let other_aso = node.active_user(node.admin, "9300000002", Role::Aso).await;
        let admin = node.principal(node.admin);

        let removed = node.identity().unmap_dealer(&admin, h.dealer.id).unwrap();
        assert_eq!(removed.map(|m| m.aso), Some(h.aso.id));
        // second unmap is a no-op
        assert!(node.identity().unmap_dealer(&admin, h.dealer.id).unwrap().is_none());

        node.identity()
            .map_dealer_to_aso(&admin, other_aso.id, h.dealer.id)
            .unwrap();
        assert_eq!(
            node.identity().get_user(h.dealer.id).unwrap().assigned_aso,
            Some(other_aso.id)
        );

        let request = DispatchRequest {
            dealer_id: h.dealer.id,
            product_id: node.product,
            quantity: Quantity::from_kg(100),
            notes: None,
        };
        let err = node.ledger().dispatch(h.aso.id, request.clone()).unwrap_err();
        assert_eq!(
            err,
            LedgerError::NotMapped {
                dealer: h.dealer.id,
                aso: h.aso.id
            }
        );
        assert!(node.ledger().dispatch(other_aso.id, request).is_ok());

        let history = node.identity().active_mappings(&admin).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].aso, other_aso.id);
    }

    #[tokio::test]
    async fn test_deleting_dealer_clears_its_mapping() {
        let node = Node::start().await;
        let h = node.hierarchy().await;
        let admin = node.principal(node.admin);

        node.identity()
            .set_status(&admin, h.dealer.id, UserStatus::Deleted)
            .unwrap();

        let aso = node.identity().get_user(h.aso.id).unwrap();
        assert!(aso.mapped_dealers.is_empty());
        assert!(node.identity().active_mappings(&admin).unwrap().is_empty());

        let report = node.identity().reconcile(&admin).unwrap();
        assert!(report.is_clean());
    }

    #[tokio::test]
    async fn test_only_super_admin_manages_mappings() {
        let node = Node::start().await;
        let h = node.hierarchy().await;
        let aso = node.principal(h.aso.id);

        let err = node.identity().unmap_dealer(&aso, h.dealer.id).unwrap_err();
        assert!(matches!(err, IdentityError::NotAuthorized { .. }));
        assert!(node.identity().reconcile(&aso).is_err());
    }

    #[tokio::test]
    async fn test_mapping_requires_matching_roles() {
        let node = Node::start().await;
        let h = node.hierarchy().await;
        let admin = node.principal(node.admin);
        let spare = node.provision(node.admin, "9300000003", Role::Dealer);

        // a pending dealer may be mapped, but not to another dealer
        let err = node
            .identity()
            .map_dealer_to_aso(&admin, h.dealer.id, spare.id)
            .unwrap_err();
        assert!(matches!(err, IdentityError::WrongRole { expected: Role::Aso, .. }));
        assert!(node
            .identity()
            .map_dealer_to_aso(&admin, h.aso.id, spare.id)
            .is_ok());
        assert_eq!(
            node.identity()
                .assigned_dealers(&node.principal(h.aso.id))
                .unwrap()
                .len(),
            2
        );
    }
}
