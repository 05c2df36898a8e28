//! # HTTP Flows
//!
//! The full router over the real subsystem container, driven with
//! `tower::ServiceExt::oneshot`: every request passes the bearer-token
//! extractor, the capability policy and the JSON error mapping.

#[cfg(test)]
mod tests {
    use super::super::fixtures::{Node, ADMIN_PHONE};
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use axum::Router;
    use sc_05_api_gateway::{build_router, GatewayConfig};
    use serde_json::{json, Value};
    use shared_types::SECOND_MS;
    use tower::ServiceExt;

    struct Client {
        node: Node,
        app: Router,
    }

    impl Client {
        async fn start() -> Self {
            let node = Node::start().await;
            let app = build_router(node.container.app_state(), &GatewayConfig::default());
            // the fixture already logged the admin in once
            node.clock.advance(61 * SECOND_MS);
            Self { node, app }
        }

        async fn call(
            &self,
            method: Method,
            uri: &str,
            token: Option<&str>,
            body: Option<Value>,
        ) -> (StatusCode, Value) {
            let mut builder = Request::builder().method(method).uri(uri);
            if let Some(token) = token {
                builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
            }
            let request = match body {
                Some(body) => builder
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
                None => builder.body(Body::empty()).unwrap(),
            };
            let response = self.app.clone().oneshot(request).await.unwrap();
            let status = response.status();
            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
        }

        async fn login(&self, phone: &str) -> String {
            let (status, body) = self
                .call(
                    Method::POST,
                    "/auth/send-code",
                    None,
                    Some(json!({ "countryCode": "91", "phoneNo": phone })),
                )
                .await;
            assert_eq!(status, StatusCode::OK, "{body}");
            let code = self.node.last_code(phone).unwrap();
            let (status, body) = self
                .call(
                    Method::POST,
                    "/auth/verify-code",
                    None,
                    Some(json!({ "countryCode": "91", "phoneNo": phone, "otp": code })),
                )
                .await;
            assert_eq!(status, StatusCode::OK, "{body}");
            body["data"]["token"].as_str().unwrap().to_string()
        }

        async fn provision(&self, token: &str, phone: &str, name: &str, role: &str) -> String {
            let (status, body) = self
                .call(
                    Method::POST,
                    "/users",
                    Some(token),
                    Some(json!({ "phoneNo": phone, "name": name, "role": role })),
                )
                .await;
            assert_eq!(status, StatusCode::OK, "{body}");
            assert_eq!(body["user"]["status"], "pending");
            body["user"]["id"].as_str().unwrap().to_string()
        }
    }

    #[tokio::test]
    async fn test_supply_chain_end_to_end() {
        let c = Client::start().await;
        let admin = c.login(ADMIN_PHONE).await;

        let aso_id = c.provision(&admin, "9500000001", "North ASO", "ASO").await;
        let dealer_id = c.provision(&admin, "9500000002", "City Steel", "DLR").await;
        let (status, body) = c
            .call(
                Method::POST,
                "/mappings",
                Some(&admin),
                Some(json!({ "asoId": aso_id, "dealerId": dealer_id })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");

        let aso = c.login("9500000001").await;
        let dealer = c.login("9500000002").await;
        let barbender_id = c.provision(&dealer, "9500000003", "Ravi", "BBR").await;

        let (status, body) = c
            .call(
                Method::POST,
                "/stock/dispatch",
                Some(&aso),
                Some(json!({
                    "dealerId": dealer_id,
                    "productId": c.node.product,
                    "quantity": 400,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        let dispatch_id = body["dispatch"]["id"].as_str().unwrap().to_string();

        let uri = format!("/stock/receive/{dispatch_id}");
        let (status, body) = c.call(Method::PUT, &uri, Some(&dealer), None).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["newBalance"], 400.0);

        let (status, body) = c.call(Method::PUT, &uri, Some(&dealer), None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["kind"], "AlreadyProcessed");

        let (status, body) = c
            .call(
                Method::POST,
                "/stock/sell",
                Some(&dealer),
                Some(json!({
                    "barbenderId": barbender_id,
                    "productId": c.node.product,
                    "quantity": 250,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["dealerBalance"]["availableQty"], 150.0);

        let (status, body) = c
            .call(Method::POST, "/rewards/claim", Some(&dealer), None)
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["rewardKg"], 10.0);

        let (status, body) = c
            .call(Method::POST, "/rewards/claim", Some(&dealer), None)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "NothingToClaim");

        let (status, body) = c.call(Method::GET, "/auth/profile", Some(&dealer), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["availableQty"], 150.0);
        assert_eq!(body["user"]["rewardEligibleQty"], 260.0);
        assert_eq!(body["user"]["assignedAso"], aso_id.as_str());
        assert_eq!(body["welcomeMessage"], "Welcome, Dealer!");
    }

    #[tokio::test]
    async fn test_roles_are_enforced_per_route() {
        let c = Client::start().await;
        let admin = c.login(ADMIN_PHONE).await;
        let dealer_id = c.provision(&admin, "9500000011", "Dealer", "DLR").await;
        let dealer = c.login("9500000011").await;

        // dealers cannot dispatch or manage mappings
        let (status, _) = c
            .call(
                Method::POST,
                "/stock/dispatch",
                Some(&dealer),
                Some(json!({
                    "dealerId": dealer_id,
                    "productId": c.node.product,
                    "quantity": 5,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = c
            .call(Method::POST, "/mappings/reconcile", Some(&dealer), None)
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        // a dealer may not create another dealer
        let (status, body) = c
            .call(
                Method::POST,
                "/users",
                Some(&dealer),
                Some(json!({ "phoneNo": "9500000012", "name": "X", "role": "DLR" })),
            )
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["success"], false);

        // the super admin is not a reward beneficiary
        let (status, _) = c
            .call(Method::GET, "/rewards/summary", Some(&admin), None)
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_blocked_user_loses_session() {
        let c = Client::start().await;
        let admin = c.login(ADMIN_PHONE).await;
        let dealer_id = c.provision(&admin, "9500000021", "Dealer", "DLR").await;
        let dealer = c.login("9500000021").await;

        let (status, _) = c.call(Method::GET, "/auth/profile", Some(&dealer), None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = c
            .call(
                Method::PUT,
                &format!("/users/{dealer_id}/status"),
                Some(&admin),
                Some(json!({ "status": "blocked" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");

        let (status, body) = c.call(Method::GET, "/auth/profile", Some(&dealer), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["kind"], "AccountBlocked");
    }
}
