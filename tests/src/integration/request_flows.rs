//! # Request Flows
//!
//! Wire-level calls through [`RegistryRequestHandler`] and event delivery
//! to broadcast subscribers.

#[cfg(test)]
mod tests {
    use crate::fixtures::{init_tracing, Signers};
    use forwarder_management::prelude::*;
    use serde_json::json;
    use std::sync::Arc;

    fn call(method: &str, params: serde_json::Value) -> Vec<u8> {
        serde_json::to_vec(&json!({ "method": method, "params": params })).unwrap()
    }

    async fn send(
        handler: &RegistryRequestHandler<ForwarderManagementService<InMemoryForwarderGateway>>,
        caller: Address,
        raw: Vec<u8>,
    ) -> RegistryResponsePayload {
        let out = handler.handle_json(caller, &raw).await.unwrap();
        serde_json::from_slice(&out).unwrap()
    }

    #[tokio::test]
    async fn test_json_session() {
        init_tracing();
        let s = Signers::random();
        let service = Arc::new(create_test_service());
        let handler = RegistryRequestHandler::new(Arc::clone(&service));

        let response = send(
            &handler,
            s.admin,
            call(
                "initialize",
                json!({ "admin": s.admin, "flush_to_address": s.valid_flush_to_address1 }),
            ),
        )
        .await;
        assert!(response.success);

        let response = send(
            &handler,
            s.admin,
            call("addFlusher", json!({ "address": s.flusher1 })),
        )
        .await;
        assert_eq!(response, RegistryResponsePayload::ok(ResponseValue::Unit));

        let response = send(
            &handler,
            s.dummy1,
            call("isFlusher", json!({ "address": s.flusher1 })),
        )
        .await;
        assert_eq!(response.value, ResponseValue::Bool(true));

        let preview = service.preview_forwarder_address().await;
        let response = send(
            &handler,
            s.dummy1,
            call(
                "createForwarder",
                json!({ "destination": s.valid_flush_to_address1 }),
            ),
        )
        .await;
        assert_eq!(response.value, ResponseValue::Address(preview));

        let response = send(
            &handler,
            s.dummy1,
            call("removeFlusher", json!({ "address": s.flusher1 })),
        )
        .await;
        assert!(!response.success);
        assert_eq!(
            response.revert_reason.as_deref(),
            Some(reasons::MISSING_ADMIN_ROLE)
        );
        assert!(service.is_flusher(s.flusher1).await);
    }

    #[tokio::test]
    async fn test_json_flush_returns_amount() {
        init_tracing();
        let s = Signers::random();
        let service = Arc::new(create_test_service());
        let handler = RegistryRequestHandler::new(Arc::clone(&service));

        service
            .initialize(s.admin, s.valid_flush_to_address1)
            .await
            .unwrap();
        service.add_flusher(s.admin, s.flusher1).await.unwrap();
        let forwarder = service
            .create_forwarder(s.admin, s.valid_flush_to_address1)
            .await
            .unwrap();
        service
            .gateway()
            .credit(forwarder, U256::from(31_337))
            .unwrap();

        let response = send(
            &handler,
            s.flusher1,
            call("flushForwarderTokens", json!({ "forwarder": forwarder })),
        )
        .await;

        assert_eq!(response.value, ResponseValue::Amount(U256::from(31_337)));
    }

    #[tokio::test]
    async fn test_json_find_index_needs_no_setup() {
        let s = Signers::random();
        let handler = RegistryRequestHandler::new(Arc::new(create_test_service()));

        let response = send(
            &handler,
            s.dummy1,
            call(
                "findIndex",
                json!({ "sequence": [s.dummy1, s.dummy2, s.dummy3], "target": s.dummy3 }),
            ),
        )
        .await;
        assert_eq!(response.value, ResponseValue::Index(2));

        let response = send(
            &handler,
            s.dummy1,
            call(
                "findIndex",
                json!({ "sequence": [], "target": s.dummy3 }),
            ),
        )
        .await;
        assert_eq!(
            response.revert_reason.as_deref(),
            Some(reasons::ELEMENT_NOT_FOUND)
        );
    }

    #[tokio::test]
    async fn test_calls_before_initialize_revert() {
        let s = Signers::random();
        let handler = RegistryRequestHandler::new(Arc::new(create_test_service()));

        let response = send(
            &handler,
            s.admin,
            call("addValidFlushToAddress", json!({ "address": s.dummy1 })),
        )
        .await;

        assert_eq!(
            response.revert_reason.as_deref(),
            Some(reasons::NOT_INITIALIZED)
        );
    }

    #[tokio::test]
    async fn test_malformed_request_is_an_error() {
        let s = Signers::random();
        let handler = RegistryRequestHandler::new(Arc::new(create_test_service()));

        let raw = call("addFlusher", json!({ "address": "0x1234" }));
        assert!(handler.handle_json(s.admin, &raw).await.is_err());

        let raw = call("selfDestruct", json!({}));
        assert!(handler.handle_json(s.admin, &raw).await.is_err());
    }

    #[tokio::test]
    async fn test_broadcast_subscriber_sees_commit_order() {
        init_tracing();
        let s = Signers::random();
        let service = create_test_service();
        let mut subscriber = service.subscribe();

        service
            .initialize(s.admin, s.valid_flush_to_address1)
            .await
            .unwrap();
        service.add_flusher(s.admin, s.flusher1).await.unwrap();
        let _ = service.add_flusher(s.admin, s.flusher1).await;
        let forwarder = service
            .create_forwarder(s.admin, s.valid_flush_to_address1)
            .await
            .unwrap();

        let mut received = Vec::new();
        while let Ok(envelope) = subscriber.try_recv() {
            received.push(envelope);
        }

        let sequences: Vec<u64> = received.iter().map(|e| e.sequence).collect();
        assert_eq!(sequences, vec![0, 1, 2, 3]);
        assert_eq!(
            received.last().map(|e| e.event.clone()),
            Some(RegistryEvent::ForwarderCreated {
                creator: s.admin,
                forwarder
            })
        );
        assert!(received
            .iter()
            .all(|e| e.registry == service.config().registry_address));
    }
}
