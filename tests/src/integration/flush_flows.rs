//! # Flush Flows
//!
//! Flusher-gated transfers out of forwarders, through the in-memory
//! forwarder gateway.

#[cfg(test)]
mod tests {
    use crate::fixtures::{random_address, Deployment};
    use forwarder_management::prelude::*;
    use std::sync::Arc;

    async fn funded_forwarder(d: &Deployment, destination: Address, amount: u64) -> Address {
        let forwarder = d
            .service
            .create_forwarder(d.signers.admin, destination)
            .await
            .unwrap();
        d.service
            .gateway()
            .credit(forwarder, U256::from(amount))
            .unwrap();
        forwarder
    }

    #[tokio::test]
    async fn test_flush_to_valid_address() {
        let d = Deployment::initialized().await;
        let s = d.signers;
        d.service
            .add_valid_flush_to_address(s.admin, s.valid_flush_to_address2)
            .await
            .unwrap();
        d.service.add_flusher(s.admin, s.flusher1).await.unwrap();
        let forwarder = funded_forwarder(&d, s.valid_flush_to_address2, 5_000).await;

        let moved = d
            .service
            .flush_forwarder_tokens(s.flusher1, forwarder)
            .await
            .unwrap();

        assert_eq!(moved, U256::from(5_000));
        assert!(d.service.gateway().balance_of(&forwarder).is_zero());
        assert_eq!(
            d.service.gateway().delivered_to(&s.valid_flush_to_address2),
            U256::from(5_000)
        );
        assert_eq!(
            d.last_event(),
            Some(RegistryEvent::ForwarderFlushed {
                flusher: s.flusher1,
                forwarder,
                destination: s.valid_flush_to_address2,
                amount: U256::from(5_000),
            })
        );
    }

    #[tokio::test]
    async fn test_flush_by_non_flusher_rejected() {
        let d = Deployment::initialized().await;
        let s = d.signers;
        let forwarder = funded_forwarder(&d, s.valid_flush_to_address1, 10).await;

        // Admin is not implicitly a flusher
        for caller in [s.admin, s.dummy1] {
            let err = d
                .service
                .flush_forwarder_tokens(caller, forwarder)
                .await
                .unwrap_err();
            assert_eq!(err.reason(), reasons::MISSING_FLUSHER_ROLE);
        }
        assert_eq!(d.service.gateway().balance_of(&forwarder), U256::from(10));
    }

    #[tokio::test]
    async fn test_flush_revoked_flusher_rejected() {
        let d = Deployment::initialized().await;
        let s = d.signers;
        let forwarder = funded_forwarder(&d, s.valid_flush_to_address1, 10).await;
        d.service.add_flusher(s.admin, s.flusher2).await.unwrap();
        d.service.remove_flusher(s.admin, s.flusher2).await.unwrap();

        let err = d
            .service
            .flush_forwarder_tokens(s.flusher2, forwarder)
            .await
            .unwrap_err();

        assert!(err.is_unauthorized());
    }

    #[tokio::test]
    async fn test_flush_unknown_forwarder_rejected() {
        let d = Deployment::initialized().await;
        let s = d.signers;
        d.service.add_flusher(s.admin, s.flusher1).await.unwrap();

        let err = d
            .service
            .flush_forwarder_tokens(s.flusher1, random_address())
            .await
            .unwrap_err();

        assert_eq!(err.reason(), reasons::UNKNOWN_FORWARDER);
        assert_eq!(err.kind(), ErrorKind::UnknownForwarder);
    }

    #[tokio::test]
    async fn test_flush_after_destination_removed_uses_binding() {
        let d = Deployment::initialized().await;
        let s = d.signers;
        d.service.add_flusher(s.admin, s.flusher1).await.unwrap();
        let forwarder = funded_forwarder(&d, s.valid_flush_to_address1, 42).await;

        d.service
            .remove_valid_flush_to_address(s.admin, s.valid_flush_to_address1)
            .await
            .unwrap();
        let moved = d
            .service
            .flush_forwarder_tokens(s.flusher1, forwarder)
            .await
            .unwrap();

        assert_eq!(moved, U256::from(42));
        assert_eq!(
            d.service.gateway().delivered_to(&s.valid_flush_to_address1),
            U256::from(42)
        );
    }

    #[tokio::test]
    async fn test_repeated_flush_moves_only_new_deposits() {
        let d = Deployment::initialized().await;
        let s = d.signers;
        d.service.add_flusher(s.admin, s.flusher1).await.unwrap();
        let forwarder = funded_forwarder(&d, s.valid_flush_to_address1, 100).await;

        let first = d
            .service
            .flush_forwarder_tokens(s.flusher1, forwarder)
            .await
            .unwrap();
        let empty = d
            .service
            .flush_forwarder_tokens(s.flusher1, forwarder)
            .await
            .unwrap();
        d.service
            .gateway()
            .credit(forwarder, U256::from(7))
            .unwrap();
        let second = d
            .service
            .flush_forwarder_tokens(s.flusher1, forwarder)
            .await
            .unwrap();

        assert_eq!(first, U256::from(100));
        assert!(empty.is_zero());
        assert_eq!(second, U256::from(7));
        assert_eq!(
            d.service.gateway().delivered_to(&s.valid_flush_to_address1),
            U256::from(107)
        );
        assert_eq!(d.service.stats().await.flushes, 3);
    }

    #[tokio::test]
    async fn test_concurrent_flushes_deliver_exactly_once() {
        let d = Deployment::initialized().await;
        let s = d.signers;
        d.service.add_flusher(s.admin, s.flusher1).await.unwrap();
        d.service.add_flusher(s.admin, s.flusher2).await.unwrap();
        let forwarder = funded_forwarder(&d, s.valid_flush_to_address1, 900).await;

        let handles: Vec<_> = [s.flusher1, s.flusher2, s.flusher1, s.flusher2]
            .into_iter()
            .map(|flusher| {
                let service = Arc::clone(&d.service);
                tokio::spawn(async move { service.flush_forwarder_tokens(flusher, forwarder).await })
            })
            .collect();

        let mut total = U256::zero();
        for handle in handles {
            total += handle.await.unwrap().unwrap();
        }

        assert_eq!(total, U256::from(900));
        assert_eq!(
            d.service.gateway().delivered_to(&s.valid_flush_to_address1),
            U256::from(900)
        );
    }
}
