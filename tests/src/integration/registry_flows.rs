//! # Registry Flows
//!
//! Allow-list maintenance and forwarder creation against a freshly
//! initialized registry, checked through return values, views and the
//! event log.

#[cfg(test)]
mod tests {
    use crate::fixtures::Deployment;
    use forwarder_management::prelude::*;

    // =============================================================================
    // VALID FLUSH-TO ADDRESSES
    // =============================================================================

    #[tokio::test]
    async fn test_add_valid_flush_to_address() {
        let d = Deployment::initialized().await;
        let s = d.signers;

        d.service
            .add_valid_flush_to_address(s.admin, s.valid_flush_to_address2)
            .await
            .unwrap();

        assert_eq!(
            d.last_event(),
            Some(RegistryEvent::AddFlushToAddress {
                address: s.valid_flush_to_address2
            })
        );
        assert_eq!(
            d.service.valid_flush_to_addresses().await,
            vec![s.valid_flush_to_address1, s.valid_flush_to_address2]
        );
    }

    #[tokio::test]
    async fn test_add_valid_flush_to_address_twice() {
        let d = Deployment::initialized().await;
        let s = d.signers;
        d.service
            .add_valid_flush_to_address(s.admin, s.valid_flush_to_address2)
            .await
            .unwrap();

        let err = d
            .service
            .add_valid_flush_to_address(s.admin, s.valid_flush_to_address2)
            .await
            .unwrap_err();

        assert_eq!(err.reason(), reasons::ADDRESS_EXISTS);
    }

    #[tokio::test]
    async fn test_add_valid_flush_to_address_by_non_admin() {
        let d = Deployment::initialized().await;
        let s = d.signers;

        let err = d
            .service
            .add_valid_flush_to_address(s.dummy1, s.valid_flush_to_address2)
            .await
            .unwrap_err();

        assert_eq!(err.reason(), reasons::MISSING_ADMIN_ROLE);
        assert!(
            !d.service
                .is_valid_flush_to_address(s.valid_flush_to_address2)
                .await
        );
    }

    #[tokio::test]
    async fn test_remove_valid_flush_to_address_lifecycle() {
        let d = Deployment::initialized().await;
        let s = d.signers;
        let target = s.valid_flush_to_address2;

        d.service
            .add_valid_flush_to_address(s.admin, target)
            .await
            .unwrap();
        d.service
            .remove_valid_flush_to_address(s.admin, target)
            .await
            .unwrap();
        assert_eq!(
            d.last_event(),
            Some(RegistryEvent::RemoveFlushToAddress { address: target })
        );

        let err = d
            .service
            .remove_valid_flush_to_address(s.admin, target)
            .await
            .unwrap_err();
        assert_eq!(err.reason(), reasons::ADDRESS_MISSING);
    }

    #[tokio::test]
    async fn test_remove_unknown_valid_flush_to_address() {
        let d = Deployment::initialized().await;
        let s = d.signers;

        let err = d
            .service
            .remove_valid_flush_to_address(s.admin, s.dummy1)
            .await
            .unwrap_err();

        assert_eq!(err.reason(), reasons::ADDRESS_MISSING);
    }

    #[tokio::test]
    async fn test_non_admin_check_precedes_membership_check() {
        let d = Deployment::initialized().await;
        let s = d.signers;

        // Absent target, wrong caller: the role failure wins
        let err = d
            .service
            .remove_valid_flush_to_address(s.dummy1, s.dummy2)
            .await
            .unwrap_err();

        assert_eq!(err.reason(), reasons::MISSING_ADMIN_ROLE);
    }

    // =============================================================================
    // FLUSHERS
    // =============================================================================

    #[tokio::test]
    async fn test_is_flusher_follows_add_and_remove() {
        let d = Deployment::initialized().await;
        let s = d.signers;

        assert!(!d.service.is_flusher(s.flusher1).await);

        d.service.add_flusher(s.admin, s.flusher1).await.unwrap();
        assert_eq!(
            d.last_event(),
            Some(RegistryEvent::AddFlusher {
                address: s.flusher1
            })
        );
        assert!(d.service.is_flusher(s.flusher1).await);

        d.service.remove_flusher(s.admin, s.flusher1).await.unwrap();
        assert_eq!(
            d.last_event(),
            Some(RegistryEvent::RemoveFlusher {
                address: s.flusher1
            })
        );
        assert!(!d.service.is_flusher(s.flusher1).await);
    }

    #[tokio::test]
    async fn test_flusher_toggle_failures() {
        let d = Deployment::initialized().await;
        let s = d.signers;

        d.service.add_flusher(s.admin, s.flusher1).await.unwrap();
        let err = d.service.add_flusher(s.admin, s.flusher1).await.unwrap_err();
        assert_eq!(err.reason(), reasons::ADDRESS_EXISTS);

        let err = d
            .service
            .remove_flusher(s.admin, s.dummy1)
            .await
            .unwrap_err();
        assert_eq!(err.reason(), reasons::ADDRESS_MISSING);

        let err = d
            .service
            .add_flusher(s.dummy1, s.flusher2)
            .await
            .unwrap_err();
        assert_eq!(err.reason(), reasons::MISSING_ADMIN_ROLE);

        let err = d
            .service
            .remove_flusher(s.dummy1, s.flusher1)
            .await
            .unwrap_err();
        assert_eq!(err.reason(), reasons::MISSING_ADMIN_ROLE);

        assert_eq!(d.service.flushers().await, vec![s.flusher1]);
    }

    #[tokio::test]
    async fn test_lists_are_independent() {
        let d = Deployment::initialized().await;
        let s = d.signers;

        d.service.add_flusher(s.admin, s.dummy3).await.unwrap();

        assert!(d.service.is_flusher(s.dummy3).await);
        assert!(!d.service.is_valid_flush_to_address(s.dummy3).await);
        d.service
            .add_valid_flush_to_address(s.admin, s.dummy3)
            .await
            .unwrap();
        assert!(d.service.is_valid_flush_to_address(s.dummy3).await);
    }

    // =============================================================================
    // FORWARDER FACTORY
    // =============================================================================

    #[tokio::test]
    async fn test_create_forwarder_matches_preview() {
        let d = Deployment::initialized().await;
        let s = d.signers;
        d.service
            .add_valid_flush_to_address(s.admin, s.valid_flush_to_address2)
            .await
            .unwrap();

        let expected = d.service.preview_forwarder_address().await;
        let forwarder = d
            .service
            .create_forwarder(s.admin, s.valid_flush_to_address2)
            .await
            .unwrap();

        assert_eq!(forwarder, expected);
        assert_eq!(
            d.last_event(),
            Some(RegistryEvent::ForwarderCreated {
                creator: s.admin,
                forwarder
            })
        );

        let record = d.service.forwarder(forwarder).await.unwrap();
        assert_eq!(record.destination, s.valid_flush_to_address2);
        assert_eq!(record.creator, s.admin);
    }

    #[tokio::test]
    async fn test_create_forwarder_rejects_unregistered_destination() {
        let d = Deployment::initialized().await;
        let s = d.signers;
        let events_before = d.events().len();

        let err = d
            .service
            .create_forwarder(s.admin, s.dummy2)
            .await
            .unwrap_err();

        assert_eq!(err.reason(), reasons::INVALID_FLUSH_TO_ADDRESS);
        assert_eq!(d.events().len(), events_before);
        assert!(d.service.forwarders().await.is_empty());
    }

    #[tokio::test]
    async fn test_removed_destination_cannot_receive_new_forwarders() {
        let d = Deployment::initialized().await;
        let s = d.signers;

        let existing = d
            .service
            .create_forwarder(s.admin, s.valid_flush_to_address1)
            .await
            .unwrap();
        d.service
            .remove_valid_flush_to_address(s.admin, s.valid_flush_to_address1)
            .await
            .unwrap();

        let err = d
            .service
            .create_forwarder(s.admin, s.valid_flush_to_address1)
            .await
            .unwrap_err();
        assert_eq!(err.reason(), reasons::INVALID_FLUSH_TO_ADDRESS);

        // Existing binding is untouched
        assert_eq!(
            d.service.forwarder(existing).await.unwrap().destination,
            s.valid_flush_to_address1
        );
    }

    #[tokio::test]
    async fn test_forwarder_addresses_follow_creation_nonce() {
        let d = Deployment::initialized().await;
        let s = d.signers;
        let registry = d.service.registry_address().await;

        let mut created = Vec::new();
        for _ in 0..5 {
            created.push(
                d.service
                    .create_forwarder(s.dummy1, s.valid_flush_to_address1)
                    .await
                    .unwrap(),
            );
        }

        for (nonce, forwarder) in created.iter().enumerate() {
            assert_eq!(
                *forwarder,
                compute_forwarder_address(registry, nonce as u64)
            );
        }
        assert!(check_all_invariants(&d.service.snapshot().await).is_valid());
    }

    #[tokio::test]
    async fn test_second_initialize_rejected() {
        let d = Deployment::initialized().await;
        let s = d.signers;

        let err = d
            .service
            .initialize(s.dummy1, s.dummy2)
            .await
            .unwrap_err();

        assert_eq!(err.reason(), reasons::ALREADY_INITIALIZED);
        assert_eq!(d.service.admin().await, Some(s.admin));
        assert!(!d.service.is_valid_flush_to_address(s.dummy2).await);
    }

    // =============================================================================
    // SEARCH PRIMITIVE
    // =============================================================================

    #[tokio::test]
    async fn test_find_index_over_signer_list() {
        let d = Deployment::initialized().await;
        let s = d.signers;
        let signers = vec![
            s.admin,
            s.flusher1,
            s.flusher2,
            s.valid_flush_to_address1,
            s.valid_flush_to_address2,
            s.dummy1,
            s.dummy2,
        ];

        assert_eq!(d.service.find_index(&signers, &s.valid_flush_to_address2), Ok(4));
        assert_eq!(
            d.service.find_index(&signers, &s.dummy3),
            Err(ArrayError::ElementNotFound)
        );
        assert_eq!(
            ArrayError::ElementNotFound.to_string(),
            reasons::ELEMENT_NOT_FOUND
        );
    }
}
