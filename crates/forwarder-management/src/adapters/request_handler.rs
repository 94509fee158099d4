//! # Request Handler Adapter
//!
//! Turns inbound [`RegistryRequestPayload`]s into calls on a
//! [`ForwarderManagementApi`] and folds every outcome into a
//! [`RegistryResponsePayload`]. A rejected call is still a response: the
//! revert reason travels back to the caller verbatim.

use crate::domain::value_objects::Address;
use crate::errors::RegistryError;
use crate::events::{RegistryRequestPayload, RegistryResponsePayload, ResponseValue};
use crate::ports::inbound::ForwarderManagementApi;
use std::sync::Arc;
use tracing::debug;

/// Dispatches registry requests against an API implementation.
pub struct RegistryRequestHandler<T: ForwarderManagementApi> {
    api: Arc<T>,
}

impl<T: ForwarderManagementApi> RegistryRequestHandler<T> {
    /// Create a new handler.
    pub fn new(api: Arc<T>) -> Self {
        Self { api }
    }

    /// Handle one request issued by `caller`.
    pub async fn handle(
        &self,
        caller: Address,
        request: RegistryRequestPayload,
    ) -> RegistryResponsePayload {
        debug!(caller = ?caller, ?request, "Handling registry request");

        let result: Result<ResponseValue, RegistryError> = match request {
            RegistryRequestPayload::Initialize {
                admin,
                flush_to_address,
            } => self
                .api
                .initialize(admin, flush_to_address)
                .await
                .map(|()| ResponseValue::Unit),
            RegistryRequestPayload::AddFlusher { address } => self
                .api
                .add_flusher(caller, address)
                .await
                .map(|()| ResponseValue::Unit),
            RegistryRequestPayload::RemoveFlusher { address } => self
                .api
                .remove_flusher(caller, address)
                .await
                .map(|()| ResponseValue::Unit),
            RegistryRequestPayload::AddValidFlushToAddress { address } => self
                .api
                .add_valid_flush_to_address(caller, address)
                .await
                .map(|()| ResponseValue::Unit),
            RegistryRequestPayload::RemoveValidFlushToAddress { address } => self
                .api
                .remove_valid_flush_to_address(caller, address)
                .await
                .map(|()| ResponseValue::Unit),
            RegistryRequestPayload::IsFlusher { address } => {
                Ok(ResponseValue::Bool(self.api.is_flusher(address).await))
            }
            RegistryRequestPayload::IsValidFlushToAddress { address } => Ok(ResponseValue::Bool(
                self.api.is_valid_flush_to_address(address).await,
            )),
            RegistryRequestPayload::CreateForwarder { destination } => self
                .api
                .create_forwarder(caller, destination)
                .await
                .map(ResponseValue::Address),
            RegistryRequestPayload::FlushForwarderTokens { forwarder } => self
                .api
                .flush_forwarder_tokens(caller, forwarder)
                .await
                .map(ResponseValue::Amount),
            RegistryRequestPayload::FindIndex { sequence, target } => self
                .api
                .find_index(&sequence, &target)
                .map(|index| ResponseValue::Index(index as u64))
                .map_err(RegistryError::from),
        };

        match result {
            Ok(value) => RegistryResponsePayload::ok(value),
            Err(err) => RegistryResponsePayload::revert(err.reason()),
        }
    }

    /// Decode a JSON request, handle it, and encode the response.
    ///
    /// # Errors
    ///
    /// Returns the decode error for malformed input; such messages belong on
    /// the [`DLQ`](crate::events::topics::DLQ) topic.
    pub async fn handle_json(
        &self,
        caller: Address,
        raw: &[u8],
    ) -> Result<Vec<u8>, serde_json::Error> {
        let request: RegistryRequestPayload = serde_json::from_slice(raw)?;
        let response = self.handle(caller, request).await;
        serde_json::to_vec(&response)
    }
}

// =============================================================================
// TESTS
// =============================================================================
