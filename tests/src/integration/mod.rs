//! End-to-end scenarios driven through the service's ports.

pub mod flush_flows;
pub mod registry_flows;
pub mod request_flows;
