//! RPC gateway boundary for the downstream CRM adapter.
//!
//! The bridge consumes this interface; it never implements a transport. Test
//! suites provide recording mocks, deployments provide gRPC or HTTP clients.

pub mod traits;

pub use traits::CrmGateway;
