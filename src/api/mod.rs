//! Console API access: wire types, the HTTP gateway and the cached client.

pub mod api_types;
pub mod cache;
pub mod cached_client;
pub mod client;
pub mod gateway;
pub mod types;

pub use cached_client::CachedConsoleClient;
pub use gateway::FetchGateway;
