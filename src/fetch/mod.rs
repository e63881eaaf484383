//! Resilient network access: a single-GET transport wrapped by bounded
//! retry, wrapped by ordered proxy fallback.

pub mod proxy;
pub mod retry;
pub mod transport;

pub use proxy::{ProxyChain, ProxyRoute};
pub use retry::RetryPolicy;
pub use transport::{HttpTransport, Transport};
