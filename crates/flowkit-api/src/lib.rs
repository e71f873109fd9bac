// flowkit-api: Async transport adapter for the Webflow Data API (v2)

pub mod client;
pub mod error;
pub mod transport;

pub use client::{ApiClient, ApiPath, CallOptions, DEFAULT_BASE_URL};
pub use error::Error;
pub use transport::TransportConfig;
