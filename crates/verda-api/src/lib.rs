// verda-api: Async Rust client for the Verda greenhouse backend (REST + live channel)

pub mod client;
pub mod error;
pub mod live;
pub mod models;
pub mod transport;

pub use client::ApiClient;
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
