//! Twilio Proxy REST API client.
//!
//! Covers the operations needed to provision and tear down number-masked
//! conversations: services, their phone number pools, sessions, and session
//! participants. Every call is one independent HTTPS request authenticated
//! with the account SID and auth token.

mod client;
mod error;
mod types;

pub use client::{ProxyClient, DEFAULT_BASE_URL};
pub use error::ProxyApiError;
pub use types::*;
