//! Conversation provisioning service over the Twilio Proxy API.
//!
//! A thin HTTP wrapper that:
//! - provisions a number-masked SMS conversation (proxy service, phone
//!   number pool, session, participants) as a fire-and-forget workflow
//! - tears down every existing proxy service on the account
//!
//! The service acknowledges with 202 before any provider call is made;
//! workflow outcomes are observable only through the provider's state and
//! the logs.

pub mod api;
pub mod config;
pub mod workflow;

pub use config::Config;
