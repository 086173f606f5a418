//! REST adapter for the external moderation backend.

mod client;
pub mod models;

pub use client::HttpModerationApi;
