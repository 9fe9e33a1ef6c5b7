//! Client for the remote image-edit endpoint.
//!
//! Provides the multipart request builder and response decoding
//! ([`api`]), the wire message types ([`messages`]) and the
//! environment-driven client configuration ([`config`]). The
//! [`api::ImageGenerator`] trait is the seam the batch pipeline
//! depends on.

pub mod api;
pub mod config;
pub mod messages;
