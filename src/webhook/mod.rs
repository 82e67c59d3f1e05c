//! Webhook layer for delivering notification payloads over HTTP.
//!
//! This module provides types and traits for:
//! - Building HTTP requests ([`HttpRequest`])
//! - Handling HTTP responses ([`HttpResponse`])
//! - Abstracting HTTP clients ([`HttpClient`])
//! - Production HTTP client with a fixed transport policy ([`ReqwestClient`], [`TransportPolicy`])
//! - Single-attempt payload delivery ([`HttpDelivery`], [`DeliveryConfig`])
//! - URL path joining ([`join_url_path`])

mod client;
mod delivery;
mod error;
mod http;
mod join;

#[cfg(test)]
mod delivery_tests;
#[cfg(test)]
mod http_tests;

pub use client::{ReqwestClient, TransportPolicy};
pub use delivery::{CONTENT_TYPE_JSON, DeliveryConfig, HttpDelivery, USER_AGENT};
pub use error::{DeliveryError, HttpError};
pub use http::{HttpClient, HttpRequest, HttpResponse};
pub use join::join_url_path;
