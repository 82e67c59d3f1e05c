//! alert-courier: alert notification delivery
//!
//! A library for attaching stored screenshots to alert notifications and
//! delivering the resulting payloads to webhook endpoints.

pub mod alert;
pub mod config;
pub mod images;
pub mod notifier;
pub mod receiver;
pub mod time;
pub mod webhook;
