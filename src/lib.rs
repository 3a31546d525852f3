//! CloudFlix CLI - Lightweight client for the CloudFlix short-video API
//!
//! Library crate backing the `cloudflix` binary. The interesting parts are
//! the authenticated request pipeline (`api::client`), the single-flight
//! refresh coordinator (`auth::refresh`) and the optimistic mutation flow
//! over the query cache (`api::mutations`).

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
