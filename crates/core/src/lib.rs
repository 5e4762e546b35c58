//! Tilbud Core - Domain types and pure list pipelines.
//!
//! This crate provides the types and transformations shared by all Tilbud
//! components:
//! - `client` - HTTP gateway, auth session, and favorites registry
//! - `cli` - Command-line front end
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. Every pipeline here consumes an immutable snapshot and produces a
//! new sequence; nothing in this crate mutates a fetched record.
//!
//! # Modules
//!
//! - [`types`] - Store and product wire types matching the backend's JSON
//! - [`search`] - Free-text substring search over nested record fields
//! - [`filter`] - Category/price/discount/stock filters and sorting
//! - [`normalize`] - Upstream text-encoding repair for product names

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod filter;
pub mod normalize;
pub mod search;
pub mod types;

pub use types::*;
