//! emarket Core - Shared types library.
//!
//! This crate provides the value types used across the emarket workspace:
//! - `client` - REST client, resource services and client-side state stores
//! - `cli` - Command-line front end over the client
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. The backend owns every entity; these types describe the shapes
//! that travel over the wire.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, statuses
//!   and timestamps

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
