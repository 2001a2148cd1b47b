//! emarket client library.
//!
//! A typed client for the emarket REST gateway, plus the client-side state
//! stores that keep a local mirror of server-held data (cart, profile,
//! wishlist, order board).
//!
//! # Modules
//!
//! - [`api`] - [`ApiClient`] and one service method per backend endpoint
//! - [`state`] - Cart, profile, wishlist and order-board stores
//! - [`listing`] - Filtering, sorting and counting for list pages
//! - [`gate`] - Role-based route gate decision
//! - [`session`] - Explicit bearer-token session handle
//! - [`config`] - Environment configuration

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod gate;
pub mod listing;
pub mod session;
pub mod state;
pub mod types;

pub use api::ApiClient;
pub use config::{ClientConfig, ConfigError};
pub use error::ApiError;
pub use session::{Session, SessionUser};
