//! # Jotdeck Shared Library
//!
//! Common code shared between the Jotdeck API server and the search worker:
//!
//! - **models**: User, Item, Tag, and the item-tag association
//! - **auth**: identity token validation, axum middleware, access guard
//! - **db**: connection pooling and migrations
//! - **page**: opaque keyset cursors for creation-time-descending listings
//! - **error**: the domain error taxonomy

pub mod auth;
pub mod db;
pub mod error;
pub mod models;
pub mod page;

pub use error::{Error, Result};
