//! # Tandang Infrastructure
//!
//! Concrete implementations of the ports defined in `tandang-core`.
//! This crate contains the database, object store, session token, and
//! session-event integrations.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external services, in-memory and local-disk only
//! - `postgres` - PostgreSQL post repository via SeaORM
//! - `auth` - JWT session tokens

pub mod database;
pub mod events;
pub mod storage;

#[cfg(feature = "auth")]
pub mod auth;

pub use events::{SessionBroadcast, Subscription};
pub use storage::LocalObjectStore;

pub use database::DatabaseConfig;

#[cfg(feature = "postgres")]
pub use database::PostgresPostRepository;

#[cfg(feature = "auth")]
pub use auth::JwtTokenService;
