//! # KanFlow Core Library
//!
//! This crate contains the domain model and business logic behind the
//! KanFlow API server: accounts and tokens, boards and memberships, tasks,
//! comments, and the authorization rules tying them together.
//!
//! ## Module Organization
//!
//! - `models`: Database models and data structures
//! - `ops`: High-level operations composing authorization and persistence
//! - `auth`: Password hashing and token utilities
//! - `authz`: Pure board-scoped authorization decisions
//! - `db`: Connection pool and migrations
//! - `error`: Common error types

pub mod auth;
pub mod authz;
pub mod db;
pub mod error;
pub mod models;
pub mod ops;

/// Current version of the KanFlow core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
