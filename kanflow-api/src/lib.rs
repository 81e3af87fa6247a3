//! # KanFlow API Server Library
//!
//! This library provides the HTTP layer of the KanFlow API server. All
//! business decisions live in `kanflow-core`; this crate only routes,
//! deserializes, authenticates, and maps errors to status codes.
//!
//! ## Modules
//!
//! - `app`: Application state, auth middleware, and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod routes;
