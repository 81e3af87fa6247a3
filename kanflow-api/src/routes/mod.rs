/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Registration, login, and email-check endpoints
/// - `boards`: Board collection and item endpoints
/// - `tasks`: Task endpoints plus the assigned-to-me / reviewing views
/// - `comments`: Comment endpoints nested under tasks

pub mod health;
pub mod auth;
pub mod boards;
pub mod tasks;
pub mod comments;
