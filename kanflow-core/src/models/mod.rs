/// Database models
///
/// # Models
///
/// - `user`: user accounts and public profiles
/// - `token`: stored bearer-token digests
/// - `board`: boards, the membership set, and derived board counts
/// - `task`: tasks with status/priority enums and user-centric views
/// - `comment`: task comments
///
/// Model functions take `&mut SqliteConnection`; the lifecycle operations in
/// [`crate::ops`] compose them inside transactions.

pub mod board;
pub mod comment;
pub mod task;
pub mod token;
pub mod user;
