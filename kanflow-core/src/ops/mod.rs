/// High-level operations
///
/// Each operation authenticates nothing (the caller supplies the resolved
/// actor id) and authorizes everything: it opens a transaction, loads the
/// actor's board access, consults [`crate::authz`], then performs the reads
/// and mutations inside the same transaction.

pub mod boards;
pub mod comments;
pub mod identity;
pub mod tasks;
