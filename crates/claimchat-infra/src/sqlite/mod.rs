//! SQLite storage for saved conversations.

pub mod conversation;
pub mod pool;
