//! Infrastructure layer for claimchat.
//!
//! Contains implementations of the traits defined in `claimchat-core`:
//! HTTP transports for the completion endpoint, the upstream OpenAI client
//! shared with the relay server, SQLite conversation storage, and the
//! config/data-dir loaders.

pub mod config;
pub mod filesystem;
pub mod http;
pub mod sqlite;
