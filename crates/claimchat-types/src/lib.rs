//! Shared domain types for claimchat.
//!
//! Turns, transcripts, persisted conversations, wire request bodies,
//! configuration, and the error enums shared by every layer.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod conversation;
pub mod error;
pub mod wire;
