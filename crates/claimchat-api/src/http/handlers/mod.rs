//! Relay request handlers.

pub mod chat;
