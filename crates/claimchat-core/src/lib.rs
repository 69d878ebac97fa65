//! Chat core for claimchat.
//!
//! Holds the streaming response assembler (`stream`), the chat session that
//! folds fragments into a transcript (`chat`), and the "ports" (transport and
//! repository traits) that the infrastructure layer implements. It depends
//! only on `claimchat-types` -- never on `claimchat-infra` or any HTTP/database
//! crate.

pub mod chat;
pub mod stream;
