//! Interactive CLI chat.
//!
//! Streams replies as they arrive, supports slash commands, and autosaves
//! the conversation after every exchange. Entry point:
//! `loop_runner::run_chat_loop`.

pub mod banner;
pub mod commands;
pub mod input;
pub mod loop_runner;
pub mod printer;
