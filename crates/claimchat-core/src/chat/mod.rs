//! Chat session orchestration and persistence ports.
//!
//! `session` drives one exchange at a time through the stream assembler and
//! folds fragments into the transcript via `accumulator`. `transport` and
//! `repository` are the traits the infrastructure layer implements.

pub mod accumulator;
pub mod export;
pub mod repository;
pub mod service;
pub mod session;
pub mod transport;
