//! Core types and trait definitions for the OpenArc record service.
//!
//! This crate is deliberately free of HTTP and filesystem dependencies.
//! The storage backend and the API crate both depend on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod identifier;
pub mod record;
pub mod store;

pub use error::{Error, Result};
