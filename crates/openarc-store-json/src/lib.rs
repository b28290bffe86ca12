//! JSON file backend for the OpenArc record store.
//!
//! The whole record list lives in one JSON document. Every operation loads it
//! in full and every mutation rewrites it in full.

mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::JsonStore;
