//! # SignDesk Shared Library
//!
//! This crate contains the domain models and the in-memory stores behind the
//! SignDesk API server, including the signature placement engine.
//!
//! ## Module Organization
//!
//! - `models`: Users, signature profiles, documents and applied signatures
//! - `store`: Identity, document and signature profile stores, the placement
//!   engine, and the `Storage` facade that wires their cascades together

pub mod models;
pub mod store;

/// Current version of the SignDesk shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
