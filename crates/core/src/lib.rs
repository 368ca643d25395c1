//! Prifam Core - Shared domain types.
//!
//! This crate provides the types used by the Prifam admin dashboard and its
//! tests:
//! - `admin` - Server-rendered reputation-management dashboard
//! - `integration-tests` - Router-level tests
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP, no session state.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, email addresses, roles, sentiments and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
