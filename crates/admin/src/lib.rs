//! Prifam admin library.
//!
//! Server-rendered admin dashboard for the Prifam reputation-management
//! product. Exposed as a library so the router can be driven in tests.
//!
//! All data is in memory: an immutable seed dataset built at startup, and a
//! working copy per signed-in session that the forms mutate.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod components;
pub mod config;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
