//! Core types and trait definitions for the threads data layer.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod community;
pub mod page;
pub mod store;
pub mod thread;
pub mod user;
pub mod view;
