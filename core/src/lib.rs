//! Core components for federated credential exchange.
//!
//! This crate provides the foundational types and traits for the tokex
//! ecosystem. It defines the abstractions that let service crates exchange
//! one cloud's credentials for another's tokens without hard-wiring an HTTP
//! client or process environment.
//!
//! ## Overview
//!
//! The crate is built around a few key concepts:
//!
//! - **Context**: A container holding implementations for HTTP sending and
//!   environment access. Every network call and environment lookup a
//!   credential exchange performs goes through it.
//! - **Traits**: Abstract interfaces for credential loading
//!   ([`ProvideCredential`]) and credential validity ([`SigningCredential`]).
//! - **Error**: A structured error type that classifies failures so callers
//!   can tell a bad config from a rejected exchange.
//!
//! ## Utilities
//!
//! - [`hash`]: SHA-256 and HMAC-SHA-256 helpers used by request signing
//! - [`time`]: Timestamp formatting used by signature schemes
//! - [`utils`]: General utilities including secret redaction

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod context;
pub use context::{Context, Env, HttpSend, NoopHttpSend, OsEnv, StaticEnv};

mod api;
pub use api::{ProvideCredential, SigningCredential};

mod error;
pub use error::{Error, ErrorKind, Result};
