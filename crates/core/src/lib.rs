//! Restaurant Reviews Core - Shared domain types.
//!
//! This crate provides the types shared by the web application and the CLI:
//! - `web` - Server-rendered review site
//! - `cli` - Operator commands for collections and users
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no database
//! access, no HTTP. Validation of user input (usernames, record identifiers,
//! search terms) lives here so every entry point applies the same rules.
//!
//! # Modules
//!
//! - [`types`] - Identifiers, usernames, restaurant entries, and search filters

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
