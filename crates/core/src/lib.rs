//! OrganicOils Core - Shared types library.
//!
//! This crate provides the domain types shared by the storefront core and
//! any shell that embeds it.
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no async, no collaborator
//! access. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, emails, prices, and catalog product records

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
