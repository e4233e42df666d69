//! OrganicOils Storefront core.
//!
//! This crate implements the storefront's client-local core as a library:
//! the product catalog, the shopping cart, the checkout flow, and the
//! canned-response chat assistant. The interactive shell that renders the
//! UI embeds this crate and owns `fn main`; there is deliberately no binary
//! target and no CLI surface here.
//!
//! # Architecture
//!
//! - [`catalog`] - Read-only product catalog with search and filtering
//! - [`cart`] - Cart store with session persistence
//! - [`checkout`] - Shipping -> Confirmation state machine
//! - [`currency`] - Static conversion-rate table
//! - [`chat`] - Chat widget and rule-based response matcher
//! - [`shipping`] - Canned shipping-rate quotes
//! - [`services`] - External collaborators (notification, authentication)
//! - [`state`] - Dependency-injected application root
//!
//! All cart and checkout operations are synchronous with respect to the
//! triggering user action. The only asynchronous boundaries are the outbound
//! order notification and the deferred chat reply.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod chat;
pub mod checkout;
pub mod config;
pub mod currency;
pub mod error;
pub mod services;
pub mod shipping;
pub mod state;
pub mod telemetry;
