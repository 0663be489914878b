//! Core domain logic for Klypp, the subscription sharing tracker.
//!
//! This crate is database-agnostic: services operate on repository traits
//! and every storage-specific error is converted to the types in
//! [`errors`] before it reaches this layer. Every operation that acts on a
//! user's behalf takes the authenticated caller's id as an explicit
//! argument; there is no ambient session state.

pub mod analytics;
pub mod canceled_plans;
pub mod constants;
pub mod errors;
pub mod memberships;
pub mod notifications;
pub mod plans;
pub mod sharing;
pub mod users;

pub use errors::{Error, Result};
