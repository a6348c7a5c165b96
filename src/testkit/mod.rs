//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`clock`] - A [`Clock`](crate::port::outbound::clock::Clock) that only
//!   moves when told to.
//! - [`domain`] - Builders for trades and legs.
//! - [`store`] - Migrated SQLite pools and ready-wired services.

pub mod clock;
pub mod domain;
pub mod store;
