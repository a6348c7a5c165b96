//! Strikebook - options trade journal analytics.
//!
//! Classifies journaled option trades into strategy archetypes, aggregates a
//! user's closed trades into performance statistics, and caches the result as
//! a dated snapshot that is recomputed when it goes stale.
//!
//! # Architecture
//!
//! - [`domain`] - Trades, legs, archetypes and snapshot types. No I/O.
//! - [`port`] - Traits the engine needs from the outside world.
//! - [`application`] - Metric aggregation, the snapshot service and its
//!   scheduler.
//! - [`adapter`] - SQLite and in-memory implementations of the ports, and
//!   the CLI.
//! - [`infrastructure`] - Configuration and logging.
//! - [`error`] - Error types for the crate.
//!
//! # Example
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use rust_decimal_macros::dec;
//! use strikebook::application::analytics::aggregate;
//! use strikebook::domain::{Trade, UserId};
//!
//! let opened = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
//! let trade = Trade::new(UserId::new("alice"), "SPY", opened)
//!     .with_credit(dec!(250))
//!     .closed(Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap());
//!
//! let snapshot = aggregate(&[trade], Utc::now());
//! assert_eq!(snapshot.totals.win_rate, dec!(100));
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
