//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe the infrastructure the analytics engine reads
//! from and writes to.

pub mod clock;
pub mod snapshot;
pub mod trade;
