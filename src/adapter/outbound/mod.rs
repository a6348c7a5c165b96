//! Outbound adapters implementing the journal and snapshot ports.

pub mod memory;
pub mod sqlite;
