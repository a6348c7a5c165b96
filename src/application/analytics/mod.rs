//! Portfolio analytics engine.
//!
//! - [`aggregator`] - pure metric computation over a trade history
//! - [`service`] - cached snapshot reads, forced and batch recomputation
//! - [`scheduler`] - periodic batch recomputation task
//!
//! Strategy classification lives in [`crate::domain::archetype`] since it is
//! a pure function of a trade's legs.

pub mod aggregator;
pub mod scheduler;
pub mod service;

pub use aggregator::{aggregate, holding_days};
pub use scheduler::{RecalculationScheduler, SchedulerHandle};
pub use service::{BatchReport, SnapshotPolicy, SnapshotService};
