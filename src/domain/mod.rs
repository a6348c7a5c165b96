//! Journal domain types and pure analytics rules.
//!
//! Nothing in this module performs I/O.

pub mod archetype;
pub mod error;
pub mod id;
pub mod money;
pub mod snapshot;
pub mod trade;

pub use archetype::{classify, Archetype};
pub use id::{TradeId, UserId};
pub use money::round_money;
pub use snapshot::{
    AnalyticsSnapshot, EquityPoint, HoldingBucket, HoldingPeriod, SnapshotState,
    SnapshotSummary, StoredSnapshot, StrategyBreakdown, Totals, DEFAULT_LABEL,
};
pub use trade::{LegPosition, NetPremium, OptionLeg, OptionType, Trade, TradeStatus};
