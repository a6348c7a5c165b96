//! Builders for journal primitives used across tests.
//!
//! Provides concise factory functions for legs and trades so tests focus on
//! assertions rather than construction boilerplate. Every timestamp is
//! relative to a fixed base instant, [`base_time`].

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;

use crate::domain::id::UserId;
use crate::domain::trade::{LegPosition, OptionLeg, OptionType, Trade};

/// 2024-01-01T00:00:00Z.
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Base instant plus `days`.
pub fn day(days: i64) -> DateTime<Utc> {
    base_time() + Duration::days(days)
}

/// Default expiry for built legs.
pub fn expiry() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 15).unwrap_or_default()
}

/// A one-contract leg expiring on [`expiry`].
pub fn leg(option_type: OptionType, position: LegPosition, strike: Decimal) -> OptionLeg {
    leg_expiring(option_type, position, strike, expiry())
}

pub fn leg_expiring(
    option_type: OptionType,
    position: LegPosition,
    strike: Decimal,
    expiry: NaiveDate,
) -> OptionLeg {
    OptionLeg::try_new(option_type, position, strike, expiry, 1)
        .unwrap_or_else(|e| panic!("test leg: {e}"))
}

/// Short put, long put on one expiry.
pub fn vertical_legs() -> Vec<OptionLeg> {
    vec![
        leg(OptionType::Put, LegPosition::Short, Decimal::from(100)),
        leg(OptionType::Put, LegPosition::Long, Decimal::from(95)),
    ]
}

/// Long put, short put, short call, long call on one expiry.
pub fn condor_legs() -> Vec<OptionLeg> {
    vec![
        leg(OptionType::Put, LegPosition::Long, Decimal::from(90)),
        leg(OptionType::Put, LegPosition::Short, Decimal::from(95)),
        leg(OptionType::Call, LegPosition::Short, Decimal::from(105)),
        leg(OptionType::Call, LegPosition::Long, Decimal::from(110)),
    ]
}

/// Closed trade opened on `opened` and closed on `closed` (days from base),
/// with a credit for a non-negative `pnl` and a debit otherwise.
pub fn closed_trade(user: &UserId, opened: i64, closed: i64, pnl: Decimal) -> Trade {
    let trade = Trade::new(user.clone(), "SPY", day(opened)).closed(day(closed));
    if pnl >= Decimal::ZERO {
        trade.with_credit(pnl)
    } else {
        trade.with_debit(-pnl)
    }
}

/// Open trade with a credit and no close.
pub fn open_trade(user: &UserId, opened: i64, credit: Decimal) -> Trade {
    Trade::new(user.clone(), "SPY", day(opened)).with_credit(credit)
}

/// Attach legs to a trade.
pub fn with_legs(trade: Trade, legs: Vec<OptionLeg>) -> Trade {
    legs.into_iter().fold(trade, Trade::with_leg)
}
