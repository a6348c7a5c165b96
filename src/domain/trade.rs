//! Journaled option trades and their legs.
//!
//! A [`Trade`] is one user-entered journal entry: a ticker, an optional
//! free-text strategy name, lifecycle timestamps, the net premium and an
//! ordered list of [`OptionLeg`]s.
//!
//! # Closed trades
//!
//! Analytics treat a trade as closed iff it carries a `closed_at` timestamp.
//! The [`TradeStatus`] field is user-managed and is not consulted.
//!
//! # Examples
//!
//! ```
//! use chrono::{NaiveDate, TimeZone, Utc};
//! use rust_decimal_macros::dec;
//! use strikebook::domain::id::UserId;
//! use strikebook::domain::trade::{LegPosition, OptionLeg, OptionType, Trade};
//!
//! let expiry = NaiveDate::from_ymd_opt(2024, 2, 16).unwrap();
//! let leg = OptionLeg::try_new(OptionType::Put, LegPosition::Short, dec!(180), expiry, 1).unwrap();
//!
//! let trade = Trade::new(UserId::new("u1"), "AAPL", Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
//!     .with_credit(dec!(250))
//!     .with_leg(leg);
//!
//! assert_eq!(trade.pnl(), dec!(250));
//! assert!(!trade.is_closed());
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::id::{TradeId, UserId};

/// Call or put.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Call => "call",
            Self::Put => "put",
        }
    }
}

impl FromStr for OptionType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "call" => Ok(Self::Call),
            "put" => Ok(Self::Put),
            other => Err(DomainError::UnknownVariant {
                kind: "option type",
                value: other.to_string(),
            }),
        }
    }
}

/// Long (bought) or short (sold) exposure on a leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegPosition {
    Long,
    Short,
}

impl LegPosition {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Long => "long",
            Self::Short => "short",
        }
    }
}

impl FromStr for LegPosition {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "long" => Ok(Self::Long),
            "short" => Ok(Self::Short),
            other => Err(DomainError::UnknownVariant {
                kind: "leg position",
                value: other.to_string(),
            }),
        }
    }
}

/// User-managed lifecycle label of a trade.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeStatus {
    #[default]
    Open,
    Closed,
    Rolled,
}

impl TradeStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Rolled => "rolled",
        }
    }
}

impl fmt::Display for TradeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TradeStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "closed" => Ok(Self::Closed),
            "rolled" => Ok(Self::Rolled),
            other => Err(DomainError::UnknownVariant {
                kind: "trade status",
                value: other.to_string(),
            }),
        }
    }
}

/// One option contract line of a trade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionLeg {
    pub option_type: OptionType,
    pub position: LegPosition,
    pub strike: Decimal,
    pub expiry: NaiveDate,
    quantity: u32,
    /// Premium per contract, if the user recorded it.
    pub price: Option<Decimal>,
}

impl OptionLeg {
    /// Create a leg, validating that the quantity is positive.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::NonPositiveQuantity`] for a zero or negative
    /// quantity.
    pub fn try_new(
        option_type: OptionType,
        position: LegPosition,
        strike: Decimal,
        expiry: NaiveDate,
        quantity: i64,
    ) -> Result<Self, DomainError> {
        let quantity = u32::try_from(quantity)
            .ok()
            .filter(|q| *q > 0)
            .ok_or(DomainError::NonPositiveQuantity { quantity })?;

        Ok(Self {
            option_type,
            position,
            strike,
            expiry,
            quantity,
            price: None,
        })
    }

    /// Attach the recorded per-contract premium.
    #[must_use]
    pub fn with_price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    /// Number of contracts on this leg (always positive).
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }
}

/// Net premium of a trade: received (credit) or paid (debit).
///
/// Modelling the premium as a single enum makes a trade that is both a
/// credit and a debit unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetPremium {
    Credit(Decimal),
    Debit(Decimal),
}

impl NetPremium {
    /// Build from the two nullable storage columns.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::CreditAndDebit`] if both columns are set.
    pub fn from_columns(
        net_credit: Option<Decimal>,
        net_debit: Option<Decimal>,
    ) -> Result<Option<Self>, DomainError> {
        match (net_credit, net_debit) {
            (Some(credit), Some(debit)) => Err(DomainError::CreditAndDebit { credit, debit }),
            (Some(credit), None) => Ok(Some(Self::Credit(credit))),
            (None, Some(debit)) => Ok(Some(Self::Debit(debit))),
            (None, None) => Ok(None),
        }
    }

    #[must_use]
    pub const fn credit(&self) -> Option<Decimal> {
        match self {
            Self::Credit(amount) => Some(*amount),
            Self::Debit(_) => None,
        }
    }

    #[must_use]
    pub const fn debit(&self) -> Option<Decimal> {
        match self {
            Self::Debit(amount) => Some(*amount),
            Self::Credit(_) => None,
        }
    }
}

/// A journaled option trade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trade {
    pub id: TradeId,
    pub user_id: UserId,
    pub symbol: String,
    /// Free-text strategy name typed by the user.
    pub strategy: Option<String>,
    pub status: TradeStatus,
    pub opened_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    pub premium: Option<NetPremium>,
    pub notes: Option<String>,
    /// Legs in insertion order.
    pub legs: Vec<OptionLeg>,
}

impl Trade {
    /// Start a new open trade with a generated ID and no legs.
    pub fn new(user_id: UserId, symbol: impl Into<String>, opened_at: DateTime<Utc>) -> Self {
        Self {
            id: TradeId::new(),
            user_id,
            symbol: symbol.into(),
            strategy: None,
            status: TradeStatus::Open,
            opened_at,
            closed_at: None,
            premium: None,
            notes: None,
            legs: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: TradeId) -> Self {
        self.id = id;
        self
    }

    #[must_use]
    pub fn with_leg(mut self, leg: OptionLeg) -> Self {
        self.legs.push(leg);
        self
    }

    #[must_use]
    pub fn with_credit(mut self, amount: Decimal) -> Self {
        self.premium = Some(NetPremium::Credit(amount));
        self
    }

    #[must_use]
    pub fn with_debit(mut self, amount: Decimal) -> Self {
        self.premium = Some(NetPremium::Debit(amount));
        self
    }

    #[must_use]
    pub fn with_strategy(mut self, strategy: impl Into<String>) -> Self {
        self.strategy = Some(strategy.into());
        self
    }

    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: TradeStatus) -> Self {
        self.status = status;
        self
    }

    /// Record the close timestamp. Does not touch `status`.
    #[must_use]
    pub fn closed(mut self, closed_at: DateTime<Utc>) -> Self {
        self.closed_at = Some(closed_at);
        self
    }

    /// Validate invariants that the builder methods cannot enforce.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::EmptySymbol`] for a blank ticker.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.symbol.trim().is_empty() {
            return Err(DomainError::EmptySymbol);
        }
        Ok(())
    }

    /// Closed for analytics purposes: a close timestamp is present.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.closed_at.is_some()
    }

    #[must_use]
    pub fn net_credit(&self) -> Option<Decimal> {
        self.premium.and_then(|p| p.credit())
    }

    #[must_use]
    pub fn net_debit(&self) -> Option<Decimal> {
        self.premium.and_then(|p| p.debit())
    }

    /// Realized P&L: net credit minus net debit, missing amounts count as zero.
    #[must_use]
    pub fn pnl(&self) -> Decimal {
        self.net_credit().unwrap_or_default() - self.net_debit().unwrap_or_default()
    }

    /// Denominator for percentage return.
    ///
    /// `|debit|` if non-zero, else `|credit|` if non-zero, else one.
    #[must_use]
    pub fn pnl_basis(&self) -> Decimal {
        let debit = self.net_debit().unwrap_or_default().abs();
        if !debit.is_zero() {
            return debit;
        }
        let credit = self.net_credit().unwrap_or_default().abs();
        if !credit.is_zero() {
            return credit;
        }
        Decimal::ONE
    }

    /// Percentage return on the basis, at full precision.
    #[must_use]
    pub fn pnl_pct(&self) -> Decimal {
        self.pnl() / self.pnl_basis() * Decimal::ONE_HUNDRED
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn opened() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn expiry() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 16).unwrap()
    }

    fn trade() -> Trade {
        Trade::new(UserId::new("u1"), "SPY", opened())
    }

    #[test]
    fn leg_rejects_zero_and_negative_quantity() {
        let zero = OptionLeg::try_new(OptionType::Call, LegPosition::Long, dec!(100), expiry(), 0);
        assert_eq!(zero, Err(DomainError::NonPositiveQuantity { quantity: 0 }));

        let negative =
            OptionLeg::try_new(OptionType::Call, LegPosition::Long, dec!(100), expiry(), -2);
        assert_eq!(
            negative,
            Err(DomainError::NonPositiveQuantity { quantity: -2 })
        );
    }

    #[test]
    fn leg_keeps_quantity_and_price() {
        let leg = OptionLeg::try_new(OptionType::Put, LegPosition::Short, dec!(95), expiry(), 3)
            .unwrap()
            .with_price(dec!(1.25));
        assert_eq!(leg.quantity(), 3);
        assert_eq!(leg.price, Some(dec!(1.25)));
    }

    #[test]
    fn premium_from_columns_rejects_both_sides() {
        let result = NetPremium::from_columns(Some(dec!(1)), Some(dec!(2)));
        assert!(matches!(result, Err(DomainError::CreditAndDebit { .. })));
    }

    #[test]
    fn premium_from_columns_maps_each_side() {
        assert_eq!(
            NetPremium::from_columns(Some(dec!(1)), None).unwrap(),
            Some(NetPremium::Credit(dec!(1)))
        );
        assert_eq!(
            NetPremium::from_columns(None, Some(dec!(2))).unwrap(),
            Some(NetPremium::Debit(dec!(2)))
        );
        assert_eq!(NetPremium::from_columns(None, None).unwrap(), None);
    }

    #[test]
    fn pnl_is_credit_minus_debit() {
        assert_eq!(trade().with_credit(dec!(250)).pnl(), dec!(250));
        assert_eq!(trade().with_debit(dec!(120)).pnl(), dec!(-120));
        assert_eq!(trade().pnl(), Decimal::ZERO);
    }

    #[test]
    fn basis_prefers_debit_then_credit_then_one() {
        assert_eq!(trade().with_debit(dec!(-80)).pnl_basis(), dec!(80));
        assert_eq!(trade().with_credit(dec!(250)).pnl_basis(), dec!(250));
        assert_eq!(trade().with_debit(Decimal::ZERO).pnl_basis(), Decimal::ONE);
        assert_eq!(trade().pnl_basis(), Decimal::ONE);
    }

    #[test]
    fn pnl_pct_for_credit_trade_is_one_hundred() {
        assert_eq!(trade().with_credit(dec!(250)).pnl_pct(), dec!(100));
        assert_eq!(trade().with_debit(dec!(50)).pnl_pct(), dec!(-100));
        assert_eq!(trade().pnl_pct(), Decimal::ZERO);
    }

    #[test]
    fn closed_flag_follows_timestamp_not_status() {
        let open_with_date = trade().closed(opened());
        assert!(open_with_date.is_closed());
        assert_eq!(open_with_date.status, TradeStatus::Open);

        let closed_without_date = trade().with_status(TradeStatus::Closed);
        assert!(!closed_without_date.is_closed());
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("Rolled".parse::<TradeStatus>().unwrap(), TradeStatus::Rolled);
        assert!("expired".parse::<TradeStatus>().is_err());
    }

    #[test]
    fn validate_rejects_blank_symbol() {
        let blank = Trade::new(UserId::new("u1"), "  ", opened());
        assert_eq!(blank.validate(), Err(DomainError::EmptySymbol));
        assert!(trade().validate().is_ok());
    }
}
