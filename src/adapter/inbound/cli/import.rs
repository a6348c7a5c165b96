//! Handler for `import`: load a JSON array of trades into the journal.
//!
//! ```json
//! [{
//!   "symbol": "SPY",
//!   "openedAt": "2024-03-01",
//!   "closedAt": "2024-03-08T15:30:00Z",
//!   "netCredit": "1.25",
//!   "legs": [{ "optionType": "put", "position": "short",
//!              "strike": "500", "expiry": "2024-03-15", "quantity": 1 }]
//! }]
//! ```
//!
//! Every record is validated before anything is written, and the whole file
//! is stored in one transaction.

use std::collections::HashSet;
use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;

use crate::adapter::inbound::cli::context::Context;
use crate::adapter::inbound::cli::output;
use crate::domain::id::{TradeId, UserId};
use crate::domain::trade::{LegPosition, NetPremium, OptionLeg, OptionType, Trade, TradeStatus};
use crate::error::{Error, Result};

/// A timestamp given either in full or as a calendar day (midnight UTC).
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
enum Timestamp {
    At(DateTime<Utc>),
    Day(NaiveDate),
}

impl Timestamp {
    fn to_utc(self) -> Result<DateTime<Utc>> {
        match self {
            Self::At(at) => Ok(at),
            Self::Day(day) => day
                .and_hms_opt(0, 0, 0)
                .map(|at| at.and_utc())
                .ok_or_else(|| Error::Parse(format!("invalid day {day}"))),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegRecord {
    option_type: OptionType,
    position: LegPosition,
    strike: Decimal,
    expiry: NaiveDate,
    quantity: i64,
    #[serde(default)]
    price: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TradeRecord {
    #[serde(default)]
    id: Option<String>,
    symbol: String,
    #[serde(default)]
    strategy: Option<String>,
    #[serde(default)]
    status: Option<TradeStatus>,
    opened_at: Timestamp,
    #[serde(default)]
    closed_at: Option<Timestamp>,
    #[serde(default)]
    net_credit: Option<Decimal>,
    #[serde(default)]
    net_debit: Option<Decimal>,
    #[serde(default)]
    notes: Option<String>,
    #[serde(default)]
    legs: Vec<LegRecord>,
}

impl TradeRecord {
    fn into_trade(self, user_id: &UserId) -> Result<Trade> {
        let legs = self
            .legs
            .into_iter()
            .map(|leg| {
                let built = OptionLeg::try_new(
                    leg.option_type,
                    leg.position,
                    leg.strike,
                    leg.expiry,
                    leg.quantity,
                )?;
                Ok(match leg.price {
                    Some(price) => built.with_price(price),
                    None => built,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let trade = Trade {
            id: self.id.map(TradeId::from).unwrap_or_default(),
            user_id: user_id.clone(),
            symbol: self.symbol,
            strategy: self.strategy,
            status: self.status.unwrap_or_default(),
            opened_at: self.opened_at.to_utc()?,
            closed_at: self.closed_at.map(Timestamp::to_utc).transpose()?,
            premium: NetPremium::from_columns(self.net_credit, self.net_debit)?,
            notes: self.notes,
            legs,
        };
        trade.validate()?;
        Ok(trade)
    }
}

/// Parse an import document into trades owned by `user_id`.
///
/// # Errors
/// Returns the first malformed or invalid record, by position.
pub fn parse_trades(content: &str, user_id: &UserId) -> Result<Vec<Trade>> {
    let records: Vec<TradeRecord> = serde_json::from_str(content)?;
    let mut seen = HashSet::new();
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            let trade = record
                .into_trade(user_id)
                .map_err(|e| Error::Parse(format!("trade #{}: {e}", index + 1)))?;
            if !seen.insert(trade.id.clone()) {
                return Err(Error::Parse(format!(
                    "trade #{}: duplicate id {}",
                    index + 1,
                    trade.id
                )));
            }
            Ok(trade)
        })
        .collect()
}

/// Execute `import`.
pub fn execute(ctx: &Context, user: &str, file: &Path) -> Result<()> {
    let user_id = UserId::new(user);
    let content = std::fs::read_to_string(file)?;
    let trades = parse_trades(&content, &user_id)?;

    ctx.journal.insert_trades(&trades)?;
    ctx.journal.register_user(&user_id, None)?;

    if output::is_json() {
        output::json_output(json!({
            "command": "import",
            "userId": user_id,
            "imported": trades.len(),
        }));
        return Ok(());
    }

    output::success(&format!("Imported {} trades for {user_id}", trades.len()));
    if !trades.is_empty() {
        output::note("Run `strikebook refresh` to include them in the summary now");
    }
    Ok(())
}
