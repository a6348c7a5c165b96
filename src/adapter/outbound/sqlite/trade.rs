//! SQLite trade journal.
//!
//! Owns both sides of the journal: the read path consumed by the analytics
//! engine and the writes used to populate it.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, PooledConnection};
use tracing::{debug, warn};

use super::convert::{
    format_date, format_timestamp, parse_date, parse_decimal, parse_optional_decimal,
    parse_timestamp,
};
use crate::adapter::outbound::sqlite::database::connection::DbPool;
use crate::adapter::outbound::sqlite::database::model::{LegRow, NewLegRow, TradeRow, UserRow};
use crate::adapter::outbound::sqlite::database::schema::{option_legs, trades, users};
use crate::domain::id::{TradeId, UserId};
use crate::domain::trade::{NetPremium, OptionLeg, Trade};
use crate::error::{Error, Result};
use crate::port::outbound::trade::{TradeRepository, UserDirectory};

type Conn = PooledConnection<ConnectionManager<SqliteConnection>>;

/// SQLite-backed trade journal.
pub struct SqliteTradeRepository {
    pool: DbPool,
}

impl SqliteTradeRepository {
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> Result<Conn> {
        self.pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))
    }

    /// Record a user. Returns `false` if the user already existed.
    ///
    /// # Errors
    /// Returns an error if the database is unavailable.
    pub fn register_user(&self, user_id: &UserId, display_name: Option<&str>) -> Result<bool> {
        let row = UserRow {
            id: user_id.to_string(),
            display_name: display_name.map(str::to_string),
            created_at: format_timestamp(Utc::now()),
        };
        let mut conn = self.conn()?;
        let inserted = diesel::insert_or_ignore_into(users::table)
            .values(&row)
            .execute(&mut conn)?;
        Ok(inserted > 0)
    }

    /// Insert a trade with its legs in one transaction, registering the
    /// owner if needed.
    ///
    /// # Errors
    /// Returns a domain error for an invalid trade, or a database error if
    /// the trade id already exists.
    pub fn insert_trade(&self, trade: &Trade) -> Result<()> {
        self.insert_trades(std::slice::from_ref(trade))
    }

    /// Insert a batch of trades all-or-nothing.
    ///
    /// Every trade is validated before the transaction opens; any failure
    /// inside it rolls the whole batch back.
    ///
    /// # Errors
    /// Returns a domain error for an invalid trade, or a database error if
    /// any trade id already exists.
    pub fn insert_trades(&self, batch: &[Trade]) -> Result<()> {
        let now = Utc::now();
        let mut created_at = now;
        let mut owners: Vec<UserRow> = Vec::new();
        let mut rows = Vec::with_capacity(batch.len());
        for trade in batch {
            trade.validate()?;
            if !owners.iter().any(|u| u.id == trade.user_id.as_str()) {
                owners.push(UserRow {
                    id: trade.user_id.to_string(),
                    display_name: None,
                    created_at: format_timestamp(now),
                });
            }
            rows.push((Self::to_row(trade, created_at), Self::leg_rows(trade)?));
            // Distinct created_at values keep insertion order within a batch.
            created_at += Duration::nanoseconds(1);
        }

        let mut conn = self.conn()?;
        conn.transaction::<_, Error, _>(|conn| {
            for owner in &owners {
                diesel::insert_or_ignore_into(users::table)
                    .values(owner)
                    .execute(conn)?;
            }
            for (row, legs) in &rows {
                diesel::insert_into(trades::table).values(row).execute(conn)?;
                for leg in legs {
                    diesel::insert_into(option_legs::table)
                        .values(leg)
                        .execute(conn)?;
                }
            }
            Ok(())
        })?;
        debug!(trades = rows.len(), "Inserted trade batch");
        Ok(())
    }

    /// Delete a trade and its legs. Returns `false` if it did not exist.
    ///
    /// # Errors
    /// Returns an error if the database is unavailable.
    pub fn delete_trade(&self, trade_id: &TradeId) -> Result<bool> {
        let mut conn = self.conn()?;
        let deleted = diesel::delete(trades::table.find(trade_id.as_str())).execute(&mut conn)?;
        Ok(deleted > 0)
    }

    fn to_row(trade: &Trade, created_at: DateTime<Utc>) -> TradeRow {
        TradeRow {
            id: trade.id.to_string(),
            user_id: trade.user_id.to_string(),
            symbol: trade.symbol.clone(),
            strategy: trade.strategy.clone(),
            status: trade.status.as_str().to_string(),
            opened_at: format_timestamp(trade.opened_at),
            closed_at: trade.closed_at.map(format_timestamp),
            net_credit: trade.net_credit().map(|d| d.to_string()),
            net_debit: trade.net_debit().map(|d| d.to_string()),
            notes: trade.notes.clone(),
            created_at: format_timestamp(created_at),
        }
    }

    fn leg_rows(trade: &Trade) -> Result<Vec<NewLegRow>> {
        trade
            .legs
            .iter()
            .enumerate()
            .map(|(index, leg)| {
                let quantity = i32::try_from(leg.quantity()).map_err(|_| {
                    Error::Parse(format!("leg quantity {} too large", leg.quantity()))
                })?;
                let leg_index = i32::try_from(index)
                    .map_err(|_| Error::Parse(format!("too many legs on trade {}", trade.id)))?;
                Ok(NewLegRow {
                    trade_id: trade.id.to_string(),
                    leg_index,
                    option_type: leg.option_type.as_str().to_string(),
                    position: leg.position.as_str().to_string(),
                    strike: leg.strike.to_string(),
                    expiry: format_date(leg.expiry),
                    quantity,
                    price: leg.price.map(|p| p.to_string()),
                })
            })
            .collect()
    }

    fn leg_from_row(row: LegRow) -> Result<OptionLeg> {
        let leg = OptionLeg::try_new(
            row.option_type.parse()?,
            row.position.parse()?,
            parse_decimal("strike", &row.strike)?,
            parse_date("expiry", &row.expiry)?,
            i64::from(row.quantity),
        )?;
        Ok(match parse_optional_decimal("price", row.price.as_deref())? {
            Some(price) => leg.with_price(price),
            None => leg,
        })
    }

    /// Resolve the lifecycle timestamps of a row.
    ///
    /// An unreadable `opened_at` borrows the close time (or the insertion
    /// time for an open trade) and an unreadable `closed_at` borrows the
    /// open time, so a damaged row holds for zero days instead of failing
    /// the whole history. `None` only when no column can be read.
    fn resolve_dates(row: &TradeRow) -> Option<(DateTime<Utc>, Option<DateTime<Utc>>)> {
        let parsed_close = row.closed_at.as_deref().map(|raw| (raw, parse_timestamp(raw)));

        let opened_at = match parse_timestamp(&row.opened_at) {
            Some(at) => at,
            None => {
                let fallback = parsed_close
                    .and_then(|(_, at)| at)
                    .or_else(|| parse_timestamp(&row.created_at))?;
                warn!(
                    trade_id = %row.id,
                    opened_at = %row.opened_at,
                    "Unparseable opened_at, holding period treated as zero"
                );
                fallback
            }
        };

        let closed_at = parsed_close.map(|(raw, at)| {
            at.unwrap_or_else(|| {
                warn!(
                    trade_id = %row.id,
                    closed_at = raw,
                    "Unparseable closed_at, treating trade as closed on its open date"
                );
                opened_at
            })
        });

        Some((opened_at, closed_at))
    }

    fn from_rows(row: TradeRow, legs: Vec<LegRow>) -> Result<Option<Trade>> {
        let Some((opened_at, closed_at)) = Self::resolve_dates(&row) else {
            warn!(trade_id = %row.id, "No readable timestamp, trade skipped");
            return Ok(None);
        };
        let premium = NetPremium::from_columns(
            parse_optional_decimal("net_credit", row.net_credit.as_deref())?,
            parse_optional_decimal("net_debit", row.net_debit.as_deref())?,
        )?;
        let legs = legs
            .into_iter()
            .map(Self::leg_from_row)
            .collect::<Result<Vec<_>>>()?;

        Ok(Some(Trade {
            id: TradeId::from(row.id),
            user_id: UserId::from(row.user_id),
            symbol: row.symbol,
            strategy: row.strategy,
            status: row.status.parse()?,
            opened_at,
            closed_at,
            premium,
            notes: row.notes,
            legs,
        }))
    }
}

#[async_trait]
impl TradeRepository for SqliteTradeRepository {
    async fn list_trades(&self, user_id: &UserId) -> Result<Vec<Trade>> {
        let mut conn = self.conn()?;

        let rows: Vec<TradeRow> = trades::table
            .filter(trades::user_id.eq(user_id.as_str()))
            .order_by(trades::created_at.asc())
            .select(TradeRow::as_select())
            .load(&mut conn)?;
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        let leg_rows: Vec<LegRow> = option_legs::table
            .filter(option_legs::trade_id.eq_any(ids))
            .order_by((option_legs::trade_id.asc(), option_legs::leg_index.asc()))
            .select(LegRow::as_select())
            .load(&mut conn)?;

        let mut legs_by_trade: HashMap<String, Vec<LegRow>> = HashMap::new();
        for leg in leg_rows {
            legs_by_trade.entry(leg.trade_id.clone()).or_default().push(leg);
        }

        let mut trades = rows
            .into_iter()
            .filter_map(|row| {
                let legs = legs_by_trade.remove(&row.id).unwrap_or_default();
                Self::from_rows(row, legs).transpose()
            })
            .collect::<Result<Vec<_>>>()?;
        // Stable: trades opened at the same instant keep insertion order.
        trades.sort_by_key(|t| t.opened_at);
        Ok(trades)
    }
}

#[async_trait]
impl UserDirectory for SqliteTradeRepository {
    async fn list_users(&self) -> Result<Vec<UserId>> {
        let mut conn = self.conn()?;
        let ids: Vec<String> = users::table
            .select(users::id)
            .order_by(users::id.asc())
            .load(&mut conn)?;
        Ok(ids.into_iter().map(UserId::from).collect())
    }
}
