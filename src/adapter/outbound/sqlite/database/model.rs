//! Database model types for Diesel ORM.
//!
//! Decimals are stored as their canonical string form and timestamps as
//! RFC 3339 text.

use diesel::prelude::*;

use super::schema::{analytics_snapshots, option_legs, trades, users};

/// Database row for a journal user.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserRow {
    pub id: String,
    pub display_name: Option<String>,
    pub created_at: String,
}

/// Database row for a trade.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = trades)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TradeRow {
    pub id: String,
    pub user_id: String,
    pub symbol: String,
    pub strategy: Option<String>,
    pub status: String,
    pub opened_at: String,
    pub closed_at: Option<String>,
    pub net_credit: Option<String>,
    pub net_debit: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
}

/// Database row for an option leg (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = option_legs)]
pub struct NewLegRow {
    pub trade_id: String,
    pub leg_index: i32,
    pub option_type: String,
    pub position: String,
    pub strike: String,
    pub expiry: String,
    pub quantity: i32,
    pub price: Option<String>,
}

/// Database row for an option leg (queryable).
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = option_legs)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct LegRow {
    pub id: Option<i32>,
    pub trade_id: String,
    pub leg_index: i32,
    pub option_type: String,
    pub position: String,
    pub strike: String,
    pub expiry: String,
    pub quantity: i32,
    pub price: Option<String>,
}

/// Database row for a stored analytics snapshot.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = analytics_snapshots)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SnapshotRow {
    pub user_id: String,
    pub label: String,
    pub report_date: String,
    pub payload: String,
    pub calculated_at: String,
}
