//! Rendering of analytics summaries for `summary` and `refresh`.

use serde_json::json;
use tabled::{Table, Tabled};

use crate::adapter::inbound::cli::context::Context;
use crate::adapter::inbound::cli::output;
use crate::domain::id::UserId;
use crate::domain::snapshot::SnapshotSummary;
use crate::error::Result;

/// Equity curve points shown in text mode.
const EQUITY_TAIL: usize = 10;

#[derive(Tabled)]
struct BreakdownRow {
    #[tabled(rename = "Strategy")]
    strategy: &'static str,
    #[tabled(rename = "Trades")]
    total: u64,
    #[tabled(rename = "Wins")]
    wins: u64,
    #[tabled(rename = "Losses")]
    losses: u64,
    #[tabled(rename = "Avg P&L")]
    average_pnl: String,
}

#[derive(Tabled)]
struct BucketRow {
    #[tabled(rename = "Held")]
    label: &'static str,
    #[tabled(rename = "Trades")]
    count: u64,
}

/// Execute `summary`: serve the cached snapshot or recompute a stale one.
pub async fn execute_summary(ctx: &Context, user: &str) -> Result<()> {
    let user_id = UserId::new(user);
    let summary = ctx.service.get_summary(&user_id).await?;
    render("summary", &user_id, &summary)
}

/// Execute `refresh`: recompute regardless of cache state.
pub async fn execute_refresh(ctx: &Context, user: &str) -> Result<()> {
    let user_id = UserId::new(user);
    let pb = output::spinner(&format!("Recomputing analytics for {user_id}"));
    match ctx.service.force_recalculate(&user_id).await {
        Ok(summary) => {
            output::spinner_success(&pb, "Analytics recomputed");
            render("refresh", &user_id, &summary)
        }
        Err(e) => {
            output::spinner_fail(&pb, "Recomputation failed");
            Err(e)
        }
    }
}

fn render(command: &str, user_id: &UserId, summary: &SnapshotSummary) -> Result<()> {
    if output::is_json() {
        output::json_output(json!({
            "command": command,
            "userId": user_id,
            "summary": serde_json::to_value(summary)?,
        }));
        return Ok(());
    }
    if output::is_quiet() {
        return Ok(());
    }

    output::header(env!("CARGO_PKG_VERSION"));
    output::field("User", user_id);
    output::field("Report date", summary.report_date);
    output::field(
        "Calculated",
        summary.calculated_at.format("%Y-%m-%d %H:%M:%S UTC"),
    );
    output::field(
        "Source",
        if summary.refreshed {
            "recomputed"
        } else {
            "cached"
        },
    );

    let totals = &summary.data.totals;
    output::section("Totals");
    output::field("Closed trades", totals.closed_trades);
    output::field("Win rate", format!("{}%", totals.win_rate));
    output::field("Avg P&L", output::signed(totals.average_pnl));
    output::field("Avg P&L %", output::signed(totals.average_pnl_pct));
    output::field("Expectancy", output::signed(totals.expectancy));
    output::field("Avg hold", format!("{} days", totals.average_hold_days));

    if summary.data.strategy_breakdown.is_empty() {
        output::note("No closed trades yet");
        return Ok(());
    }

    output::section("By strategy");
    let rows: Vec<BreakdownRow> = summary
        .data
        .strategy_breakdown
        .iter()
        .map(|b| BreakdownRow {
            strategy: b.strategy.as_str(),
            total: b.total,
            wins: b.wins,
            losses: b.losses,
            average_pnl: b.average_pnl.to_string(),
        })
        .collect();
    output::lines(&Table::new(rows).to_string());

    output::section("Holding periods");
    let buckets: Vec<BucketRow> = summary
        .data
        .holding_periods
        .iter()
        .map(|b| BucketRow {
            label: b.label.label(),
            count: b.count,
        })
        .collect();
    output::lines(&Table::new(buckets).to_string());

    output::section("Equity curve");
    let curve = &summary.data.equity_curve;
    let skipped = curve.len().saturating_sub(EQUITY_TAIL);
    if skipped > 0 {
        output::note(&format!("{skipped} earlier points omitted"));
    }
    for point in &curve[skipped..] {
        output::field(&point.date.to_string(), output::signed(point.cumulative_pnl));
    }

    Ok(())
}
