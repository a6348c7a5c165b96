//! Metric aggregation over a user's trade history.
//!
//! [`aggregate`] is a pure function: it reads the trades it is given and
//! returns a fresh [`AnalyticsSnapshot`]. Only closed trades (those with a
//! close timestamp) contribute to any figure.
//!
//! Sums are kept at full precision and rounded to two decimal places only
//! when a figure is emitted.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::archetype::{classify, Archetype};
use crate::domain::money::{ratio_or_zero, round_money};
use crate::domain::snapshot::{
    AnalyticsSnapshot, EquityPoint, HoldingTally, StrategyBreakdown, Totals,
};
use crate::domain::trade::Trade;

const SECONDS_PER_DAY: i64 = 86_400;

/// Whole days a closed trade was held, rounded to the nearest day.
///
/// A missing close falls back to the open time, and negative spans count
/// as zero.
#[must_use]
pub fn holding_days(trade: &Trade) -> i64 {
    let closed_at = trade.closed_at.unwrap_or(trade.opened_at);
    let seconds = (closed_at - trade.opened_at).num_seconds();
    if seconds <= 0 {
        return 0;
    }
    (seconds + SECONDS_PER_DAY / 2) / SECONDS_PER_DAY
}

/// Win/loss tally for a group of closed trades.
#[derive(Debug, Clone, Copy, Default)]
struct Tally {
    count: u64,
    wins: u64,
    losses: u64,
    pnl_sum: Decimal,
    win_sum: Decimal,
    loss_sum: Decimal,
}

impl Tally {
    fn record(&mut self, pnl: Decimal) {
        self.count += 1;
        self.pnl_sum += pnl;
        if pnl > Decimal::ZERO {
            self.wins += 1;
            self.win_sum += pnl;
        } else if pnl < Decimal::ZERO {
            self.losses += 1;
            self.loss_sum += pnl.abs();
        }
    }

    fn average_pnl(&self) -> Decimal {
        ratio_or_zero(self.pnl_sum, Decimal::from(self.count))
    }

    fn win_fraction(&self) -> Decimal {
        ratio_or_zero(Decimal::from(self.wins), Decimal::from(self.count))
    }

    /// `avg_win * p - avg_loss * (1 - p)` with `p` the unrounded win fraction.
    fn expectancy(&self) -> Decimal {
        if self.count == 0 {
            return Decimal::ZERO;
        }
        let avg_win = ratio_or_zero(self.win_sum, Decimal::from(self.wins));
        let avg_loss = ratio_or_zero(self.loss_sum, Decimal::from(self.losses));
        let p = self.win_fraction();
        avg_win * p - avg_loss * (Decimal::ONE - p)
    }
}

/// Compute the analytics snapshot for one user's trade history.
#[must_use]
pub fn aggregate(trades: &[Trade], generated_at: DateTime<Utc>) -> AnalyticsSnapshot {
    let closed: Vec<&Trade> = trades.iter().filter(|t| t.is_closed()).collect();

    let mut overall = Tally::default();
    let mut pct_sum = Decimal::ZERO;
    let mut hold_sum: i64 = 0;
    let mut holding = HoldingTally::default();
    // First-seen order is the tie-break for the breakdown sort.
    let mut groups: Vec<(Archetype, Tally)> = Vec::new();

    for trade in &closed {
        let pnl = trade.pnl();
        overall.record(pnl);
        pct_sum += trade.pnl_pct();

        let days = holding_days(trade);
        hold_sum += days;
        holding.record(days);

        let archetype = classify(&trade.legs);
        match groups.iter_mut().find(|(a, _)| *a == archetype) {
            Some((_, tally)) => tally.record(pnl),
            None => {
                let mut tally = Tally::default();
                tally.record(pnl);
                groups.push((archetype, tally));
            }
        }
    }

    let count = Decimal::from(overall.count);
    let totals = Totals {
        closed_trades: overall.count,
        win_rate: round_money(overall.win_fraction() * Decimal::ONE_HUNDRED),
        average_pnl: round_money(overall.average_pnl()),
        average_pnl_pct: round_money(ratio_or_zero(pct_sum, count)),
        expectancy: round_money(overall.expectancy()),
        average_hold_days: round_money(ratio_or_zero(Decimal::from(hold_sum), count)),
    };

    groups.sort_by(|(_, a), (_, b)| b.count.cmp(&a.count));
    let strategy_breakdown = groups
        .into_iter()
        .map(|(strategy, tally)| StrategyBreakdown {
            strategy,
            total: tally.count,
            wins: tally.wins,
            losses: tally.losses,
            average_pnl: round_money(tally.average_pnl()),
        })
        .collect();

    AnalyticsSnapshot {
        generated_at,
        totals,
        strategy_breakdown,
        equity_curve: equity_curve(&closed),
        holding_periods: holding.into_buckets(),
    }
}

/// Running P&L over closed trades in close-date order.
fn equity_curve(closed: &[&Trade]) -> Vec<EquityPoint> {
    let mut ordered = closed.to_vec();
    ordered.sort_by_key(|t| t.closed_at.unwrap_or(t.opened_at));

    let mut running = Decimal::ZERO;
    ordered
        .into_iter()
        .map(|trade| {
            running += trade.pnl();
            EquityPoint {
                date: trade.closed_at.unwrap_or(trade.opened_at).date_naive(),
                cumulative_pnl: round_money(running),
            }
        })
        .collect()
}
