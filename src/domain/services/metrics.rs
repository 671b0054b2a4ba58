//! Derived portfolio and position figures.
//!
//! Everything here is a pure function of the latest held state. Results are
//! recomputed on every render and never written back into the state.

use std::collections::HashMap;

use crate::domain::entities::market::MarketTick;
use crate::domain::entities::portfolio::PortfolioSnapshot;
use crate::domain::entities::position::{Position, PositionType};
use crate::domain::value_objects::pnl::{Percent, PnL};

/// Fixed baseline the dashboard measures performance against. The
/// snapshot's `initial_balance` is deliberately not used.
pub const REFERENCE_CAPITAL: f64 = 175.0;

/// Profit and loss of the wallet relative to the reference capital
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortfolioPnl {
    pub pnl: PnL,
    pub pnl_percentage: Percent,
}

/// Unrealized result of one open position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionPnl {
    pub pnl: PnL,
    pub pnl_percent: Percent,
}

/// A position together with its derived figures, one row of the
/// positions table.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionValuation<'a> {
    pub position: &'a Position,
    pub value: Option<f64>,
    pub pnl: Option<PositionPnl>,
}

/// `cash_balance - C` and `(cash_balance / C - 1) * 100`.
pub fn pnl_against_reference(cash_balance: f64, reference_capital: f64) -> PortfolioPnl {
    PortfolioPnl {
        pnl: PnL::new(cash_balance - reference_capital),
        pnl_percentage: Percent::new((cash_balance / reference_capital - 1.0) * 100.0),
    }
}

/// Portfolio P&L, or `None` when the snapshot carries no cash balance.
///
/// Backend-supplied `total_pnl` and `total_pnl_percentage` are ignored.
pub fn portfolio_pnl(snapshot: &PortfolioSnapshot, reference_capital: f64) -> Option<PortfolioPnl> {
    snapshot
        .cash_balance
        .map(|cash| pnl_against_reference(cash, reference_capital))
}

/// `|amount| * current_price`
pub fn position_value(position: &Position) -> Option<f64> {
    Some(position.amount?.abs() * position.current_price?)
}

/// Unrealized P&L of a position.
///
/// A zero `average_price` is not guarded: the percentage comes out as an
/// infinity or NaN and is carried through for display to handle.
pub fn position_pnl(position: &Position) -> Option<PositionPnl> {
    let amount = position.amount?;
    let average = position.average_price?;
    let current = position.current_price?;

    let (pnl, move_from_entry) = match position.position_type {
        PositionType::Short => ((average - current) * amount.abs(), average - current),
        PositionType::Long => ((current - average) * amount, current - average),
    };

    Some(PositionPnl {
        pnl: PnL::new(pnl),
        pnl_percent: Percent::new(move_from_entry / average * 100.0),
    })
}

pub fn value_positions(snapshot: &PortfolioSnapshot) -> Vec<PositionValuation<'_>> {
    snapshot
        .positions
        .iter()
        .map(|position| PositionValuation {
            position,
            value: position_value(position),
            pnl: position_pnl(position),
        })
        .collect()
}

/// Collapse repeated ticks to the latest one per symbol, then order by
/// 24h volume, highest first.
///
/// On equal timestamps the first tick seen is kept. Symbols with equal
/// volume keep their first-seen order; a missing volume sorts as zero.
pub fn latest_ticks_by_volume(ticks: Vec<MarketTick>) -> Vec<MarketTick> {
    let mut latest: Vec<MarketTick> = Vec::new();
    let mut index_by_symbol: HashMap<String, usize> = HashMap::new();

    for tick in ticks {
        match index_by_symbol.get(&tick.symbol) {
            Some(&idx) => {
                if tick.timestamp > latest[idx].timestamp {
                    latest[idx] = tick;
                }
            }
            None => {
                index_by_symbol.insert(tick.symbol.clone(), latest.len());
                latest.push(tick);
            }
        }
    }

    latest.sort_by(|a, b| {
        let va = a.volume_24h.unwrap_or(0.0);
        let vb = b.volume_24h.unwrap_or(0.0);
        vb.partial_cmp(&va).unwrap_or(std::cmp::Ordering::Equal)
    });
    latest
}
