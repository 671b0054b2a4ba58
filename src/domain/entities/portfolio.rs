use serde::{Deserialize, Serialize};

use super::position::Position;

/// Complete backend-reported portfolio state, replaced wholesale on every
/// poll and every `portfolio_update` push.
///
/// `total_balance` is expected to equal `cash_balance + positions_value`
/// but that is the backend's concern; nothing here enforces it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    #[serde(default)]
    pub total_balance: Option<f64>,
    #[serde(default)]
    pub cash_balance: Option<f64>,
    #[serde(default)]
    pub positions_value: Option<f64>,
    #[serde(default)]
    pub positions: Vec<Position>,
    #[serde(default)]
    pub total_pnl: Option<f64>,
    #[serde(default)]
    pub total_pnl_percentage: Option<f64>,
    #[serde(default)]
    pub initial_balance: Option<f64>,
    #[serde(default)]
    pub total_trades: Option<u64>,
    #[serde(default)]
    pub win_rate: Option<f64>,
}
