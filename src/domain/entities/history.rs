use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::timestamp;

/// One sampled portfolio snapshot for the balance trend chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub cash_balance: Option<f64>,
    #[serde(default)]
    pub total_balance: Option<f64>,
    #[serde(default)]
    pub positions_value: Option<f64>,
    #[serde(default)]
    pub total_profit_loss: Option<f64>,
    #[serde(default)]
    pub win_rate: Option<f64>,
    #[serde(default)]
    pub total_trades: Option<u64>,
}
