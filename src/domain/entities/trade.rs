use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::record_id::RecordId;
use crate::domain::value_objects::timestamp;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TradeSide {
    Buy,
    Sell,
    Short,
    Cover,
    /// Absent or empty side.
    #[default]
    Unknown,
    /// Side string with no mapping, kept verbatim.
    Other(String),
}

impl From<String> for TradeSide {
    fn from(value: String) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "buy" => TradeSide::Buy,
            "sell" => TradeSide::Sell,
            "short" => TradeSide::Short,
            "cover" => TradeSide::Cover,
            "" => TradeSide::Unknown,
            _ => TradeSide::Other(value),
        }
    }
}

impl From<TradeSide> for String {
    fn from(value: TradeSide) -> Self {
        match value {
            TradeSide::Buy => "buy".to_string(),
            TradeSide::Sell => "sell".to_string(),
            TradeSide::Short => "short".to_string(),
            TradeSide::Cover => "cover".to_string(),
            TradeSide::Unknown => String::new(),
            TradeSide::Other(raw) => raw,
        }
    }
}

fn default_success() -> bool {
    true
}

/// Executed trade record. Push-channel trades omit `ai_model` and
/// `success`; those fall back to an empty label and a successful fill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub id: RecordId,
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub side: TradeSide,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub total_value: Option<f64>,
    #[serde(default)]
    pub profit_loss: Option<f64>,
    #[serde(default)]
    pub profit_loss_percentage: Option<f64>,
    #[serde(default)]
    pub ai_model: String,
    #[serde(default)]
    pub ai_reasoning: String,
    #[serde(default = "default_success")]
    pub success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trade_from_rest_payload() {
        let json = r#"{
            "id": 17, "timestamp": "2024-05-01T12:00:00.5", "symbol": "BTCUSDT",
            "side": "short", "price": 61000.0, "amount": 0.001, "total_value": 61.0,
            "ai_model": "deepseek", "ai_reasoning": "breakdown", "success": false,
            "profit_loss": null, "profit_loss_percentage": null, "order_id": "abc"
        }"#;
        let trade: Trade = serde_json::from_str(json).unwrap();
        assert_eq!(trade.id, RecordId::Number(17));
        assert_eq!(trade.side, TradeSide::Short);
        assert!(!trade.success);
        assert_eq!(trade.profit_loss, None);
    }

    #[test]
    fn test_trade_from_push_payload_uses_defaults() {
        let json = r#"{"id": 18, "timestamp": "2024-05-01T12:01:00", "symbol": "ETHUSDT",
                       "side": "cover", "price": 3000.0, "amount": 0.1, "total_value": 300.0,
                       "profit_loss": 4.2, "profit_loss_percentage": 1.4}"#;
        let trade: Trade = serde_json::from_str(json).unwrap();
        assert!(trade.success);
        assert_eq!(trade.ai_model, "");
        assert_eq!(trade.side, TradeSide::Cover);
    }

    #[test]
    fn test_unmapped_side_is_kept() {
        assert_eq!(TradeSide::from("liquidation".to_string()), TradeSide::Other("liquidation".to_string()));
        assert_eq!(TradeSide::from(String::new()), TradeSide::Unknown);
        assert_eq!(String::from(TradeSide::Other("x".to_string())), "x");
    }
}
