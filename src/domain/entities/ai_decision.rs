use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::record_id::RecordId;
use crate::domain::value_objects::timestamp;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Decision {
    Buy,
    Sell,
    Hold,
    Short,
    Cover,
    Other(String),
}

impl From<String> for Decision {
    fn from(value: String) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "buy" => Decision::Buy,
            "sell" => Decision::Sell,
            "hold" => Decision::Hold,
            "short" => Decision::Short,
            "cover" => Decision::Cover,
            _ => Decision::Other(value),
        }
    }
}

impl From<Decision> for String {
    fn from(value: Decision) -> Self {
        match value {
            Decision::Buy => "buy".to_string(),
            Decision::Sell => "sell".to_string(),
            Decision::Hold => "hold".to_string(),
            Decision::Short => "short".to_string(),
            Decision::Cover => "cover".to_string(),
            Decision::Other(raw) => raw,
        }
    }
}

/// One decision emitted by the AI model, executed or not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AIDecision {
    pub id: RecordId,
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub ai_model: String,
    #[serde(default)]
    pub symbol: String,
    pub decision: Decision,
    /// In `[0, 1]` as produced by the model; not clamped here.
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default)]
    pub executed: bool,
}

impl AIDecision {
    pub fn confidence_percent(&self) -> f64 {
        self.confidence * 100.0
    }
}
