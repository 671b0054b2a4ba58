use serde::{Deserialize, Serialize};

/// Direction of an open holding. Anything the backend sends other than
/// `short` is treated as a long position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PositionType {
    #[default]
    Long,
    Short,
}

impl From<String> for PositionType {
    fn from(value: String) -> Self {
        if value.eq_ignore_ascii_case("short") {
            PositionType::Short
        } else {
            PositionType::Long
        }
    }
}

impl From<PositionType> for String {
    fn from(value: PositionType) -> Self {
        value.to_string()
    }
}

impl std::fmt::Display for PositionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PositionType::Long => write!(f, "long"),
            PositionType::Short => write!(f, "short"),
        }
    }
}

/// Open holding as reported inside a portfolio snapshot.
///
/// Numeric fields are optional because the backend occasionally emits
/// `null` while an exchange query is still pending; consumers render a
/// placeholder for those instead of failing the whole snapshot.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub position_type: PositionType,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub average_price: Option<f64>,
    #[serde(default)]
    pub current_price: Option<f64>,
    /// Backend's own figure; the dashboard recomputes P&L and only keeps
    /// this for diagnostics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unrealized_pnl: Option<f64>,
}

impl Position {
    pub fn new(
        symbol: &str,
        position_type: PositionType,
        amount: f64,
        average_price: f64,
        current_price: f64,
    ) -> Self {
        Self {
            symbol: symbol.to_string(),
            position_type,
            amount: Some(amount),
            average_price: Some(average_price),
            current_price: Some(current_price),
            unrealized_pnl: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_type_defaults_to_long() {
        assert_eq!(PositionType::from("short".to_string()), PositionType::Short);
        assert_eq!(PositionType::from("long".to_string()), PositionType::Long);
        assert_eq!(PositionType::from("hedged".to_string()), PositionType::Long);
    }

    #[test]
    fn test_position_decodes_with_nulls() {
        let json = r#"{"symbol":"ETHUSDT","position_type":"short","amount":-1.5,"average_price":null}"#;
        let position: Position = serde_json::from_str(json).unwrap();
        assert_eq!(position.position_type, PositionType::Short);
        assert_eq!(position.amount, Some(-1.5));
        assert_eq!(position.average_price, None);
        assert_eq!(position.current_price, None);
    }

    #[test]
    fn test_position_without_type_is_long() {
        let position: Position = serde_json::from_str(r#"{"symbol":"BTCUSDT","amount":1.0}"#).unwrap();
        assert_eq!(position.position_type, PositionType::Long);
    }
}
