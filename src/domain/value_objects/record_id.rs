use serde::{Deserialize, Serialize};

/// Backend record identifier. The trading backend emits integer primary
/// keys, but string ids are accepted so a different store can sit behind
/// the same API.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{}", n),
            RecordId::Text(s) => write!(f, "{}", s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_id_accepts_numbers_and_strings() {
        let id: RecordId = serde_json::from_str("42").unwrap();
        assert_eq!(id, RecordId::Number(42));

        let id: RecordId = serde_json::from_str("\"tx-9\"").unwrap();
        assert_eq!(id, RecordId::Text("tx-9".to_string()));
    }

    #[test]
    fn test_number_and_text_ids_are_distinct() {
        assert_ne!(RecordId::Number(7), RecordId::Text("7".to_string()));
    }
}
