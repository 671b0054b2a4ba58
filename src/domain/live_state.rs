//! Client-side mirror of backend state and the pure transitions applied to it.
//!
//! Only the sync controller produces new `LiveState` values; everything else
//! reads them. Both transitions return a fresh value so a subscriber never
//! observes a half-applied poll or push.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

use crate::domain::entities::ai_decision::AIDecision;
use crate::domain::entities::history::HistoryPoint;
use crate::domain::entities::portfolio::PortfolioSnapshot;
use crate::domain::entities::team::SystemStatus;
use crate::domain::entities::trade::Trade;
use crate::domain::errors::PushError;

/// Upper bound on the held trade list.
pub const MAX_HELD_TRADES: usize = 50;

pub const PORTFOLIO_UPDATE: &str = "portfolio_update";

/// State of the push channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LiveState {
    pub status: Option<SystemStatus>,
    pub portfolio: Option<PortfolioSnapshot>,
    /// Newest first, at most [`MAX_HELD_TRADES`] once a push has been merged.
    pub trades: Vec<Trade>,
    /// Chronological.
    pub history: Vec<HistoryPoint>,
    pub decisions: Vec<AIDecision>,
    pub push_channel: ConnectionState,
    pub last_poll: Option<DateTime<Utc>>,
}

/// Result of one complete five-endpoint fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct PollBatch {
    pub status: SystemStatus,
    pub portfolio: PortfolioSnapshot,
    pub trades: Vec<Trade>,
    pub history: Vec<HistoryPoint>,
    pub decisions: Vec<AIDecision>,
}

/// Decoded push-channel frame.
#[derive(Debug, Clone, PartialEq)]
pub enum PushEvent {
    PortfolioUpdate {
        snapshot: PortfolioSnapshot,
        recent_trades: Option<Vec<Trade>>,
        wallet_synced: bool,
    },
    /// Any other message type; ignored.
    Ignored { kind: String },
}

#[derive(Debug, Deserialize)]
struct PushEnvelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: Option<serde_json::Value>,
    #[serde(default)]
    recent_trades: Option<serde_json::Value>,
    #[serde(default)]
    wallet_synced: Option<bool>,
}

impl PushEvent {
    /// Decode one text frame. Payload fields are only inspected for message
    /// types that are handled, so unknown types never fail on their body.
    pub fn parse(raw: &str) -> Result<Self, PushError> {
        let envelope: PushEnvelope = serde_json::from_str(raw)?;

        if envelope.kind != PORTFOLIO_UPDATE {
            return Ok(PushEvent::Ignored { kind: envelope.kind });
        }

        let data = match envelope.data {
            Some(value) if !value.is_null() => value,
            _ => return Err(PushError::MissingPayload { kind: envelope.kind }),
        };
        let snapshot: PortfolioSnapshot = serde_json::from_value(data)?;
        let recent_trades = match envelope.recent_trades {
            Some(value) if !value.is_null() => Some(serde_json::from_value::<Vec<Trade>>(value)?),
            _ => None,
        };

        Ok(PushEvent::PortfolioUpdate {
            snapshot,
            recent_trades,
            wallet_synced: envelope.wallet_synced.unwrap_or(false),
        })
    }
}

/// Prepend the trades from `incoming` whose id is not already held, in the
/// order received, then keep the `cap` most recent entries.
///
/// Ids repeated inside `incoming` itself are only taken once.
pub fn merge_trades(held: &[Trade], incoming: &[Trade], cap: usize) -> Vec<Trade> {
    let mut known: HashSet<_> = held.iter().map(|t| &t.id).collect();

    let mut merged: Vec<Trade> = Vec::with_capacity((held.len() + incoming.len()).min(cap));
    for trade in incoming {
        if known.insert(&trade.id) {
            merged.push(trade.clone());
        }
    }
    let net_new = merged.len();

    merged.extend(held.iter().cloned());
    merged.truncate(cap);

    debug!(net_new, held = held.len(), kept = merged.len(), "merged pushed trades");
    merged
}

impl LiveState {
    /// Replace all five polled resources together.
    pub fn apply_poll(&self, batch: PollBatch) -> LiveState {
        LiveState {
            status: Some(batch.status),
            portfolio: Some(batch.portfolio),
            trades: batch.trades,
            history: batch.history,
            decisions: batch.decisions,
            push_channel: self.push_channel,
            last_poll: Some(Utc::now()),
        }
    }

    /// Reducer for push-channel events. The pushed snapshot is taken as
    /// authoritative and replaces the held one wholesale.
    pub fn apply_push(&self, event: &PushEvent) -> LiveState {
        match event {
            PushEvent::PortfolioUpdate {
                snapshot,
                recent_trades,
                ..
            } => {
                let trades = match recent_trades {
                    Some(incoming) => merge_trades(&self.trades, incoming, MAX_HELD_TRADES),
                    None => self.trades.clone(),
                };
                LiveState {
                    portfolio: Some(snapshot.clone()),
                    trades,
                    ..self.clone()
                }
            }
            PushEvent::Ignored { .. } => self.clone(),
        }
    }

    pub fn with_push_channel(&self, state: ConnectionState) -> LiveState {
        LiveState {
            push_channel: state,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_portfolio_update() {
        let raw = r#"{
            "type": "portfolio_update",
            "data": {"total_balance": 210.0, "cash_balance": 200.0, "positions_value": 10.0, "positions": []},
            "recent_trades": [{"id": 1, "timestamp": "2024-05-01T10:00:00", "symbol": "BTCUSDT", "side": "buy"}],
            "timestamp": "2024-05-01T10:00:01",
            "wallet_synced": true,
            "balance_source": "SDK"
        }"#;
        match PushEvent::parse(raw).unwrap() {
            PushEvent::PortfolioUpdate {
                snapshot,
                recent_trades,
                wallet_synced,
            } => {
                assert_eq!(snapshot.cash_balance, Some(200.0));
                assert_eq!(recent_trades.unwrap().len(), 1);
                assert!(wallet_synced);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_parse_without_recent_trades() {
        let raw = r#"{"type": "portfolio_update", "data": {"cash_balance": 1.0}}"#;
        match PushEvent::parse(raw).unwrap() {
            PushEvent::PortfolioUpdate {
                recent_trades,
                wallet_synced,
                ..
            } => {
                assert!(recent_trades.is_none());
                assert!(!wallet_synced);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_other_types_are_ignored_without_error() {
        let event = PushEvent::parse(r#"{"type": "heartbeat", "data": "not an object"}"#).unwrap();
        assert_eq!(
            event,
            PushEvent::Ignored {
                kind: "heartbeat".to_string()
            }
        );
    }

    #[test]
    fn test_malformed_frames_are_errors() {
        assert!(matches!(PushEvent::parse("not json"), Err(PushError::MessageParse(_))));
        assert!(matches!(
            PushEvent::parse(r#"{"type": "portfolio_update"}"#),
            Err(PushError::MissingPayload { .. })
        ));
        assert!(matches!(
            PushEvent::parse(r#"{"type": "portfolio_update", "data": {"positions": 5}}"#),
            Err(PushError::MessageParse(_))
        ));
        assert!(PushEvent::parse(r#"{"data": {}}"#).is_err());
    }

    #[test]
    fn test_connection_state_survives_poll() {
        let state = LiveState::default().with_push_channel(ConnectionState::Connected);
        let batch = PollBatch {
            status: SystemStatus::default(),
            portfolio: PortfolioSnapshot::default(),
            trades: vec![],
            history: vec![],
            decisions: vec![],
        };
        let next = state.apply_poll(batch);
        assert_eq!(next.push_channel, ConnectionState::Connected);
        assert!(next.last_poll.is_some());
        assert!(next.portfolio.is_some());
    }
}
