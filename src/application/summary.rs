//! Plain-text rendering of the live dashboard, one line per row.

use crate::domain::entities::trade::Trade;
use crate::domain::live_state::{ConnectionState, LiveState};
use crate::domain::services::display::{money, quantity, signed_money};
use crate::domain::services::metrics::{portfolio_pnl, value_positions};
use crate::domain::value_objects::pnl::PLACEHOLDER;

const RECENT_TRADE_LINES: usize = 5;
const DECISION_LINES: usize = 3;

fn connection_label(state: ConnectionState) -> &'static str {
    match state {
        ConnectionState::Disconnected => "disconnected",
        ConnectionState::Connecting => "connecting",
        ConnectionState::Connected => "connected",
    }
}

fn trade_line(trade: &Trade) -> String {
    format!(
        "  {} {} {} {} @ {}",
        trade.timestamp.format("%Y-%m-%d %H:%M"),
        String::from(trade.side.clone()).to_uppercase(),
        trade.symbol,
        quantity(trade.amount),
        money(trade.price)
    )
}

pub fn render_summary(state: &LiveState, reference_capital: f64) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push(format!("Push channel: {}", connection_label(state.push_channel)));

    match &state.status {
        Some(status) => {
            let mut line = format!(
                "System: {} | trading {}",
                if status.system.is_empty() { PLACEHOLDER } else { status.system.as_str() },
                if status.trading_enabled { "enabled" } else { "disabled" }
            );
            if status.refactoring_mode {
                line.push_str(" | refactoring mode");
            }
            if let Some(team) = &status.agent_team {
                line.push_str(&format!(
                    " | team {}/{} active",
                    team.active_count(),
                    team.team_size
                ));
            }
            lines.push(line);
        }
        None => lines.push(format!("System: {}", PLACEHOLDER)),
    }

    let snapshot = match &state.portfolio {
        Some(snapshot) => snapshot,
        None => {
            lines.push("Portfolio: waiting for first update".to_string());
            return lines;
        }
    };

    let (pnl, pnl_percentage) = match portfolio_pnl(snapshot, reference_capital) {
        Some(p) => (signed_money(p.pnl.value()), p.pnl_percentage.to_string()),
        None => (PLACEHOLDER.to_string(), PLACEHOLDER.to_string()),
    };
    lines.push(format!(
        "Portfolio: total {} cash {} positions {} | P&L {} ({}) vs {}",
        money(snapshot.total_balance),
        money(snapshot.cash_balance),
        money(snapshot.positions_value),
        pnl,
        pnl_percentage,
        money(Some(reference_capital))
    ));

    for row in value_positions(snapshot) {
        let position = row.position;
        let (pnl, pnl_percent) = match row.pnl {
            Some(p) => (p.pnl.to_string(), p.pnl_percent.to_string()),
            None => (PLACEHOLDER.to_string(), PLACEHOLDER.to_string()),
        };
        lines.push(format!(
            "  {} {} {} @ {} -> {} value {} P&L {} ({})",
            position.symbol,
            position.position_type,
            quantity(position.amount),
            money(position.average_price),
            money(position.current_price),
            money(row.value),
            pnl,
            pnl_percent
        ));
    }

    if !state.trades.is_empty() {
        lines.push(format!("Recent trades ({} held):", state.trades.len()));
        lines.extend(state.trades.iter().take(RECENT_TRADE_LINES).map(trade_line));
    }

    if !state.decisions.is_empty() {
        lines.push("Latest decisions:".to_string());
        for decision in state.decisions.iter().take(DECISION_LINES) {
            lines.push(format!(
                "  {} {} {:.0}% ({}){}",
                decision.symbol,
                String::from(decision.decision.clone()),
                decision.confidence_percent(),
                decision.ai_model,
                if decision.executed { " executed" } else { "" }
            ));
        }
    }

    lines
}
