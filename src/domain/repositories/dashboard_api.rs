//! Dashboard API Trait
//!
//! Read-only view of the trading backend's REST surface. The sync
//! controller and panel pollers only talk to this trait, which lets tests
//! drive them with an in-memory backend instead of a live server.

use async_trait::async_trait;

use crate::domain::entities::ai_decision::AIDecision;
use crate::domain::entities::history::HistoryPoint;
use crate::domain::entities::market::MarketTick;
use crate::domain::entities::portfolio::PortfolioSnapshot;
use crate::domain::entities::team::{SystemStatus, TeamStatus};
use crate::domain::entities::trade::Trade;
use crate::domain::errors::SyncError;

pub type SyncResult<T> = Result<T, SyncError>;

/// Default page sizes used by the dashboard.
pub const DEFAULT_TRADES_LIMIT: u32 = 50;
pub const DEFAULT_HISTORY_DAYS: u32 = 30;
pub const DEFAULT_DECISIONS_LIMIT: u32 = 20;

#[async_trait]
pub trait DashboardApi: Send + Sync {
    /// `GET /status`
    async fn status(&self) -> SyncResult<SystemStatus>;

    /// `GET /portfolio`
    async fn portfolio(&self) -> SyncResult<PortfolioSnapshot>;

    /// `GET /trades?limit=`, newest first
    async fn trades(&self, limit: u32) -> SyncResult<Vec<Trade>>;

    /// `GET /portfolio-history?days=`, oldest first
    async fn portfolio_history(&self, days: u32) -> SyncResult<Vec<HistoryPoint>>;

    /// `GET /ai-decisions?limit=`, newest first
    async fn ai_decisions(&self, limit: u32) -> SyncResult<Vec<AIDecision>>;

    /// `GET /market-data`, unordered and possibly repeating symbols
    async fn market_data(&self) -> SyncResult<Vec<MarketTick>>;

    /// `GET /team`
    async fn team(&self) -> SyncResult<TeamStatus>;
}
