use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::config::DashboardConfig;
use crate::domain::entities::ai_decision::AIDecision;
use crate::domain::entities::history::HistoryPoint;
use crate::domain::entities::market::MarketTick;
use crate::domain::entities::portfolio::PortfolioSnapshot;
use crate::domain::entities::team::{SystemStatus, TeamStatus};
use crate::domain::entities::trade::Trade;
use crate::domain::errors::SyncError;
use crate::domain::repositories::dashboard_api::{DashboardApi, SyncResult};

const API_PREFIX: &str = "api/";

/// `<backend>/api/`, keeping any path prefix the backend is mounted under.
pub fn api_base_url(backend_url: &Url) -> Result<Url, SyncError> {
    let mut base = backend_url.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.set_query(None);
    base.set_fragment(None);
    Ok(base.join(API_PREFIX)?)
}

/// REST client for the trading backend
pub struct HttpDashboardApi {
    client: Client,
    api_base: Url,
}

impl HttpDashboardApi {
    pub fn new(config: &DashboardConfig) -> Result<Self, SyncError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| SyncError::RequestFailed {
                endpoint: "client".to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            api_base: api_base_url(&config.backend_url)?,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> SyncResult<T> {
        let endpoint = format!("/{}", path);
        let mut url = self.api_base.join(path)?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }

        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SyncError::RequestFailed {
                endpoint: endpoint.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::HttpStatus {
                endpoint,
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| SyncError::RequestFailed {
            endpoint: endpoint.clone(),
            reason: e.to_string(),
        })?;

        serde_json::from_str(&body).map_err(|e| SyncError::DecodeFailed {
            endpoint,
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl DashboardApi for HttpDashboardApi {
    async fn status(&self) -> SyncResult<SystemStatus> {
        self.get_json("status", &[]).await
    }

    async fn portfolio(&self) -> SyncResult<PortfolioSnapshot> {
        self.get_json("portfolio", &[]).await
    }

    async fn trades(&self, limit: u32) -> SyncResult<Vec<Trade>> {
        self.get_json("trades", &[("limit", limit.to_string())]).await
    }

    async fn portfolio_history(&self, days: u32) -> SyncResult<Vec<HistoryPoint>> {
        self.get_json("portfolio-history", &[("days", days.to_string())])
            .await
    }

    async fn ai_decisions(&self, limit: u32) -> SyncResult<Vec<AIDecision>> {
        self.get_json("ai-decisions", &[("limit", limit.to_string())])
            .await
    }

    async fn market_data(&self) -> SyncResult<Vec<MarketTick>> {
        self.get_json("market-data", &[]).await
    }

    async fn team(&self) -> SyncResult<TeamStatus> {
        self.get_json("team", &[]).await
    }
}
