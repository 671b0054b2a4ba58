use std::sync::Arc;

use dashsync::application::panel_poller::{market_panel, team_panel};
use dashsync::application::summary::render_summary;
use dashsync::application::sync_controller::SyncController;
use dashsync::config::DashboardConfig;
use dashsync::domain::repositories::dashboard_api::DashboardApi;
use dashsync::domain::services::display::{format_price, format_volume};
use dashsync::domain::value_objects::pnl::PLACEHOLDER;
use dashsync::infrastructure::api_client::HttpDashboardApi;
use dashsync::infrastructure::preferences::PreferenceStore;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const MARKET_LOG_ROWS: usize = 5;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dashsync=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = dotenv {
        debug!("No .env file loaded: {}", e);
    }

    let config = DashboardConfig::from_env();
    info!("Dashboard sync starting against {}", config.backend_url);

    let preferences = PreferenceStore::new(config.preferences_path.clone());
    if let Some(code) = &config.language_override {
        if let Err(e) = preferences.set_language_code(code) {
            warn!("Language override '{}' not applied: {}", code, e);
        }
    }
    let language = preferences.load_language();
    info!("Language: {} ({})", language.display_name(), language.code());

    let api: Arc<dyn DashboardApi> = Arc::new(HttpDashboardApi::new(&config)?);
    let sync = SyncController::spawn(api.clone(), config.clone())?;
    let market = market_panel(api.clone(), config.market_refresh_interval);
    let team = team_panel(api, config.team_refresh_interval);

    let mut state_rx = sync.subscribe();
    let mut market_rx = market.subscribe();
    let mut team_rx = team.subscribe();
    let mut market_seen = None;
    let mut team_seen = None;

    let shutdown_signal = async {
        let ctrl_c = async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("Received Ctrl+C signal"),
                Err(e) => error!("Failed to install Ctrl+C handler: {}", e),
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut sig) => {
                    sig.recv().await;
                    info!("Received SIGTERM signal");
                }
                Err(e) => error!("Failed to install SIGTERM handler: {}", e),
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {},
            _ = terminate => {},
        }
    };
    tokio::pin!(shutdown_signal);

    info!("Dashboard running. Press Ctrl+C to stop.");
    loop {
        tokio::select! {
            _ = &mut shutdown_signal => break,
            changed = state_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = state_rx.borrow_and_update().clone();
                for line in render_summary(&state, config.reference_capital) {
                    info!("{}", line);
                }
            }
            changed = market_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let panel = market_rx.borrow_and_update().clone();
                if panel.last_update == market_seen {
                    continue;
                }
                market_seen = panel.last_update;
                if let Some(ticks) = &panel.data {
                    info!("Market: {} symbols", ticks.len());
                    for tick in ticks.iter().take(MARKET_LOG_ROWS) {
                        info!(
                            "  {} {} vol {} 24h {}",
                            tick.symbol,
                            format_price(tick.price),
                            format_volume(tick.volume_24h),
                            tick.change_24h.map_or(PLACEHOLDER.to_string(), |c| format!("{:+.2}%", c))
                        );
                    }
                }
            }
            changed = team_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let panel = team_rx.borrow_and_update().clone();
                if panel.last_update == team_seen {
                    continue;
                }
                team_seen = panel.last_update;
                if let Some(team) = &panel.data {
                    info!("Analyst team: {}/{} active", team.active_count(), team.team_size);
                }
            }
        }
    }

    info!("Dashboard shutting down gracefully...");
    market.shutdown().await;
    team.shutdown().await;
    sync.shutdown().await;

    info!("Shutdown complete");
    Ok(())
}
