use chrono::NaiveDate;
use exchange_match::config::AppConfig;
use exchange_match::error::AppError;
use exchange_match::matching::{MatchService, ProviderCatalog};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Loads the catalog and scoring weights named by the config and wires in affiliate links.
pub(crate) fn load_match_service(config: &AppConfig) -> Result<MatchService, AppError> {
    let catalog = ProviderCatalog::from_path(&config.catalog.path)?;
    let scoring = config.catalog.scoring()?;

    info!(
        path = %config.catalog.path.display(),
        providers = catalog.len(),
        affiliates = config.redirect.affiliates.len(),
        top_n = scoring.top_n,
        "provider catalog loaded"
    );
    if catalog.is_empty() {
        warn!("provider catalog is empty; every match will return no results");
    }

    Ok(MatchService::new(Arc::new(catalog), scoring)
        .with_affiliates(config.redirect.affiliates.clone())
        .with_redirect_fallback(config.redirect.fallback.clone()))
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
