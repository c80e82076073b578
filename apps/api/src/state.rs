use std::sync::Arc;

use crate::config::Config;
use crate::layout::{
    default_page_config, PageConfig, PageRenderer, SafeZone, SettlePolicy, SimulatedRenderer,
};
use crate::records::RecordStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Record persistence. PostgreSQL when `DATABASE_URL` is set, in-memory otherwise.
    pub store: Arc<dyn RecordStore>,
    /// Lays out career pages for overflow correction. Default: `SimulatedRenderer`.
    pub renderer: Arc<dyn PageRenderer>,
    pub config: Config,
    /// Font metrics and spacing the simulated renderer was built with.
    pub page_config: PageConfig,
    pub settle: SettlePolicy,
    pub safe_zone: SafeZone,
}

impl AppState {
    /// Builds the state around `store`, with the simulated renderer configured from `config`.
    pub fn new(store: Arc<dyn RecordStore>, config: Config) -> Self {
        let page_config = default_page_config(config.layout_font);
        let safe_zone = SafeZone::a4();
        Self {
            store,
            renderer: Arc::new(SimulatedRenderer::new(page_config.clone(), safe_zone)),
            settle: SettlePolicy::new(config.settle_delay_ms, config.settle_retries),
            config,
            page_config,
            safe_zone,
        }
    }
}
