//! Application state shared across handlers

use crate::config::Settings;
use crate::metrics::Metrics;
use crate::network::SearchTransport;
use crate::results::Normalizer;
use crate::search::SearchController;
use crate::view::ResultRenderer;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Global settings
    pub settings: Arc<Settings>,
    /// Connection to the search service
    pub transport: Arc<dyn SearchTransport>,
    /// Template-backed renderer
    pub renderer: Arc<ResultRenderer>,
    /// Counters across all requests
    pub metrics: Arc<Metrics>,
    normalizer: Normalizer,
}

impl AppState {
    pub fn new(settings: Settings, transport: Arc<dyn SearchTransport>) -> anyhow::Result<Self> {
        let renderer = Arc::new(ResultRenderer::new(&settings.ui)?);
        let normalizer = Normalizer::new(&settings.results);

        Ok(Self {
            settings: Arc::new(settings),
            transport,
            renderer,
            metrics: Arc::new(Metrics::new()),
            normalizer,
        })
    }

    /// A fresh controller for one page request
    pub fn controller(&self) -> SearchController {
        SearchController::with_metrics(self.normalizer.clone(), self.metrics.clone())
    }

    pub fn instance_name(&self) -> &str {
        &self.settings.general.instance_name
    }
}
