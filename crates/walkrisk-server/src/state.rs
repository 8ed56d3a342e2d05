//! Shared application state: the trained pipeline plus server settings.

use crate::config::Config;
use walkrisk_core::{RiskContext, RouteScorer};

/// Read-only after startup; handlers share it through an `Arc`.
pub struct AppState {
    context: RiskContext,
    config: Config,
}

impl AppState {
    pub fn new(context: RiskContext, config: Config) -> Self {
        Self { context, config }
    }

    pub fn context(&self) -> &RiskContext {
        &self.context
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn scorer(&self) -> RouteScorer<'_> {
        RouteScorer::new(&self.context)
    }
}
