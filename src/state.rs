use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

use crate::config::Config;
use crate::content_loader::SiteTemplates;
use crate::source::ContentHost;

pub type RefreshBroadcaster = broadcast::Sender<()>;

pub struct AppState {
    pub config: Config,
    pub host: ContentHost,
    pub templates: RwLock<SiteTemplates>,
}

impl AppState {
    pub fn new(config: Config, host: ContentHost, templates: SiteTemplates) -> Self {
        Self {
            config,
            host,
            templates: RwLock::new(templates),
        }
    }
}

#[derive(Clone)]
pub struct RouterState {
    pub app_state: Arc<AppState>,
    pub broadcaster: RefreshBroadcaster,
}

impl axum::extract::FromRef<RouterState> for Arc<AppState> {
    fn from_ref(state: &RouterState) -> Self {
        state.app_state.clone()
    }
}

impl axum::extract::FromRef<RouterState> for RefreshBroadcaster {
    fn from_ref(state: &RouterState) -> Self {
        state.broadcaster.clone()
    }
}
