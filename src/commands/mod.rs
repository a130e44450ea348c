pub mod auth;
pub mod calendar;
pub mod config;
pub mod events;
pub mod tasks;

use std::sync::Arc;

use agenda_core::AgendaError;
use agenda_core::client::ApiClient;
use agenda_core::config::AgendaConfig;
use agenda_core::session::{FileTokenStore, Session};
use anyhow::Result;
use tracing::debug;

/// What every command needs: the loaded config and a client bound to the
/// persisted session.
pub struct Context {
    pub config: AgendaConfig,
    pub client: ApiClient,
}

impl Context {
    pub fn load() -> Result<Self> {
        let config = AgendaConfig::load()?;
        let store = FileTokenStore::default_location()?;
        let session = Arc::new(Session::restore(Box::new(store))?);
        debug!("Using backend {}", config.base_url());
        let client = ApiClient::new(config.base_url(), session)?;
        Ok(Context { config, client })
    }

    /// Fail early, without a request, when nobody is logged in.
    pub fn require_login(&self) -> Result<()> {
        if !self.client.session().is_authenticated() {
            return Err(AgendaError::Unauthorized.into());
        }
        Ok(())
    }
}
