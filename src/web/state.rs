use std::{collections::HashMap, sync::Arc};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::{
    api::ApiClient,
    config::PortalConfig,
    dashboard::{Dashboard, DatasetRecord, ExportFile, FilterCriteria, RetrievalTicket},
    error::{self, PortalError},
    session::SessionStore,
};

/// Shared handler state: the API client and one dashboard workspace per
/// browser session, keyed by session token.
#[derive(Clone)]
pub struct AppState {
    api: ApiClient,
    workspaces: Arc<RwLock<HashMap<String, Dashboard>>>,
}

impl AppState {
    pub fn new(config: &PortalConfig) -> Result<Self> {
        let api = ApiClient::new(config.api_base_url.clone(), config.request_timeout)
            .context("failed to initialize API client")?;
        Ok(Self::with_client(api))
    }

    pub fn with_client(api: ApiClient) -> Self {
        Self {
            api,
            workspaces: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Begin a retrieval in the caller's workspace. The lock is released
    /// before the request is sent.
    pub async fn begin_retrieval<S: SessionStore + ?Sized>(
        &self,
        session: &S,
        criteria: FilterCriteria,
    ) -> error::Result<RetrievalTicket> {
        let token = session.get().ok_or(PortalError::AuthorizationMissing)?;
        let mut guard = self.workspaces.write().await;
        guard.entry(token).or_default().begin(session, criteria)
    }

    /// Apply a finished attempt and return a snapshot of the workspace, or
    /// `None` if the workspace went away while the request was in flight.
    pub async fn complete_retrieval(
        &self,
        ticket: &RetrievalTicket,
        outcome: error::Result<Vec<DatasetRecord>>,
    ) -> Option<Dashboard> {
        let mut guard = self.workspaces.write().await;
        let dashboard = guard.get_mut(ticket.token())?;
        dashboard.complete(ticket, outcome);
        Some(dashboard.clone())
    }

    pub async fn snapshot(&self, token: &str) -> Dashboard {
        let guard = self.workspaces.read().await;
        guard.get(token).cloned().unwrap_or_default()
    }

    pub async fn export(&self, token: &str) -> error::Result<ExportFile> {
        let guard = self.workspaces.read().await;
        match guard.get(token) {
            Some(dashboard) => dashboard.export(),
            None => Err(PortalError::ExportPrecondition),
        }
    }

    pub async fn drop_workspace(&self, token: &str) {
        let mut guard = self.workspaces.write().await;
        guard.remove(token);
    }

    /// Remove workspaces untouched since `cutoff`, returning how many went.
    pub async fn purge_idle(&self, cutoff: DateTime<Utc>) -> usize {
        let mut guard = self.workspaces.write().await;
        let before = guard.len();
        guard.retain(|_, dashboard| dashboard.touched_at() > cutoff);
        before - guard.len()
    }

    pub async fn workspace_count(&self) -> usize {
        self.workspaces.read().await.len()
    }
}
