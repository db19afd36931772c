mod export;
mod models;
mod state;

pub use export::{EXPORT_FILENAME, ExportFile, export_records};
pub use models::{DatasetRecord, FilterCriteria};
pub use state::{AttemptId, RetrievalState};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::{
    api::ApiClient,
    error::{PortalError, Result},
    session::SessionStore,
};

/// Everything needed to run one retrieval, captured when it began.
#[derive(Clone, Debug)]
pub struct RetrievalTicket {
    attempt: AttemptId,
    token: String,
    criteria: FilterCriteria,
}

impl RetrievalTicket {
    pub fn attempt(&self) -> AttemptId {
        self.attempt
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub(crate) fn token(&self) -> &str {
        &self.token
    }

    pub async fn run(&self, api: &ApiClient) -> Result<Vec<DatasetRecord>> {
        api.fetch_datasets(&self.token, &self.criteria).await
    }
}

/// Retrieval and export state for one browser session.
///
/// Attempts are numbered as they begin. Only the outcome of the newest
/// attempt may change the displayed state; anything older that resolves
/// late is dropped.
#[derive(Clone, Debug)]
pub struct Dashboard {
    state: RetrievalState,
    latest: AttemptId,
    criteria: FilterCriteria,
    touched_at: DateTime<Utc>,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Dashboard {
    pub fn new() -> Self {
        Self {
            state: RetrievalState::Idle,
            latest: AttemptId::default(),
            criteria: FilterCriteria::default(),
            touched_at: Utc::now(),
        }
    }

    pub fn state(&self) -> &RetrievalState {
        &self.state
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn latest_attempt(&self) -> AttemptId {
        self.latest
    }

    pub fn touched_at(&self) -> DateTime<Utc> {
        self.touched_at
    }

    /// Start a retrieval: check the session, move to `Loading` and hand back
    /// a ticket for the request.
    ///
    /// Without a token nothing changes and `AuthorizationMissing` is
    /// returned so the caller can redirect to the login view.
    pub fn begin<S: SessionStore + ?Sized>(
        &mut self,
        session: &S,
        criteria: FilterCriteria,
    ) -> Result<RetrievalTicket> {
        let token = session.get().ok_or(PortalError::AuthorizationMissing)?;

        self.latest = self.latest.next();
        self.state = RetrievalState::Loading;
        self.criteria = criteria.clone();
        self.touched_at = Utc::now();

        Ok(RetrievalTicket {
            attempt: self.latest,
            token,
            criteria,
        })
    }

    /// Apply the outcome of `ticket`. Returns `false` when a newer attempt
    /// has started since, in which case the outcome is discarded.
    pub fn complete(
        &mut self,
        ticket: &RetrievalTicket,
        outcome: Result<Vec<DatasetRecord>>,
    ) -> bool {
        if ticket.attempt != self.latest {
            debug!(
                attempt = ticket.attempt.get(),
                latest = self.latest.get(),
                "discarding stale retrieval outcome"
            );
            return false;
        }

        self.state = match outcome {
            Ok(records) => RetrievalState::Success(records),
            Err(err) => RetrievalState::Error(err.user_message().to_string()),
        };
        self.touched_at = Utc::now();
        true
    }

    pub async fn refresh<S: SessionStore + ?Sized>(
        &mut self,
        api: &ApiClient,
        session: &S,
        criteria: FilterCriteria,
    ) -> Result<&RetrievalState> {
        let ticket = self.begin(session, criteria)?;
        let outcome = ticket.run(api).await;
        self.complete(&ticket, outcome);
        Ok(&self.state)
    }

    pub fn export(&self) -> Result<ExportFile> {
        export_records(self.state.records())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use axum::{Json, Router, http::StatusCode, routing::get};
    use serde_json::json;

    use super::*;
    use crate::{
        session::MemorySessionStore,
        test_support::{client_for, serve, unreachable_client},
    };

    fn record(id: i64, name: &str) -> DatasetRecord {
        DatasetRecord {
            id,
            name: name.to_string(),
            source: "Himachal Pradesh".to_string(),
            record_count: 1200,
            description: None,
        }
    }

    fn district_a_api(hits: Arc<AtomicUsize>) -> Router {
        Router::new().route(
            "/datasets/",
            get(move || {
                hits.fetch_add(1, Ordering::SeqCst);
                async {
                    Json(json!([{
                        "id": 1,
                        "name": "District A",
                        "source": "Himachal Pradesh",
                        "record_count": 1200,
                        "description": null
                    }]))
                }
            }),
        )
    }

    #[tokio::test]
    async fn initial_load_succeeds_with_server_records() {
        let hits = Arc::new(AtomicUsize::new(0));
        let api = client_for(&serve(district_a_api(hits.clone())).await);
        let session = MemorySessionStore::with_token("abc123");
        let mut dashboard = Dashboard::new();

        let state = dashboard
            .refresh(&api, &session, FilterCriteria::default())
            .await
            .unwrap();

        assert_eq!(state, &RetrievalState::Success(vec![record(1, "District A")]));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn missing_token_short_circuits_before_any_request() {
        let hits = Arc::new(AtomicUsize::new(0));
        let api = client_for(&serve(district_a_api(hits.clone())).await);
        let session = MemorySessionStore::new();
        let mut dashboard = Dashboard::new();

        let err = dashboard
            .refresh(&api, &session, FilterCriteria::default())
            .await
            .unwrap_err();

        assert_eq!(err, PortalError::AuthorizationMissing);
        assert_eq!(dashboard.state(), &RetrievalState::Idle);
        assert_eq!(dashboard.latest_attempt(), AttemptId::default());
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn rejected_token_replaces_previous_records_with_error() {
        let app = Router::new().route(
            "/datasets/",
            get(|| async { (StatusCode::UNAUTHORIZED, Json(json!({"detail": "Token expired"}))) }),
        );
        let api = client_for(&serve(app).await);
        let session = MemorySessionStore::with_token("stale");
        let mut dashboard = Dashboard::new();

        let ticket = dashboard.begin(&session, FilterCriteria::default()).unwrap();
        dashboard.complete(&ticket, Ok(vec![record(1, "District A")]));
        assert_eq!(dashboard.state().records().len(), 1);

        dashboard
            .refresh(&api, &session, FilterCriteria::default())
            .await
            .unwrap();

        assert_eq!(
            dashboard.state(),
            &RetrievalState::Error("Token expired".to_string())
        );
        assert!(dashboard.state().records().is_empty());
    }

    #[tokio::test]
    async fn transport_failure_becomes_error_state() {
        let api = unreachable_client().await;
        let session = MemorySessionStore::with_token("abc123");
        let mut dashboard = Dashboard::new();

        dashboard
            .refresh(&api, &session, FilterCriteria::default())
            .await
            .unwrap();

        assert!(matches!(dashboard.state(), RetrievalState::Error(message) if !message.is_empty()));
    }

    async fn refresh_after_records(app: Router) -> Dashboard {
        let api = client_for(&serve(app).await);
        let session = MemorySessionStore::with_token("abc123");
        let mut dashboard = Dashboard::new();

        let ticket = dashboard.begin(&session, FilterCriteria::default()).unwrap();
        dashboard.complete(&ticket, Ok(vec![record(1, "District A")]));

        dashboard
            .refresh(&api, &session, FilterCriteria::default())
            .await
            .unwrap();
        dashboard
    }

    #[tokio::test]
    async fn non_json_body_replaces_records_with_error() {
        let app = Router::new().route("/datasets/", get(|| async { "not json" }));

        let dashboard = refresh_after_records(app).await;

        assert!(matches!(dashboard.state(), RetrievalState::Error(message) if !message.is_empty()));
        assert!(dashboard.state().records().is_empty());
    }

    #[tokio::test]
    async fn negative_record_count_is_a_retrieval_error() {
        let app = Router::new().route(
            "/datasets/",
            get(|| async {
                Json(json!([{
                    "id": 1,
                    "name": "District A",
                    "source": "Himachal Pradesh",
                    "record_count": -4
                }]))
            }),
        );

        let dashboard = refresh_after_records(app).await;

        assert!(matches!(dashboard.state(), RetrievalState::Error(_)));
        assert!(dashboard.export().is_err());
    }

    #[test]
    fn begin_moves_to_loading_and_records_criteria() {
        let session = MemorySessionStore::with_token("abc123");
        let mut dashboard = Dashboard::new();
        let criteria = FilterCriteria::from_inputs("Himachal Pradesh", "1000");

        let ticket = dashboard.begin(&session, criteria.clone()).unwrap();

        assert!(dashboard.state().is_loading());
        assert_eq!(dashboard.criteria(), &criteria);
        assert_eq!(ticket.criteria(), &criteria);
        assert_eq!(ticket.attempt(), dashboard.latest_attempt());
    }

    #[test]
    fn late_response_from_older_attempt_is_discarded() {
        let session = MemorySessionStore::with_token("abc123");
        let mut dashboard = Dashboard::new();

        let older = dashboard.begin(&session, FilterCriteria::default()).unwrap();
        let newer = dashboard
            .begin(&session, FilterCriteria::from_inputs("Kerala", ""))
            .unwrap();

        assert!(dashboard.complete(&newer, Ok(vec![record(2, "Newer")])));
        assert!(!dashboard.complete(&older, Ok(vec![record(1, "Older")])));

        assert_eq!(dashboard.state().records(), &[record(2, "Newer")]);
    }

    #[test]
    fn older_attempt_resolving_first_keeps_loading() {
        let session = MemorySessionStore::with_token("abc123");
        let mut dashboard = Dashboard::new();

        let older = dashboard.begin(&session, FilterCriteria::default()).unwrap();
        let newer = dashboard.begin(&session, FilterCriteria::default()).unwrap();

        assert!(!dashboard.complete(
            &older,
            Err(PortalError::RetrievalFailure("boom".to_string()))
        ));
        assert!(dashboard.state().is_loading());

        assert!(dashboard.complete(&newer, Ok(vec![])));
        assert_eq!(dashboard.state(), &RetrievalState::Success(vec![]));
    }

    #[test]
    fn export_requires_displayed_records() {
        let session = MemorySessionStore::with_token("abc123");
        let mut dashboard = Dashboard::new();
        assert_eq!(dashboard.export(), Err(PortalError::ExportPrecondition));

        let ticket = dashboard.begin(&session, FilterCriteria::default()).unwrap();
        assert_eq!(dashboard.export(), Err(PortalError::ExportPrecondition));

        dashboard.complete(&ticket, Ok(vec![]));
        assert_eq!(dashboard.export(), Err(PortalError::ExportPrecondition));

        let ticket = dashboard.begin(&session, FilterCriteria::default()).unwrap();
        dashboard.complete(&ticket, Ok(vec![record(1, "District A")]));
        let first = dashboard.export().unwrap();
        let second = dashboard.export().unwrap();
        assert_eq!(first.bytes, second.bytes);
        assert_eq!(first.filename, EXPORT_FILENAME);
    }
}
