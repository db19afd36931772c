use axum::{
    extract::{Form, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use tracing::{debug, info};

use crate::{
    dashboard::FilterCriteria,
    error::PortalError,
    session::{CookieSessionStore, Navigation, SessionStore},
    web::{
        AppState,
        templates::{CURRENT_VIEW, render_dashboard_page},
    },
};

#[derive(Default, Deserialize)]
pub struct FilterForm {
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub min_records: String,
}

#[derive(Default, Deserialize)]
pub struct DashboardQuery {
    pub view: Option<String>,
}

/// Initial automatic load with no filters. `?view=current` re-renders the
/// workspace as it stands without issuing a new request.
pub async fn dashboard_page(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<DashboardQuery>,
) -> Result<Html<String>, Redirect> {
    if query.view.as_deref() == Some(CURRENT_VIEW) {
        let session = CookieSessionStore::new(jar);
        let Some(token) = session.get() else {
            return Err(login_redirect());
        };
        let dashboard = state.snapshot(&token).await;
        return Ok(Html(render_dashboard_page(&dashboard, None)));
    }

    load_datasets(&state, jar, FilterCriteria::default()).await
}

/// Filter submission.
pub async fn apply_filters(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<FilterForm>,
) -> Result<Html<String>, Redirect> {
    let criteria = FilterCriteria::from_inputs(form.source, form.min_records);
    load_datasets(&state, jar, criteria).await
}

pub async fn export_csv(State(state): State<AppState>, jar: CookieJar) -> Result<Response, Redirect> {
    let session = CookieSessionStore::new(jar);
    let Some(token) = session.get() else {
        return Err(login_redirect());
    };

    match state.export(&token).await {
        Ok(file) => {
            info!(bytes = file.bytes.len(), "exporting datasets");
            Ok(file.into_response())
        }
        Err(err) => {
            let dashboard = state.snapshot(&token).await;
            let page = render_dashboard_page(&dashboard, Some(err.user_message()));
            Ok(Html(page).into_response())
        }
    }
}

async fn load_datasets(
    state: &AppState,
    jar: CookieJar,
    criteria: FilterCriteria,
) -> Result<Html<String>, Redirect> {
    let session = CookieSessionStore::new(jar);

    let ticket = match state.begin_retrieval(&session, criteria).await {
        Ok(ticket) => ticket,
        Err(PortalError::AuthorizationMissing) => return Err(login_redirect()),
        Err(err) => {
            debug!(%err, "retrieval could not start");
            return Err(login_redirect());
        }
    };

    let outcome = ticket.run(state.api()).await;
    let Some(dashboard) = state.complete_retrieval(&ticket, outcome).await else {
        return Err(login_redirect());
    };

    Ok(Html(render_dashboard_page(&dashboard, None)))
}

fn login_redirect() -> Redirect {
    Redirect::to(Navigation::Login.path())
}
