use axum::{
    extract::{Form, Query, State},
    http::StatusCode,
    response::{Html, Redirect},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use tracing::warn;

use crate::{
    credentials::{self, Credentials},
    session::{self, CookieSessionStore, Navigation, SessionStore},
    web::{
        AppState,
        templates::{LoginView, render_login_page},
    },
};

#[derive(Default, Deserialize)]
pub struct LoginQuery {
    pub status: Option<String>,
}

pub async fn login_page(
    jar: CookieJar,
    Query(params): Query<LoginQuery>,
) -> Result<Html<String>, Redirect> {
    if let Some(redirect) = redirect_if_authenticated(jar) {
        return Err(redirect);
    }

    let flash = match params.status.as_deref() {
        Some("logged_out") => Some("You have been logged out."),
        _ => None,
    };

    Ok(Html(render_login_page(&LoginView {
        flash,
        ..LoginView::default()
    })))
}

pub async fn process_login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<Credentials>,
) -> Result<(CookieJar, Redirect), (StatusCode, Html<String>)> {
    let mut session = CookieSessionStore::new(jar);

    match credentials::sign_in(state.api(), &mut session, &form).await {
        Ok(next) => Ok((session.into_jar(), Redirect::to(next.path()))),
        Err(err) => {
            warn!(username = %form.username, %err, "login attempt failed");
            let page = render_login_page(&LoginView {
                username: &form.username,
                password: &form.password,
                error: Some(err.user_message()),
                flash: None,
            });
            Err((StatusCode::UNAUTHORIZED, Html(page)))
        }
    }
}

pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Redirect) {
    let mut session = CookieSessionStore::new(jar);

    if let Some(token) = session.get() {
        state.drop_workspace(&token).await;
    }

    let next = session::logout(&mut session);
    let target = format!("{}?status=logged_out", next.path());
    (session.into_jar(), Redirect::to(&target))
}

fn redirect_if_authenticated(jar: CookieJar) -> Option<Redirect> {
    let session = CookieSessionStore::new(jar);
    session
        .is_authenticated()
        .then(|| Redirect::to(Navigation::Dashboard.path()))
}
