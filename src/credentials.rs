use tracing::info;

use crate::{
    api::ApiClient,
    error::{PortalError, Result},
    session::{Navigation, SessionStore},
};

pub const MISSING_FIELDS_MESSAGE: &str = "Username and password are required.";

/// A username/password pair as submitted on the login form.
#[derive(Clone, Debug, Default, serde::Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Trade credentials for a token and persist it.
///
/// Each call is one independent attempt. On failure the store is left
/// untouched.
pub async fn sign_in<S: SessionStore + ?Sized>(
    api: &ApiClient,
    store: &mut S,
    credentials: &Credentials,
) -> Result<Navigation> {
    if credentials.username.is_empty() || credentials.password.is_empty() {
        return Err(PortalError::AuthenticationFailure(
            MISSING_FIELDS_MESSAGE.to_string(),
        ));
    }

    let token = api
        .exchange_credentials(&credentials.username, &credentials.password)
        .await?;
    store.set(token);

    info!(username = %credentials.username, "signed in");
    Ok(Navigation::Dashboard)
}
