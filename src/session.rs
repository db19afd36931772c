use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

pub const SESSION_KEY: &str = "authToken";

/// Storage for the bearer token; its presence gates every authorized call.
pub trait SessionStore {
    fn get(&self) -> Option<String>;
    fn set(&mut self, token: String);
    fn clear(&mut self);

    fn is_authenticated(&self) -> bool {
        self.get().is_some()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Navigation {
    Login,
    Dashboard,
}

impl Navigation {
    pub fn path(self) -> &'static str {
        match self {
            Navigation::Login => "/",
            Navigation::Dashboard => "/dashboard",
        }
    }
}

/// Drop the session token and head back to the login view.
pub fn logout<S: SessionStore + ?Sized>(store: &mut S) -> Navigation {
    store.clear();
    Navigation::Login
}

#[derive(Clone, Debug, Default)]
pub struct MemorySessionStore {
    token: Option<String>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> Option<String> {
        self.token.clone()
    }

    fn set(&mut self, token: String) {
        self.token = Some(token);
    }

    fn clear(&mut self) {
        self.token = None;
    }
}

/// Browser-scoped store backed by the request's cookie jar.
///
/// The cookie is permanent: expiry is only ever discovered by the dataset
/// endpoint refusing the token.
#[derive(Debug, Default)]
pub struct CookieSessionStore {
    jar: CookieJar,
}

impl CookieSessionStore {
    pub fn new(jar: CookieJar) -> Self {
        Self { jar }
    }

    pub fn into_jar(self) -> CookieJar {
        self.jar
    }
}

impl SessionStore for CookieSessionStore {
    fn get(&self) -> Option<String> {
        self.jar
            .get(SESSION_KEY)
            .map(|cookie| cookie.value().to_string())
            .filter(|token| !token.is_empty())
    }

    fn set(&mut self, token: String) {
        let mut cookie = Cookie::new(SESSION_KEY, token);
        cookie.set_path("/");
        cookie.set_http_only(true);
        cookie.set_same_site(SameSite::Lax);
        cookie.make_permanent();

        let jar = std::mem::take(&mut self.jar);
        self.jar = jar.add(cookie);
    }

    fn clear(&mut self) {
        let mut removal = Cookie::new(SESSION_KEY, "");
        removal.set_path("/");
        removal.set_http_only(true);
        removal.set_same_site(SameSite::Lax);

        let jar = std::mem::take(&mut self.jar);
        self.jar = jar.remove(removal);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trips_token() {
        let mut store = MemorySessionStore::new();
        assert_eq!(store.get(), None);

        store.set("abc123".to_string());
        assert_eq!(store.get().as_deref(), Some("abc123"));
        assert!(store.is_authenticated());

        store.clear();
        assert!(!store.is_authenticated());
    }

    #[test]
    fn logout_is_idempotent() {
        let mut store = MemorySessionStore::with_token("abc123");
        assert_eq!(logout(&mut store), Navigation::Login);
        assert_eq!(logout(&mut store), Navigation::Login);
        assert_eq!(store.get(), None);
    }

    #[test]
    fn cookie_store_reads_existing_cookie() {
        let jar = CookieJar::new().add(Cookie::new(SESSION_KEY, "abc123"));
        let store = CookieSessionStore::new(jar);
        assert_eq!(store.get().as_deref(), Some("abc123"));
    }

    #[test]
    fn cookie_store_treats_blank_cookie_as_absent() {
        let jar = CookieJar::new().add(Cookie::new(SESSION_KEY, ""));
        assert_eq!(CookieSessionStore::new(jar).get(), None);
    }

    #[test]
    fn cookie_store_sets_browser_scoped_cookie() {
        let mut store = CookieSessionStore::default();
        store.set("abc123".to_string());

        let jar = store.into_jar();
        let cookie = jar.get(SESSION_KEY).unwrap();
        assert_eq!(cookie.value(), "abc123");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert!(cookie.max_age().is_some());
    }

    #[test]
    fn cookie_store_clear_removes_token() {
        let jar = CookieJar::new().add(Cookie::new(SESSION_KEY, "abc123"));
        let mut store = CookieSessionStore::new(jar);
        store.clear();
        assert_eq!(store.get(), None);
    }

    #[test]
    fn navigation_paths() {
        assert_eq!(Navigation::Login.path(), "/");
        assert_eq!(Navigation::Dashboard.path(), "/dashboard");
    }
}
