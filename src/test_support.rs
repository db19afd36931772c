//! Mock remote API helpers shared by the unit tests.

use std::time::Duration;

use axum::Router;
use reqwest::Url;
use tokio::net::TcpListener;

use crate::api::ApiClient;

/// Serve `app` on an ephemeral local port and return its base URL.
pub async fn serve(app: Router) -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    Url::parse(&format!("http://{addr}/")).unwrap()
}

pub fn client_for(base_url: &Url) -> ApiClient {
    ApiClient::new(base_url.clone(), Duration::from_secs(5)).unwrap()
}

/// A client pointed at a port nobody is listening on.
pub async fn unreachable_client() -> ApiClient {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    client_for(&Url::parse(&format!("http://{addr}/")).unwrap())
}
