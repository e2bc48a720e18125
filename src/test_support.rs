//! In-process HTTP fixtures for request-layer tests.

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::http::HeaderMap;

use crate::api::ApiClient;
use crate::config::ClientConfig;
use crate::session::{MemorySessionStore, SessionStore};

/// Headers seen by the fixture server, in arrival order.
#[derive(Clone, Default)]
pub struct Recorded {
    inner: Arc<Mutex<Vec<RecordedRequest>>>,
}

#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub path: String,
    pub headers: HeaderMap,
    pub body: String,
}

impl Recorded {
    pub fn push(&self, path: &str, headers: &HeaderMap, body: &str) {
        self.inner.lock().unwrap().push(RecordedRequest {
            path: path.to_owned(),
            headers: headers.clone(),
            body: body.to_owned(),
        });
    }

    pub fn all(&self) -> Vec<RecordedRequest> {
        self.inner.lock().unwrap().clone()
    }

    pub fn last(&self) -> RecordedRequest {
        self.inner.lock().unwrap().last().cloned().expect("no request recorded")
    }
}

/// Serve `router` under `/api` on an ephemeral port; returns the base URL.
pub async fn serve(router: Router) -> String {
    let app = Router::new().nest("/api", router);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/api")
}

/// A base URL whose port has nothing listening.
pub async fn dead_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/api")
}

pub fn client_for(base_url: &str, session: Arc<MemorySessionStore>) -> ApiClient {
    client_for_store(base_url, session as Arc<dyn SessionStore>)
}

pub fn client_for_store(base_url: &str, session: Arc<dyn SessionStore>) -> ApiClient {
    let config = ClientConfig { base_url: base_url.to_owned(), ..ClientConfig::default() };
    ApiClient::new(&config, session).unwrap()
}

/// Client with an empty in-memory session.
pub fn anonymous_client(base_url: &str) -> (ApiClient, Arc<MemorySessionStore>) {
    let session = Arc::new(MemorySessionStore::new());
    (client_for(base_url, Arc::clone(&session)), session)
}

/// Client whose session already holds `token`.
pub fn authed_client(base_url: &str, token: &str) -> (ApiClient, Arc<MemorySessionStore>) {
    let session = Arc::new(MemorySessionStore::with_token(token));
    (client_for(base_url, Arc::clone(&session)), session)
}

pub fn review_json(id: &str, rating: u8, liked: bool) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "spaceId": "s1",
        "authorName": format!("Author {id}"),
        "rating": rating,
        "text": format!("Review {id}"),
        "liked": liked,
        "createdAt": "2024-05-01T10:00:00Z",
        "updatedAt": "2024-05-01T10:00:00Z"
    })
}

pub fn review(id: &str, rating: u8, liked: bool) -> crate::api::types::Review {
    serde_json::from_value(review_json(id, rating, liked)).unwrap()
}

pub fn space_json(id: &str, name: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": name,
        "redirectUrl": "https://acme.example/thanks",
        "slug": name.to_lowercase(),
        "createdAt": "2024-04-01T09:30:00Z",
        "updatedAt": "2024-04-02T09:30:00Z"
    })
}
