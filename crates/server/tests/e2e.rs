use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use reqwest::StatusCode as HttpStatusCode;
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use server::routes::{self, quotes::SharedStore};
use service::errors::StoreError;
use service::quotes::{Quote, QuoteStore};
use service::storage::json_quote_store::JsonQuoteStore;

fn cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

struct TestApp {
    base_url: String,
}

async fn start_server_with(store: SharedStore) -> anyhow::Result<TestApp> {
    let app: Router = routes::build_router(store, cors());
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("server error: {}", e);
        }
    });

    Ok(TestApp { base_url })
}

async fn start_server() -> anyhow::Result<TestApp> {
    // Isolated data file per test run
    let data_path = format!("target/test-data/{}/quotes.json", Uuid::new_v4());
    let store: SharedStore = JsonQuoteStore::new(&data_path).await?;
    start_server_with(store).await
}

/// Store whose backing medium is permanently down.
struct FailingStore;

#[async_trait::async_trait]
impl QuoteStore for FailingStore {
    async fn list(&self) -> Result<Vec<Quote>, StoreError> {
        Err(StoreError::unavailable("data file unreachable"))
    }

    async fn get(&self, _id: u32) -> Result<Option<Quote>, StoreError> {
        Err(StoreError::unavailable("data file unreachable"))
    }

    async fn get_random(&self) -> Result<Option<Quote>, StoreError> {
        Err(StoreError::unavailable("data file unreachable"))
    }

    async fn create(&self, _quote: String, _author: String) -> Result<Quote, StoreError> {
        Err(StoreError::unavailable("data file unreachable"))
    }

    async fn update(
        &self,
        _id: u32,
        _quote: String,
        _author: String,
    ) -> Result<Option<Quote>, StoreError> {
        Err(StoreError::unavailable("data file unreachable"))
    }

    async fn delete(&self, _id: u32) -> Result<bool, StoreError> {
        Err(StoreError::unavailable("data file unreachable"))
    }
}

fn client() -> reqwest::Client {
    reqwest::Client::new()
}

#[tokio::test]
async fn e2e_health() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client().get(format!("{}/health", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn e2e_quote_crud_round_trip() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    // Create
    let res = c
        .post(format!("{}/api/quotes", app.base_url))
        .json(&json!({"quote": "Simplicity is prerequisite for reliability.", "author": "Edsger Dijkstra"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let created = res.json::<serde_json::Value>().await?;
    let id = created["id"].as_u64().expect("assigned id");
    assert_eq!(created["author"], "Edsger Dijkstra");

    // List contains it
    let res = c.get(format!("{}/api/quotes", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let list = res.json::<Vec<serde_json::Value>>().await?;
    assert!(list.iter().any(|q| q["id"] == created["id"]));

    // Get by id
    let res = c
        .get(format!("{}/api/quotes/{}", app.base_url, id))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<serde_json::Value>().await?, created);

    // Update: 204, empty body, id unchanged
    let res = c
        .put(format!("{}/api/quotes/{}", app.base_url, id))
        .json(&json!({"quote": "Testing shows the presence of bugs.", "author": "Edsger W. Dijkstra"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::NO_CONTENT);
    assert!(res.text().await?.is_empty());

    let res = c
        .get(format!("{}/api/quotes/{}", app.base_url, id))
        .send()
        .await?;
    let updated = res.json::<serde_json::Value>().await?;
    assert_eq!(updated["id"], created["id"]);
    assert_eq!(updated["quote"], "Testing shows the presence of bugs.");
    assert_eq!(updated["author"], "Edsger W. Dijkstra");

    // Delete: 204, empty body, then gone
    let res = c
        .delete(format!("{}/api/quotes/{}", app.base_url, id))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::NO_CONTENT);
    assert!(res.text().await?.is_empty());

    let res = c
        .get(format!("{}/api/quotes/{}", app.base_url, id))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["message"], "Quote not found.");
    Ok(())
}

#[tokio::test]
async fn e2e_create_missing_field_is_rejected_without_side_effect() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    for bad in [
        json!({"quote": "no author"}),
        json!({"author": "no quote"}),
        json!({"quote": "", "author": "empty quote"}),
        json!({"quote": "empty author", "author": "  "}),
        json!({}),
    ] {
        let res = c
            .post(format!("{}/api/quotes", app.base_url))
            .json(&bad)
            .send()
            .await?;
        assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
        let body = res.json::<serde_json::Value>().await?;
        assert_eq!(body["message"], "Missing quote or author.");
    }

    // nothing was persisted
    let res = c.get(format!("{}/api/quotes", app.base_url)).send().await?;
    let list = res.json::<Vec<serde_json::Value>>().await?;
    assert!(list.is_empty());
    Ok(())
}

#[tokio::test]
async fn e2e_put_and_delete_unknown_id() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    let res = c
        .put(format!("{}/api/quotes/424242", app.base_url))
        .json(&json!({"quote": "q", "author": "a"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["message"], "Quote Not Found");

    let res = c
        .delete(format!("{}/api/quotes/424242", app.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["message"], "Quote Not Found");

    // no collection change
    let res = c.get(format!("{}/api/quotes", app.base_url)).send().await?;
    let list = res.json::<Vec<serde_json::Value>>().await?;
    assert!(list.is_empty());
    Ok(())
}

#[tokio::test]
async fn e2e_random_quote() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    // Empty collection: 200 with a null body
    let res = c
        .get(format!("{}/api/quotes/quote/random", app.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert!(res.json::<serde_json::Value>().await?.is_null());

    for i in 0..3 {
        let res = c
            .post(format!("{}/api/quotes", app.base_url))
            .json(&json!({"quote": format!("quote {i}"), "author": format!("author {i}")}))
            .send()
            .await?;
        assert_eq!(res.status(), HttpStatusCode::CREATED);
    }

    let res = c.get(format!("{}/api/quotes", app.base_url)).send().await?;
    let list = res.json::<Vec<serde_json::Value>>().await?;

    let res = c
        .get(format!("{}/api/quotes/quote/random", app.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let picked = res.json::<serde_json::Value>().await?;
    assert!(list.contains(&picked));
    Ok(())
}

#[tokio::test]
async fn e2e_store_failure_uses_terminal_envelope() -> anyhow::Result<()> {
    let app = start_server_with(Arc::new(FailingStore)).await?;
    let c = client();

    let res = c.get(format!("{}/api/quotes", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::INTERNAL_SERVER_ERROR);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(
        body["error"]["message"],
        "store unavailable: data file unreachable"
    );
    assert!(body.get("message").is_none());

    // the random and by-id reads funnel the same way
    let res = c
        .get(format!("{}/api/quotes/quote/random", app.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::INTERNAL_SERVER_ERROR);

    let res = c.get(format!("{}/api/quotes/1", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::INTERNAL_SERVER_ERROR);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["error"]["message"], "store unavailable: data file unreachable");
    Ok(())
}

#[tokio::test]
async fn e2e_malformed_body_still_answers_json() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    // body that is not JSON at all
    let res = c
        .post(format!("{}/api/quotes", app.base_url))
        .header("content-type", "application/json")
        .body("not json")
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["message"], "Missing quote or author.");

    // no body at all
    let res = c.post(format!("{}/api/quotes", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["message"], "Missing quote or author.");

    // the existence check still wins for updates
    let res = c
        .put(format!("{}/api/quotes/424242", app.base_url))
        .header("content-type", "application/json")
        .body("{{")
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["message"], "Quote Not Found");
    Ok(())
}

#[tokio::test]
async fn e2e_unmatched_route_uses_terminal_envelope() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    for path in ["/api/nope", "/nope", "/api/quotes/1/extra"] {
        let res = c.get(format!("{}{}", app.base_url, path)).send().await?;
        assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
        let body = res.json::<serde_json::Value>().await?;
        // catch-all shape is distinguishable from the known-resource 404
        assert_eq!(body["error"]["message"], "Not Found");
        assert!(body.get("message").is_none());
    }
    Ok(())
}
