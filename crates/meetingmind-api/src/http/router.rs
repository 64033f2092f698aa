//! Axum router configuration with middleware.
//!
//! All routes are under `/api/` except `/health`.
//! Middleware: CORS, tracing.

use axum::http::HeaderValue;
use axum::routing::{get, patch, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// CORS policy from `server.cors_origins`. An empty list or `*` allows any
/// origin.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let wildcard = origins.iter().any(|origin| origin.trim() == "*");
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let allow_origin = if wildcard || allowed.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(allowed)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.server.cors_origins);

    let api_routes = Router::new()
        // Meetings
        .route(
            "/meetings",
            post(handlers::meeting::create_meeting).get(handlers::meeting::list_meetings),
        )
        .route("/meetings/{id}", get(handlers::meeting::get_meeting))
        // Commitments
        .route("/commitments", get(handlers::commitment::list_commitments))
        .route(
            "/commitments/{id}",
            patch(handlers::commitment::update_commitment),
        )
        // Memory
        .route("/search", get(handlers::search::search))
        .route("/memories", get(handlers::search::recent_memories))
        // Briefings
        .route(
            "/briefings/{contact}",
            get(handlers::briefing::stream_briefing),
        )
        // Contacts
        .route("/contacts", get(handlers::contact::list_contacts));

    Router::new()
        .nest("/api", api_routes)
        .route("/health", get(handlers::health::health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use serde_json::{json, Value};
    use tokio_util::sync::CancellationToken;

    use meetingmind_types::config::AppConfig;

    struct TestApp {
        base: String,
        client: reqwest::Client,
        cancel: CancellationToken,
    }

    impl Drop for TestApp {
        fn drop(&mut self) {
            self.cancel.cancel();
        }
    }

    impl TestApp {
        fn url(&self, path: &str) -> String {
            format!("{}{}", self.base, path)
        }

        async fn get(&self, path: &str) -> reqwest::Response {
            self.client.get(self.url(path)).send().await.unwrap()
        }

        async fn wait_until_processed(&self, id: &str) -> Value {
            for _ in 0..100 {
                let meeting: Value = self
                    .get(&format!("/api/meetings/{id}"))
                    .await
                    .json()
                    .await
                    .unwrap();
                if meeting["status"] != "processing" {
                    return meeting;
                }
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
            panic!("meeting {id} never left processing");
        }
    }

    async fn spawn_app() -> TestApp {
        let mut config = AppConfig::default();
        config.briefing.char_delay_ms = 0;
        config.briefing.section_delay_ms = 0;

        let cancel = CancellationToken::new();
        let (state, _worker) = AppState::init(config, cancel.clone()).unwrap();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let router = build_router(state);
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        TestApp {
            base: format!("http://{addr}"),
            client: reqwest::Client::new(),
            cancel,
        }
    }

    fn roadmap_meeting() -> Value {
        json!({
            "title": "Roadmap review",
            "participants": ["Alice Chen", "Bob Smith"],
            "meeting_date": "2026-02-10T10:00:00Z",
            "notes": "Alice Chen: Let's go with Redis for the ranking cache.\n\
                      Bob Smith: I'll have the API endpoints ready by end of February.\n\
                      Alice Chen: I'll send an intro email to Dave by tomorrow."
        })
    }

    async fn submit(app: &TestApp, body: &Value) -> String {
        let resp = app
            .client
            .post(app.url("/api/meetings"))
            .json(body)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 201);
        let receipt: Value = resp.json().await.unwrap();
        assert_eq!(receipt["status"], "processing");
        receipt["meeting_id"].as_str().unwrap().to_string()
    }

    #[test]
    fn test_cors_layer_accepts_empty_and_invalid_origins() {
        let _ = cors_layer(&[]);
        let _ = cors_layer(&["http://localhost:3000".to_string(), "bad\norigin".to_string()]);
        let _ = cors_layer(&["*".to_string(), "http://localhost:3000".to_string()]);
    }

    #[tokio::test]
    async fn test_health_reports_backends() {
        let app = spawn_app().await;
        let health: Value = app.get("/health").await.json().await.unwrap();
        assert_eq!(health["status"], "ok");
        assert_eq!(health["memory_backend"], "local");
        assert_eq!(health["llm_configured"], false);
        assert!(health["version"].is_string());
    }

    #[tokio::test]
    async fn test_intake_rejects_invalid_meeting() {
        let app = spawn_app().await;
        let mut body = roadmap_meeting();
        body["title"] = json!("   ");
        let resp = app
            .client
            .post(app.url("/api/meetings"))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 400);
        let error: Value = resp.json().await.unwrap();
        assert_eq!(error["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_meeting_flow_offline() {
        let app = spawn_app().await;
        let id = submit(&app, &roadmap_meeting()).await;

        let meeting = app.wait_until_processed(&id).await;
        assert_eq!(meeting["status"], "completed");
        assert!(meeting["summary"].is_string());

        let meetings: Vec<Value> = app
            .get("/api/meetings?participant=alice")
            .await
            .json()
            .await
            .unwrap();
        assert_eq!(meetings.len(), 1);

        let commitments: Vec<Value> = app.get("/api/commitments").await.json().await.unwrap();
        assert!(!commitments.is_empty());
        assert!(commitments.iter().all(|c| c["meeting_id"] == id.as_str()));

        let contacts: Vec<Value> = app.get("/api/contacts").await.json().await.unwrap();
        let alice = contacts
            .iter()
            .find(|c| c["name"] == "Alice Chen")
            .expect("Alice Chen listed");
        assert_eq!(alice["meeting_count"], 1);

        let results: Vec<Value> = app
            .get("/api/search?query=redis")
            .await
            .json()
            .await
            .unwrap();
        assert!(!results.is_empty());
        assert_eq!(results[0]["meeting_title"], "Roadmap review");

        let recent: Vec<Value> = app.get("/api/memories?limit=1").await.json().await.unwrap();
        assert_eq!(recent.len(), 1);
    }

    #[tokio::test]
    async fn test_commitment_completion_and_unknown_id() {
        let app = spawn_app().await;
        let id = submit(&app, &roadmap_meeting()).await;
        app.wait_until_processed(&id).await;

        let commitments: Vec<Value> = app.get("/api/commitments").await.json().await.unwrap();
        let commitment_id = commitments[0]["id"].as_str().unwrap();

        let updated: Value = app
            .client
            .patch(app.url(&format!("/api/commitments/{commitment_id}")))
            .json(&json!({"status": "completed"}))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(updated["status"], "completed");
        assert!(updated["completed_at"].is_string());

        let completed: Vec<Value> = app
            .get("/api/commitments?status=completed")
            .await
            .json()
            .await
            .unwrap();
        assert_eq!(completed.len(), 1);

        let resp = app
            .client
            .patch(app.url(&format!("/api/commitments/{}", uuid::Uuid::now_v7())))
            .json(&json!({"status": "completed"}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 404);
    }

    #[tokio::test]
    async fn test_bad_filters_and_ids() {
        let app = spawn_app().await;
        assert_eq!(app.get("/api/commitments?status=someday").await.status(), 400);
        assert_eq!(app.get("/api/meetings/not-a-uuid").await.status(), 404);

        let long_query = "q".repeat(1_001);
        let resp = app.get(&format!("/api/search?query={long_query}")).await;
        assert_eq!(resp.status(), 400);
    }

    #[tokio::test]
    async fn test_empty_search_returns_empty_list() {
        let app = spawn_app().await;
        let results: Vec<Value> = app
            .get("/api/search?query=anything")
            .await
            .json()
            .await
            .unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_briefing_streams_sse_events() {
        let app = spawn_app().await;
        let body = app
            .get("/api/briefings/Unknown%20Person")
            .await
            .text()
            .await
            .unwrap();

        let events: Vec<Value> = body
            .lines()
            .filter_map(|line| line.strip_prefix("data: "))
            .map(|data| serde_json::from_str(data).unwrap())
            .collect();
        assert!(events.len() > 1);
        assert!(events[..events.len() - 1].iter().all(|e| e["type"] == "token"));
        assert_eq!(events.last().unwrap()["type"], "done");

        let text: String = events
            .iter()
            .filter_map(|e| e["content"].as_str())
            .collect();
        assert!(text.contains("Unknown Person"));
    }

    #[tokio::test]
    async fn test_briefing_rejects_blank_contact() {
        let app = spawn_app().await;
        assert_eq!(app.get("/api/briefings/%20%20").await.status(), 400);
    }
}
