//! Router-level tests against an in-memory upstream.

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use serde_json::{Value, json};
use tokio::sync::Semaphore;
use tower::ServiceExt;

use contentlib_server::routes::{self, MAX_IN_FLIGHT_SUBMISSIONS};
use contentlib_server::state::AppState;
use contentlib_server::upstream::{Upstream, UpstreamError, UpstreamResponse};

const BASE: &str = "https://upstream.test/api/";

type Reply = Result<UpstreamResponse, UpstreamError>;

/// Canned replies keyed by URL. Unknown URLs answer 404 "Not Found".
///
/// With a `gate`, every POST is recorded and then held until the gate
/// hands out a permit.
#[derive(Default)]
struct FakeUpstream {
    replies: HashMap<String, Reply>,
    calls: Mutex<Vec<(String, Option<Value>)>>,
    gate: Option<Arc<Semaphore>>,
}

impl FakeUpstream {
    fn reply(mut self, path: &str, reply: Reply) -> Self {
        self.replies
            .insert(format!("https://upstream.test/api{path}"), reply);
        self
    }

    fn ok(self, path: &str, body: Value) -> Self {
        self.reply(path, Ok(response(200, "OK", &body.to_string())))
    }

    fn urls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(url, _)| url.clone())
            .collect()
    }

    fn answer(&self, url: &str, body: Option<&Value>) -> Reply {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_owned(), body.cloned()));
        self.replies
            .get(url)
            .cloned()
            .unwrap_or_else(|| Ok(response(404, "Not Found", "")))
    }
}

#[async_trait]
impl Upstream for FakeUpstream {
    async fn get(&self, url: &str) -> Reply {
        self.answer(url, None)
    }

    async fn post_json(&self, url: &str, body: &Value) -> Reply {
        let reply = self.answer(url, Some(body));
        if let Some(gate) = &self.gate {
            let _permit = gate.acquire().await.unwrap();
        }
        reply
    }
}

fn response(status: u16, status_text: &str, body: &str) -> UpstreamResponse {
    UpstreamResponse {
        status,
        status_text: status_text.to_owned(),
        body: body.to_owned(),
    }
}

fn app(upstream: &Arc<FakeUpstream>) -> Router {
    let upstream: Arc<dyn Upstream> = Arc::clone(upstream) as Arc<dyn Upstream>;
    routes::router(Arc::new(AppState::new(upstream, BASE)))
}

async fn send(app: Router, method: Method, uri: &str, body: Body) -> (StatusCode, HashMap<String, String>, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body)
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response
        .headers()
        .iter()
        .map(|(k, v)| (k.as_str().to_owned(), v.to_str().unwrap().to_owned()))
        .collect();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, headers, json)
}

async fn get(app: Router, uri: &str) -> (StatusCode, HashMap<String, String>, Value) {
    send(app, Method::GET, uri, Body::empty()).await
}

async fn post(app: Router, uri: &str, body: &str) -> (StatusCode, HashMap<String, String>, Value) {
    send(app, Method::POST, uri, Body::from(body.to_owned())).await
}

fn item(id: u64, slug: &str) -> Value {
    json!({"id": id, "slug": slug, "title": format!("Item {id}")})
}

// ── Listing ──────────────────────────────────────────────────────────

#[tokio::test]
async fn listing_is_forwarded_verbatim_with_default_page() {
    let body = json!({
        "status": true,
        "message": "Case studies fetched",
        "data": [item(1, "one")],
        "count": 1,
        "next": null,
        "previous": null
    });
    let upstream = Arc::new(FakeUpstream::default().ok("/casestudy/case-studies/?page=1", body.clone()));

    let (status, headers, json) = get(app(&upstream), "/api/casestudy/case-studies").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, body);
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(headers["access-control-allow-methods"], "GET, OPTIONS");
    assert_eq!(headers["access-control-allow-headers"], "Content-Type");
}

#[tokio::test]
async fn trailing_slash_reaches_the_same_handler() {
    let upstream = Arc::new(
        FakeUpstream::default().ok("/casestudy/case-studies/?page=3", json!({"status": true, "data": []})),
    );

    let (status, _, _) = get(app(&upstream), "/api/casestudy/case-studies/?page=3").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        upstream.urls(),
        vec!["https://upstream.test/api/casestudy/case-studies/?page=3"]
    );
}

#[tokio::test]
async fn upstream_status_is_mirrored_in_envelope() {
    let upstream = Arc::new(FakeUpstream::default());

    let (status, _, json) = get(app(&upstream), "/api/casestudy/case-studies?page=2").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["status"], false);
    assert!(json["message"].as_str().unwrap().contains("404"));
    assert_eq!(json["error"], "Not Found");
}

#[tokio::test]
async fn unreachable_upstream_is_a_500_with_detail() {
    let upstream = Arc::new(FakeUpstream::default().reply(
        "/casestudy/case-studies/?page=1",
        Err(UpstreamError::Transport("connection refused".to_owned())),
    ));

    let (status, _, json) = get(app(&upstream), "/api/casestudy/case-studies").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json,
        json!({
            "status": false,
            "message": "Failed to fetch case studies",
            "error": "connection refused"
        })
    );
}

#[tokio::test]
async fn invalid_upstream_json_is_a_500() {
    let upstream = Arc::new(FakeUpstream::default().reply(
        "/privacy-policy/list/",
        Ok(response(200, "OK", "<html>maintenance</html>")),
    ));

    let (status, _, json) = get(app(&upstream), "/api/privacy-policy/list").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["message"], "Failed to fetch privacy policy");
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn undecodable_query_string_gets_an_envelope() {
    let upstream = Arc::new(FakeUpstream::default());

    let (status, headers, json) = get(app(&upstream), "/api/casestudy/case-studies?page=1&page=2").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], false);
    assert_eq!(json["message"], "Invalid request");
    assert!(json["error"].as_str().unwrap().contains("page"));
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert!(upstream.urls().is_empty());
}

// ── Single item ──────────────────────────────────────────────────────

#[tokio::test]
async fn item_by_id() {
    let body = json!({"status": true, "message": "ok", "data": item(7, "seven")});
    let upstream = Arc::new(FakeUpstream::default().ok("/casestudy/case-studies/7/", body.clone()));

    let (status, _, json) = get(app(&upstream), "/api/casestudy/case-studies/7").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, body);
}

#[tokio::test]
async fn blank_id_is_a_bad_request() {
    let upstream = Arc::new(FakeUpstream::default());

    let (status, _, json) = get(app(&upstream), "/api/casestudy/case-studies/%20").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json, json!({"status": false, "message": "Case study ID is required"}));
    assert!(upstream.urls().is_empty());
}

#[tokio::test]
async fn undecodable_path_segment_gets_an_envelope() {
    let upstream = Arc::new(FakeUpstream::default());

    for uri in ["/api/casestudy/case-studies/%FF", "/api/casestudy/case-studies/slug/%FF/"] {
        let (status, headers, json) = get(app(&upstream), uri).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(json["status"], false);
        assert_eq!(json["message"], "Invalid request");
        assert!(json["error"].is_string());
        assert_eq!(headers["access-control-allow-methods"], "GET, OPTIONS");
    }
    assert!(upstream.urls().is_empty());
}

#[tokio::test]
async fn missing_slug_is_a_bad_request() {
    let upstream = Arc::new(FakeUpstream::default());

    let (status, _, json) = get(app(&upstream), "/api/casestudy/case-studies/slug/").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Case study slug is required");
    assert!(upstream.urls().is_empty());
}

#[tokio::test]
async fn slug_query_result_is_narrowed_to_match() {
    let upstream = Arc::new(FakeUpstream::default().ok(
        "/casestudy/case-studies/?slug=edge-servers",
        json!({
            "status": true,
            "message": "ok",
            "data": [item(1, "edge-servers-old"), item(2, "edge-servers")]
        }),
    ));

    let (status, _, json) = get(app(&upstream), "/api/casestudy/case-studies/slug/edge-servers").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"], item(2, "edge-servers"));
    assert_eq!(upstream.urls().len(), 1);
}

#[tokio::test]
async fn slug_without_match_is_not_found() {
    let upstream = Arc::new(FakeUpstream::default().ok(
        "/casestudy/case-studies/?slug=missing",
        json!({"status": true, "data": [item(1, "other")]}),
    ));

    let (status, _, json) = get(app(&upstream), "/api/casestudy/case-studies/slug/missing").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json, json!({"status": false, "message": "Case study not found"}));
}

#[tokio::test]
async fn slug_falls_back_to_path_lookup() {
    let body = json!({"status": true, "data": item(9, "granit")});
    let upstream = Arc::new(
        FakeUpstream::default()
            .reply(
                "/casestudy/case-studies/?slug=granit",
                Ok(response(400, "Bad Request", "{}")),
            )
            .ok("/casestudy/case-studies/granit/", body.clone()),
    );

    let (status, _, json) = get(app(&upstream), "/api/casestudy/case-studies/slug/granit/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, body);
    assert_eq!(
        upstream.urls(),
        vec![
            "https://upstream.test/api/casestudy/case-studies/?slug=granit",
            "https://upstream.test/api/casestudy/case-studies/granit/",
        ]
    );
}

#[tokio::test]
async fn slug_fallback_failure_mirrors_path_status() {
    let upstream = Arc::new(FakeUpstream::default().reply(
        "/casestudy/case-studies/?slug=gone",
        Ok(response(400, "Bad Request", "{}")),
    ));

    let (status, headers, json) = get(app(&upstream), "/api/casestudy/case-studies/slug/gone").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        json,
        json!({"status": false, "message": "API responded with status 404", "error": "Not Found"})
    );
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(upstream.urls().len(), 2);
}

// ── Submissions ──────────────────────────────────────────────────────

#[tokio::test]
async fn lead_body_is_forwarded_untouched() {
    let upstream = Arc::new(FakeUpstream::default().ok(
        "/casestudy/case-study-leads/",
        json!({"status": true, "message": "Lead created"}),
    ));
    let lead = json!({"case_study": 12, "data": {"Full Name": "Ada"}});

    let (status, headers, json) = post(app(&upstream), "/api/casestudy/case-study-leads", &lead.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Lead created");
    assert_eq!(headers["access-control-allow-methods"], "POST, OPTIONS");
    let calls = upstream.calls.lock().unwrap();
    assert_eq!(calls[0].1.as_ref(), Some(&lead));
}

#[tokio::test]
async fn lead_error_detail_comes_from_upstream_message() {
    let upstream = Arc::new(FakeUpstream::default().reply(
        "/casestudy/case-study-leads/",
        Ok(response(
            400,
            "Bad Request",
            r#"{"status": false, "message": "email is invalid"}"#,
        )),
    ));

    let (status, _, json) = post(app(&upstream), "/api/casestudy/case-study-leads/", r#"{"case_study": 1}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "API responded with status 400");
    assert_eq!(json["error"], "email is invalid");
}

#[tokio::test]
async fn contact_error_without_json_uses_status_text() {
    let upstream = Arc::new(FakeUpstream::default().reply(
        "/contact/contacts/",
        Ok(response(502, "Bad Gateway", "upstream down")),
    ));

    let (status, _, json) = post(app(&upstream), "/api/contact/contacts", r#"{"full_name": "Linus"}"#).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["error"], "Bad Gateway");
}

#[tokio::test]
async fn non_json_submission_never_reaches_upstream() {
    let upstream = Arc::new(FakeUpstream::default());

    let (status, _, json) = post(app(&upstream), "/api/contact/contacts", "name=Linus").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["message"], "Failed to submit contact form");
    assert!(upstream.urls().is_empty());
}

#[tokio::test]
async fn submission_limit_is_shared_by_both_spellings() {
    let gate = Arc::new(Semaphore::new(0));
    let upstream = Arc::new(
        FakeUpstream {
            gate: Some(Arc::clone(&gate)),
            ..FakeUpstream::default()
        }
        .ok("/contact/contacts/", json!({"status": true, "message": "Thanks"})),
    );
    let app = app(&upstream);

    let held: Vec<_> = (0..MAX_IN_FLIGHT_SUBMISSIONS)
        .map(|_| tokio::spawn(post(app.clone(), "/api/contact/contacts/", "{}")))
        .collect();
    while upstream.urls().len() < MAX_IN_FLIGHT_SUBMISSIONS {
        tokio::task::yield_now().await;
    }

    let queued = tokio::time::timeout(
        Duration::from_millis(50),
        post(app.clone(), "/api/contact/contacts", "{}"),
    )
    .await;
    assert!(queued.is_err(), "other spelling must wait for a shared permit");
    assert_eq!(upstream.urls().len(), MAX_IN_FLIGHT_SUBMISSIONS);

    gate.add_permits(MAX_IN_FLIGHT_SUBMISSIONS + 1);
    for task in held {
        assert_eq!(task.await.unwrap().0, StatusCode::OK);
    }
    let (status, _, _) = post(app, "/api/contact/contacts", "{}").await;
    assert_eq!(status, StatusCode::OK);
}

// ── Preflight ────────────────────────────────────────────────────────

#[tokio::test]
async fn options_answers_with_resource_verbs() {
    let upstream = Arc::new(FakeUpstream::default());

    let (status, headers, _) = send(
        app(&upstream),
        Method::OPTIONS,
        "/api/casestudy/case-study-leads",
        Body::empty(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(headers["access-control-allow-methods"], "POST, OPTIONS");

    let (status, headers, _) = send(
        app(&upstream),
        Method::OPTIONS,
        "/api/casestudy/case-studies/slug/granit",
        Body::empty(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers["access-control-allow-methods"], "GET, OPTIONS");
    assert!(upstream.urls().is_empty());
}

#[tokio::test]
async fn options_covers_every_resource() {
    let upstream = Arc::new(FakeUpstream::default());

    for (uri, methods) in [
        ("/api/privacy-policy/list", "GET, OPTIONS"),
        ("/api/privacy-policy/list/", "GET, OPTIONS"),
        ("/api/contact/contacts", "POST, OPTIONS"),
        ("/api/contact/contacts/", "POST, OPTIONS"),
        ("/api/casestudy/case-studies", "GET, OPTIONS"),
    ] {
        let (status, headers, _) = send(app(&upstream), Method::OPTIONS, uri, Body::empty()).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(headers["access-control-allow-origin"], "*", "{uri}");
        assert_eq!(headers["access-control-allow-methods"], methods, "{uri}");
        assert_eq!(headers["access-control-allow-headers"], "Content-Type", "{uri}");
    }
    assert!(upstream.urls().is_empty());
}

#[tokio::test]
async fn error_responses_carry_cors_headers() {
    let upstream = Arc::new(FakeUpstream::default());

    let (status, headers, _) = get(app(&upstream), "/api/privacy-policy/list").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(headers["access-control-allow-methods"], "GET, OPTIONS");

    let (status, headers, _) = post(app(&upstream), "/api/contact/contacts", "not json").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(headers["access-control-allow-methods"], "POST, OPTIONS");
}
