use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{DateTime, Utc};
use flashcards::{Collection, UserWords, WordError, WordService, entity::duration_nanos};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Header carrying the authenticated user id, set by the auth proxy in front
pub const USER_ID_HEADER: &str = "x-user-id";

const WRONG_JSON_FORMAT: &str = "wrong json format";

#[derive(Clone)]
pub struct AppState {
    pub service: WordService,
}

#[derive(Serialize, Deserialize)]
pub struct AddWordRequest {
    pub word: String,
    pub collection_name: String,
    pub last_repeat: DateTime<Utc>,
    #[serde(default, with = "duration_nanos")]
    pub time_diff: Duration,
}

#[derive(Serialize, Deserialize)]
pub struct UpdateLearnIntervalRequest {
    pub word: String,
    pub collection_name: String,
    pub last_repeat: DateTime<Utc>,
    #[serde(with = "duration_nanos")]
    pub time_diff: Duration,
}

#[derive(Serialize, Deserialize)]
pub struct DeleteWordRequest {
    pub word: String,
    pub collection_name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
    pub path: String,
}

type Reply = (StatusCode, Json<MessageResponse>);

fn reply(status: StatusCode, message: impl Into<String>, uri: &Uri) -> Reply {
    (
        status,
        Json(MessageResponse {
            message: message.into(),
            path: uri.path().to_string(),
        }),
    )
}

fn status_reply(status: StatusCode, uri: &Uri) -> Reply {
    reply(status, status.canonical_reason().unwrap_or_default(), uri)
}

/// Build the `/v1/words` router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/v1/words",
            get(user_words)
                .post(add_word)
                .put(update_learn_interval)
                .delete(delete_word),
        )
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn user_id(headers: &HeaderMap, uri: &Uri) -> Result<String, Reply> {
    headers
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .ok_or_else(|| status_reply(StatusCode::UNAUTHORIZED, uri))
}

fn body<T>(payload: Result<Json<T>, JsonRejection>, uri: &Uri) -> Result<T, Reply> {
    payload
        .map(|Json(body)| body)
        .map_err(|_| reply(StatusCode::BAD_REQUEST, WRONG_JSON_FORMAT, uri))
}

/// Map a service failure to a client or server reply
fn failure(err: WordError, operation: &str, uri: &Uri) -> Reply {
    match err {
        WordError::WordNotSupported => reply(StatusCode::FORBIDDEN, err.to_string(), uri),
        WordError::InvalidInput(_) => status_reply(StatusCode::BAD_REQUEST, uri),
        err => {
            error!(operation, step = ?err.step(), error = %err, "internal error");
            status_reply(StatusCode::INTERNAL_SERVER_ERROR, uri)
        }
    }
}

async fn user_words(
    State(state): State<AppState>,
    headers: HeaderMap,
    uri: Uri,
) -> Result<Json<UserWords>, Reply> {
    let user_id = user_id(&headers, &uri)?;
    let words = state
        .service
        .user_words(&user_id)
        .await
        .map_err(|e| failure(e, "list words", &uri))?;
    Ok(Json(words))
}

async fn add_word(
    State(state): State<AppState>,
    headers: HeaderMap,
    uri: Uri,
    payload: Result<Json<AddWordRequest>, JsonRejection>,
) -> Result<Reply, Reply> {
    let user_id = user_id(&headers, &uri)?;
    let request = body(payload, &uri)?;

    let collection = Collection::new(
        user_id,
        request.collection_name,
        request.word,
        request.last_repeat,
        request.time_diff,
    );
    state
        .service
        .add_word(&collection)
        .await
        .map_err(|e| failure(e, "add word", &uri))?;

    info!(word = %collection.word, collection = %collection.name, "word added");
    Ok(status_reply(StatusCode::CREATED, &uri))
}

async fn update_learn_interval(
    State(state): State<AppState>,
    headers: HeaderMap,
    uri: Uri,
    payload: Result<Json<UpdateLearnIntervalRequest>, JsonRejection>,
) -> Result<Reply, Reply> {
    let user_id = user_id(&headers, &uri)?;
    let request = body(payload, &uri)?;

    let collection = Collection::new(
        user_id,
        request.collection_name,
        request.word,
        request.last_repeat,
        request.time_diff,
    );
    state
        .service
        .update_learn_interval(&collection)
        .await
        .map_err(|e| failure(e, "update learn interval", &uri))?;

    Ok(status_reply(StatusCode::OK, &uri))
}

async fn delete_word(
    State(state): State<AppState>,
    headers: HeaderMap,
    uri: Uri,
    payload: Result<Json<DeleteWordRequest>, JsonRejection>,
) -> Result<Reply, Reply> {
    let user_id = user_id(&headers, &uri)?;
    let request = body(payload, &uri)?;

    state
        .service
        .delete_word(&user_id, &request.collection_name, &request.word)
        .await
        .map_err(|e| failure(e, "delete word", &uri))?;

    Ok(status_reply(StatusCode::OK, &uri))
}

async fn not_found(uri: Uri) -> Response {
    status_reply(StatusCode::NOT_FOUND, &uri).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request};
    use flashcards::{MemoryStore, MockMode, MockTranslator};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app(mode: MockMode) -> Router {
        let service = WordService::new(
            Arc::new(MemoryStore::new()),
            Arc::new(MockTranslator::new(mode)),
        );
        router(AppState { service })
    }

    fn request(method: Method, user: Option<&str>, body: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri("/v1/words")
            .header("content-type", "application/json");
        if let Some(user) = user {
            builder = builder.header(USER_ID_HEADER, user);
        }
        builder
            .body(body.map(|b| Body::from(b.to_string())).unwrap_or_default())
            .unwrap()
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    const ADD_LEAD: &str = r#"{"word":"lead","collection_name":"metals","last_repeat":"2024-05-01T12:00:00Z","time_diff":0}"#;

    // ========== Auth Tests ==========

    #[tokio::test]
    async fn test_missing_user_is_unauthorized() {
        let response = app(MockMode::Echo)
            .oneshot(request(Method::GET, None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = json_body(response).await;
        assert_eq!(body["path"], "/v1/words");
    }

    // ========== Add Word Tests ==========

    #[tokio::test]
    async fn test_add_word_created() {
        let app = app(MockMode::Echo);
        let response = app
            .clone()
            .oneshot(request(Method::POST, Some("u1"), Some(ADD_LEAD)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .oneshot(request(Method::GET, Some("u1"), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["words"]["metals"][0]["word"], "lead");
        assert_eq!(body["words"]["metals"][0]["main_translation"], "lead_ru");
    }

    #[tokio::test]
    async fn test_add_unsupported_word_forbidden() {
        let response = app(MockMode::Unsupported)
            .oneshot(request(Method::POST, Some("u1"), Some(ADD_LEAD)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = json_body(response).await;
        assert_eq!(body["message"], "word not supported");
    }

    #[tokio::test]
    async fn test_add_word_bad_json() {
        let response = app(MockMode::Echo)
            .oneshot(request(Method::POST, Some("u1"), Some("{not json")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["message"], WRONG_JSON_FORMAT);
    }

    #[tokio::test]
    async fn test_add_word_empty_word_is_bad_request() {
        let body = r#"{"word":"","collection_name":"metals","last_repeat":"2024-05-01T12:00:00Z"}"#;
        let response = app(MockMode::Echo)
            .oneshot(request(Method::POST, Some("u1"), Some(body)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_gateway_failure_is_internal_error() {
        let response = app(MockMode::Error("down".to_string()))
            .oneshot(request(Method::POST, Some("u1"), Some(ADD_LEAD)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    // ========== Other Operation Tests ==========

    #[tokio::test]
    async fn test_unknown_route_not_found() {
        let request = Request::builder()
            .uri("/v1/nothing")
            .body(Body::empty())
            .unwrap();
        let response = app(MockMode::Echo).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["path"], "/v1/nothing");
    }

    #[tokio::test]
    async fn test_list_words_for_new_user() {
        let response = app(MockMode::Echo)
            .oneshot(request(Method::GET, Some("u1"), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, serde_json::json!({"words": {}}));
    }

    #[tokio::test]
    async fn test_delete_missing_word_ok() {
        let body = r#"{"word":"lead","collection_name":"metals"}"#;
        let response = app(MockMode::Echo)
            .oneshot(request(Method::DELETE, Some("u1"), Some(body)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_update_learn_interval_ok() {
        let app = app(MockMode::Echo);
        app.clone()
            .oneshot(request(Method::POST, Some("u1"), Some(ADD_LEAD)))
            .await
            .unwrap();

        let update = r#"{"word":"lead","collection_name":"metals","last_repeat":"2024-05-02T12:00:00Z","time_diff":3000000000}"#;
        let response = app
            .clone()
            .oneshot(request(Method::PUT, Some("u1"), Some(update)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(request(Method::GET, Some("u1"), None))
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body["words"]["metals"][0]["time_diff"], 3_000_000_000u64);
    }
}
