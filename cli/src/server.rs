use std::sync::{Arc, Mutex, PoisonError};

use axum::{
    Json, Router,
    extract::{Query, Request, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    middleware::{self, Next},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use tower_http::limit::RequestBodyLimitLayer;

use tisane_core::counter::Session;
use tisane_core::error::TisaneError;
use tisane_core::models::Recommendation;
use tisane_core::service::TisaneService;

use crate::page;

const BODY_LIMIT: usize = 16 * 1024; // 16 KB

pub const SESSION_COOKIE: &str = "tisane_session";

const PAGE_CSP: &str = "default-src 'none'; style-src 'unsafe-inline'; form-action 'self'";

#[derive(Clone)]
struct AppState {
    service: Arc<Mutex<TisaneService>>,
}

// --- Request / Response types ---

#[derive(Deserialize)]
struct ObjectiveQuery {
    objective: Option<String>,
}

#[derive(Serialize)]
struct VisitsResponse {
    visits: u64,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

// --- Error handling ---

enum ApiError {
    BadRequest(String),
    Fatal(TisaneError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::Fatal(err) => {
                tracing::error!("cannot serve recommendations: {err}");
                let message = match err {
                    TisaneError::DataLoad(_) => "Recommendation data unavailable",
                    TisaneError::NoObjectives(_) => "No objectives detected",
                };
                (StatusCode::INTERNAL_SERVER_ERROR, message.to_string())
            }
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<TisaneError> for ApiError {
    fn from(err: TisaneError) -> Self {
        Self::Fatal(err)
    }
}

// --- Sessions ---

/// A fresh random session id, 32 hex characters.
fn new_session_id() -> String {
    use rand::Rng;
    use std::fmt::Write;

    let bytes: [u8; 16] = rand::rng().random();
    bytes
        .iter()
        .fold(String::with_capacity(32), |mut acc: String, b| {
            let _ = write!(acc, "{b:02x}");
            acc
        })
}

fn is_session_id(value: &str) -> bool {
    value.len() == 32 && value.bytes().all(|b| b.is_ascii_hexdigit())
}

/// The session id carried by the request's cookies, if it is one we could have issued.
///
/// The cookie is only handed out once the visit has been counted, so carrying
/// it is the whole session state; nothing is kept per visitor on the server.
fn session_from_cookies(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string())
        .filter(|value| is_session_id(value))
}

// --- Middleware ---

async fn security_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert(
        "x-content-type-options",
        HeaderValue::from_static("nosniff"),
    );
    headers.insert("x-frame-options", HeaderValue::from_static("DENY"));
    headers
        .entry("content-security-policy")
        .or_insert(HeaderValue::from_static("default-src 'none'"));
    response
}

// --- Handlers ---

async fn form_page(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<ObjectiveQuery>,
) -> Response {
    let (mut session, issued) = match session_from_cookies(&headers) {
        Some(_) => (Session::resumed(), None),
        None => (Session::new(), Some(new_session_id())),
    };

    let (visits, result) = {
        let mut service = state
            .service
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let visits = service.record_view(&mut session);
        (visits, service.select(params.objective.as_deref()))
    };

    let (status, html) = match result {
        Ok(selection) => (StatusCode::OK, page::render_selection(visits, &selection)),
        Err(err) => {
            tracing::error!("form page halted: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                page::render_fatal(visits, &err),
            )
        }
    };

    let mut response = (status, Html(html)).into_response();
    let response_headers = response.headers_mut();
    response_headers.insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static(PAGE_CSP),
    );
    if let Some(session_id) = issued {
        let cookie = format!("{SESSION_COOKIE}={session_id}; Path=/; HttpOnly; SameSite=Lax");
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            response_headers.insert(header::SET_COOKIE, value);
        }
    }
    response
}

async fn list_objectives(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    let mut service = state
        .service
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    Ok(Json(service.objectives()?))
}

async fn list_recommendations(
    State(state): State<AppState>,
    Query(params): Query<ObjectiveQuery>,
) -> Result<Json<Vec<Recommendation>>, ApiError> {
    let objective = params
        .objective
        .ok_or_else(|| ApiError::BadRequest("Missing 'objective' query parameter".to_string()))?;

    let mut service = state
        .service
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    Ok(Json(service.recommendations(&objective)?))
}

async fn get_visits(State(state): State<AppState>) -> Json<VisitsResponse> {
    let service = state
        .service
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    Json(VisitsResponse {
        visits: service.visits(),
    })
}

async fn health() -> &'static str {
    "ok"
}

fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(form_page))
        .route("/api/objectives", get(list_objectives))
        .route("/api/recommendations", get(list_recommendations))
        .route("/api/visits", get(get_visits))
        .route("/health", get(health))
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT))
        .layer(middleware::from_fn(security_headers))
        .with_state(state)
}

// --- Server startup ---

pub async fn start_server(service: TisaneService, port: u16, bind: &str) -> anyhow::Result<()> {
    let state = AppState {
        service: Arc::new(Mutex::new(service)),
    };

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(format!("{bind}:{port}")).await?;
    tracing::info!("listening on http://{bind}:{port}");
    eprintln!("Listening on http://{bind}:{port}");
    axum::serve(listener, app).await?;

    Ok(())
}
