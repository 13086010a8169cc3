//! Application route configuration.
//!
//! One GraphQL endpoint serves queries and mutations over POST and
//! subscriptions over WebSocket; GraphiQL is mounted at the root for
//! interactive exploration.

use axum::{
    extract::{State, WebSocketUpgrade},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    response::{Html, IntoResponse, Json, Response},
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use async_graphql::http::{GraphiQLSource, ALL_WEBSOCKET_PROTOCOLS};
use async_graphql_axum::{GraphQLProtocol, GraphQLRequest, GraphQLResponse, GraphQLWebSocket};

use super::graphql::CurrentUser;
use super::AppState;
use crate::config::{Config, BEARER_TOKEN_PREFIX};
use crate::services::AuthService;

/// Create the application router with all routes configured
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        // GraphiQL playground
        .route("/", get(graphiql))
        // Liveness endpoint
        .route("/health", get(health))
        // Queries/mutations over POST, subscriptions over WebSocket
        .route("/graphql", get(graphql_ws_handler).post(graphql_handler))
        // Global middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS for the configured browser client origin
fn cors_layer(config: &Config) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true);

    match config.client_url.parse::<HeaderValue>() {
        Ok(origin) => layer.allow_origin(origin),
        Err(_) => {
            tracing::warn!("CLIENT_URL is not a valid origin, CORS allows no origins");
            layer
        }
    }
}

/// Serve the GraphiQL IDE
async fn graphiql() -> impl IntoResponse {
    Html(
        GraphiQLSource::build()
            .endpoint("/graphql")
            .subscription_endpoint("/graphql")
            .finish(),
    )
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: DateTime<Utc>,
    database: &'static str,
}

/// Liveness endpoint: process status, timestamp, database reachability
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database_ok = state.database.ping().await.is_ok();

    let response = HealthResponse {
        status: if database_ok { "ok" } else { "degraded" },
        timestamp: Utc::now(),
        database: if database_ok { "healthy" } else { "unhealthy" },
    };

    let status_code = if database_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}

/// Execute a GraphQL request, attaching the authenticated caller when the
/// Authorization header carries a valid bearer token. A missing or invalid
/// token yields an anonymous context, not an error.
async fn graphql_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let mut request = req.into_inner();

    if let Some(user) = header_user(&state, &headers) {
        request = request.data(user);
    }

    state.schema.execute(request).await.into()
}

fn header_user(state: &AppState, headers: &HeaderMap) -> Option<CurrentUser> {
    let header = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    token_user(state.auth_service.as_ref(), header)
}

/// Resolve "Bearer <token>" into the calling user, or anonymous on any failure
fn token_user(auth: &dyn AuthService, header: &str) -> Option<CurrentUser> {
    let token = header.strip_prefix(BEARER_TOKEN_PREFIX)?;
    let claims = auth.verify_token(token).ok()?;
    Some(CurrentUser::from_claims(&claims))
}

/// Upgrade to GraphQL-over-WebSocket for subscriptions. The client may
/// authenticate via an `Authorization` field in the `connection_init`
/// payload; like the HTTP path, failures leave the connection anonymous.
async fn graphql_ws_handler(
    State(state): State<AppState>,
    protocol: GraphQLProtocol,
    upgrade: WebSocketUpgrade,
) -> Response {
    let schema = state.schema.clone();
    let auth = state.auth_service.clone();

    upgrade
        .protocols(ALL_WEBSOCKET_PROTOCOLS)
        .on_upgrade(move |socket| async move {
            GraphQLWebSocket::new(socket, schema, protocol)
                .on_connection_init(move |payload| async move {
                    let mut data = async_graphql::Data::default();
                    if let Some(user) = connection_init_user(auth.as_ref(), &payload) {
                        data.insert(user);
                    }
                    Ok(data)
                })
                .serve()
                .await;
        })
}

fn connection_init_user(
    auth: &dyn AuthService,
    payload: &serde_json::Value,
) -> Option<CurrentUser> {
    let header = payload.get("Authorization")?.as_str()?;
    token_user(auth, header)
}
