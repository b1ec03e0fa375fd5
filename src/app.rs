use std::net::SocketAddr;

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use crate::{auth, jobs};

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .nest(
            "/api",
            Router::new()
                .merge(auth::router())
                .merge(jobs::router())
                .route("/health", get(|| async { "ok" })),
        )
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     _latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, "response");
                        } else {
                            tracing::info!(%status, "response");
                        }
                    },
                ),
        )
}

pub async fn serve(app: Router) -> anyhow::Result<()> {
    let addr: SocketAddr = format!(
        "{}:{}",
        std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
        std::env::var("APP_PORT").unwrap_or_else(|_| "8080".into())
    )
    .parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

// Router-level tests cover the paths that short-circuit before any storage
// call: bearer extraction and request validation. The fake state's pool
// connects lazily, so nothing here touches a database.
#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        extract::FromRef,
        http::{header, Request, StatusCode},
    };
    use jsonwebtoken::{encode, Header};
    use time::{Duration as TimeDuration, OffsetDateTime};
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::auth::jwt::{Claims, JwtKeys};

    fn app() -> Router {
        build_app(AppState::fake())
    }

    async fn body_json(body: Body) -> serde_json::Value {
        let bytes = to_bytes(body, usize::MAX).await.expect("body");
        serde_json::from_slice(&bytes).expect("json body")
    }

    fn expired_token() -> String {
        let keys = JwtKeys::from_ref(&AppState::fake());
        let now = OffsetDateTime::now_utc();
        let claims = Claims {
            sub: Uuid::new_v4(),
            iat: (now - TimeDuration::hours(3)).unix_timestamp() as usize,
            exp: (now - TimeDuration::hours(2)).unix_timestamp() as usize,
            iss: keys.issuer.clone(),
            aud: keys.audience.clone(),
        };
        encode(&Header::default(), &claims, &keys.encoding).expect("encode")
    }

    #[tokio::test]
    async fn health_is_open() {
        let res = app()
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn jobs_without_token_is_401() {
        let res = app()
            .oneshot(Request::get("/api/jobs").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(res.into_body()).await;
        assert_eq!(body["message"], "Missing Authorization header");
    }

    #[tokio::test]
    async fn non_bearer_scheme_is_401() {
        let res = app()
            .oneshot(
                Request::get("/api/jobs")
                    .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(res.into_body()).await;
        assert_eq!(body["message"], "Missing Authorization header");
    }

    #[tokio::test]
    async fn garbage_bearer_token_is_401() {
        let res = app()
            .oneshot(
                Request::get("/api/jobs")
                    .header(header::AUTHORIZATION, "Bearer not-a-jwt")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(res.into_body()).await;
        assert_eq!(body["message"], "Invalid token");
    }

    #[tokio::test]
    async fn expired_bearer_token_is_401() {
        let res = app()
            .oneshot(
                Request::get("/api/jobs")
                    .header(header::AUTHORIZATION, format!("Bearer {}", expired_token()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(res.into_body()).await;
        assert_eq!(body["message"], "Token expired");
    }

    #[tokio::test]
    async fn profile_requires_a_token_too() {
        let res = app()
            .oneshot(
                Request::get("/api/auth/profile")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn register_validation_reports_every_field() {
        let res = app()
            .oneshot(
                Request::post("/api/auth/register")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"name":"","email":"nope","password":"abc"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body = body_json(res.into_body()).await;
        let errors = body["errors"].as_array().expect("errors array");
        assert_eq!(errors.len(), 3);
    }

    #[tokio::test]
    async fn login_validation_rejects_empty_password() {
        let res = app()
            .oneshot(
                Request::post("/api/auth/login")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"email":"ann@x.com","password":""}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body = body_json(res.into_body()).await;
        assert_eq!(body["errors"][0]["field"], "password");
    }
}
