use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use tickethub_cache::{rate_limit_key, Cache};

#[derive(Debug, Serialize)]
struct RateLimitError {
    error: String,
    message: String,
    retry_after: u64,
}

/// Extract client IP from proxy headers
fn extract_ip(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.split(',').next())
        .or_else(|| headers.get("x-real-ip").and_then(|h| h.to_str().ok()))
        .unwrap_or("unknown")
        .trim()
        .to_string()
}

/// Fixed-window check: counts requests per key, fails open on cache errors
async fn check(
    cache: &Cache,
    scope: &str,
    ip: &str,
    max_requests: i64,
    window_seconds: u64,
) -> Result<bool, tickethub_cache::CacheError> {
    let key = rate_limit_key(scope, ip);
    let count = cache.incr_with_ttl(&key, window_seconds as usize).await?;
    Ok(count <= max_requests)
}

fn too_many_requests(scope: &str, retry_after: u64) -> Response {
    (
        StatusCode::TOO_MANY_REQUESTS,
        Json(RateLimitError {
            error: "rate_limit_exceeded".to_string(),
            message: format!(
                "Too many {} attempts. Please try again in {} seconds.",
                scope, retry_after
            ),
            retry_after,
        }),
    )
        .into_response()
}

/// Rate limit middleware for login attempts
/// 5 requests per 60 seconds per IP
pub async fn rate_limit_login(
    State(cache): State<Arc<Cache>>,
    request: Request,
    next: Next,
) -> Result<Response, Response> {
    let ip = extract_ip(request.headers());

    match check(&cache, "login", &ip, 5, 60).await {
        Ok(true) => Ok(next.run(request).await),
        Ok(false) => {
            tracing::warn!("Rate limit exceeded for login from IP: {}", ip);
            Err(too_many_requests("login", 60))
        }
        Err(e) => {
            tracing::error!("Rate limit check error: {}", e);
            // On error, allow the request (fail open)
            Ok(next.run(request).await)
        }
    }
}

/// Rate limit middleware for organisation sign-up
/// 3 requests per 300 seconds (5 minutes) per IP
pub async fn rate_limit_signup(
    State(cache): State<Arc<Cache>>,
    request: Request,
    next: Next,
) -> Result<Response, Response> {
    let ip = extract_ip(request.headers());

    match check(&cache, "signup", &ip, 3, 300).await {
        Ok(true) => Ok(next.run(request).await),
        Ok(false) => {
            tracing::warn!("Rate limit exceeded for signup from IP: {}", ip);
            Err(too_many_requests("signup", 300))
        }
        Err(e) => {
            tracing::error!("Rate limit check error: {}", e);
            Ok(next.run(request).await)
        }
    }
}
