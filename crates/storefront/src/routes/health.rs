//! Health check handlers.

use axum::extract::State;
use axum::http::StatusCode;
use tracing::error;

use crate::state::AppState;

/// `GET /health` - liveness. Answers as long as the process is up.
pub async fn liveness() -> &'static str {
    "OK"
}

/// `GET /health/ready` - readiness. Pings the database; 503 when it is
/// unreachable so load balancers stop routing traffic here.
pub async fn readiness(State(state): State<AppState>) -> Result<&'static str, StatusCode> {
    match sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(state.pool())
        .await
    {
        Ok(_) => Ok("OK"),
        Err(err) => {
            error!(error = %err, "Readiness check failed");
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}
