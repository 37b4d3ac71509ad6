use axum::Json;
use orchestrator_core::types::HealthStatus;

/// GET /health — liveness only; never touches the upstreams.
pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus::OK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn health_is_constant() {
        let first = health().await.0;
        let second = health().await.0;
        assert_eq!(first, second);
        assert_eq!(first.status, "ok");
        assert_eq!(first.service, "orchestrator");
    }
}
