use crate::HttpChannel;

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Instant;

/// Health check result
#[derive(Debug, Clone, PartialEq)]
pub struct HealthCheckResult {
    pub healthy: bool,
    pub latency_ms: u64,
    pub error: Option<String>,
}

impl HealthCheckResult {
    pub fn healthy(latency_ms: u64) -> Self {
        Self { healthy: true, latency_ms, error: None }
    }

    pub fn unhealthy(error: String) -> Self {
        Self { healthy: false, latency_ms: 0, error: Some(error) }
    }
}

/// Probe whether the answering engine is up
#[async_trait]
pub trait HealthCheck: Send + Sync {
    async fn check_health(&self) -> HealthCheckResult;
}

/// Body of the engine's health route: `{"status": "healthy"}`
#[derive(Debug, Deserialize)]
struct HealthBody {
    #[serde(default)]
    status: Option<String>,
}

#[async_trait]
impl HealthCheck for HttpChannel {
    async fn check_health(&self) -> HealthCheckResult {
        let Some(url) = self.health_endpoint.as_deref() else {
            return HealthCheckResult::unhealthy("no health endpoint configured".to_string());
        };

        let start = Instant::now();
        let response = match self.client.get(url).send().await {
            Ok(resp) => resp,
            Err(e) => return HealthCheckResult::unhealthy(format!("Health check failed: {}", e)),
        };
        let latency = start.elapsed().as_millis() as u64;

        if !response.status().is_success() {
            return HealthCheckResult::unhealthy(format!("Health check returned {}", response.status()));
        }

        match response.json::<HealthBody>().await {
            Ok(HealthBody { status: Some(status) }) if status != "healthy" => {
                HealthCheckResult::unhealthy(format!("engine reports status '{}'", status))
            }
            Ok(_) => HealthCheckResult::healthy(latency),
            Err(e) => HealthCheckResult::unhealthy(format!("Unreadable health response: {}", e)),
        }
    }
}
