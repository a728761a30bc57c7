//! [`UpdateSink`] posting to the status service's `/trigger` endpoint.

use alerthub_app::ports::UpdateSink;
use alerthub_domain::error::AlertHubError;
use alerthub_domain::sensor::SensorUpdate;
use reqwest::{Client, Response};
use serde::Deserialize;

use crate::config::ApiConfig;
use crate::error::DeliveryError;

const TRIGGER_PATH: &str = "/trigger";
const HOME_PATH: &str = "/";

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// HTTP client for the status API.
///
/// A request that reached the server is never repeated, so each update is
/// applied at most once. Only connection failures are retried.
#[derive(Debug, Clone)]
pub struct HttpUpdateSink {
    client: Client,
    config: ApiConfig,
}

impl HttpUpdateSink {
    /// # Errors
    ///
    /// Returns [`DeliveryError::Client`] when the TLS backend or resolver
    /// cannot be initialised.
    pub fn new(config: ApiConfig) -> Result<Self, DeliveryError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.timeout())
            .build()
            .map_err(DeliveryError::Client)?;
        Ok(Self { client, config })
    }

    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Check that the status service answers on its root endpoint.
    ///
    /// # Errors
    ///
    /// Returns the transport error or [`DeliveryError::Rejected`] on a
    /// non-success status.
    pub async fn probe(&self) -> Result<(), DeliveryError> {
        let url = self.config.url(HOME_PATH);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| DeliveryError::from_send(&url, err))?;
        check(response).await
    }

    /// Post one update, retrying while the server cannot be reached.
    ///
    /// # Errors
    ///
    /// Returns the last [`DeliveryError`] once retries are exhausted or on
    /// the first non-retryable failure.
    pub async fn post_update(&self, update: &SensorUpdate) -> Result<(), DeliveryError> {
        let url = self.config.url(TRIGGER_PATH);
        let mut attempt = 0;
        loop {
            let sent = self.client.post(&url).json(update).send().await;
            let err = match sent {
                Ok(response) => return check(response).await,
                Err(err) => DeliveryError::from_send(&url, err),
            };

            if !err.is_retryable() || attempt >= self.config.retries {
                return Err(err);
            }
            let delay = self.config.backoff(attempt);
            tracing::debug!(%err, attempt, delay_ms = delay.as_millis(), "retrying delivery");
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

async fn check(response: Response) -> Result<(), DeliveryError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => status.canonical_reason().unwrap_or_default().to_string(),
    };
    Err(DeliveryError::Rejected {
        status: status.as_u16(),
        message,
    })
}

impl UpdateSink for HttpUpdateSink {
    async fn deliver(&self, update: &SensorUpdate) -> Result<(), AlertHubError> {
        self.post_update(update).await.map_err(DeliveryError::into_domain)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use alerthub_adapter_http_axum::router;
    use alerthub_adapter_http_axum::state::AppState;
    use alerthub_app::services::sensor_service::SensorService;
    use alerthub_domain::registry::SensorRegistry;
    use alerthub_domain::sensor::{SensorId, SensorValue};

    use super::*;

    async fn serve() -> (String, Arc<SensorService>) {
        let service = Arc::new(SensorService::from_registry(&SensorRegistry::default()));
        let app = router::build(AppState::from_arc(Arc::clone(&service)));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}"), service)
    }

    fn sink(base_url: String) -> HttpUpdateSink {
        HttpUpdateSink::new(ApiConfig {
            base_url,
            timeout_ms: 2000,
            retries: 2,
            retry_backoff_ms: 10,
        })
        .unwrap()
    }

    fn update(sensor: &str, value: &str) -> SensorUpdate {
        SensorUpdate {
            sensor: SensorId::new(sensor).unwrap(),
            value: SensorValue::new(value).unwrap(),
        }
    }

    async fn unused_url() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn should_apply_update_on_server() {
        let (url, service) = serve().await;

        sink(url)
            .post_update(&update("gas_sensor", "ALERT"))
            .await
            .unwrap();

        let snapshot = service.status().await;
        assert_eq!(snapshot.get("gas_sensor").unwrap().value.as_str(), "ALERT");
    }

    #[tokio::test]
    async fn should_surface_rejection_message() {
        let (url, _service) = serve().await;

        let err = sink(url)
            .post_update(&update("window_sensor", "OPEN"))
            .await
            .unwrap_err();

        match err {
            DeliveryError::Rejected { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Invalid sensor");
            }
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn should_report_connect_error_after_retries() {
        let err = sink(unused_url().await)
            .post_update(&update("gas_sensor", "ALERT"))
            .await
            .unwrap_err();
        assert!(matches!(err, DeliveryError::Connect { .. }));
    }

    #[tokio::test]
    async fn should_map_failure_to_domain_error_through_port() {
        let err = sink(unused_url().await)
            .deliver(&update("gas_sensor", "ALERT"))
            .await
            .unwrap_err();
        assert!(matches!(err, AlertHubError::Infrastructure(_)));
    }

    #[tokio::test]
    async fn should_probe_running_server() {
        let (url, _service) = serve().await;
        assert!(sink(url).probe().await.is_ok());
    }

    #[tokio::test]
    async fn should_fail_probe_when_server_down() {
        assert!(sink(unused_url().await).probe().await.is_err());
    }
}
