use crate::core::error::GatewayError;
use crate::models::spot::{Occupancy, SpotId, SpotReport};
use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// HTTP client for the Arduino that drives the spots and the turnstile.
///
/// Every call is a single attempt; callers decide what a failure means.
#[derive(Clone)]
pub struct DeviceClient {
    client: reqwest::Client,
    base_url: String,
}

impl DeviceClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Read occupancy for both spots
    ///
    /// GET {base}/vaga
    pub async fn poll_spots(&self) -> Result<SpotReport, GatewayError> {
        let response = self
            .client
            .get(format!("{}/vaga", self.base_url))
            .send()
            .await
            .map_err(|e| GatewayError::Unreachable(e.to_string()))?;

        if response.status() != StatusCode::OK {
            return Err(GatewayError::Status(response.status().as_u16()));
        }

        let body = response
            .json::<Value>()
            .await
            .map_err(|e| GatewayError::MalformedPayload(e.to_string()))?;

        parse_report(&body)
    }

    /// POST {base}/reservar_vagaN
    pub async fn send_reserve(&self, spot: SpotId) -> Result<(), GatewayError> {
        self.post(spot.reserve_path()).await
    }

    /// POST {base}/liberar_vagaN
    pub async fn send_release(&self, spot: SpotId) -> Result<(), GatewayError> {
        self.post(spot.release_path()).await
    }

    /// POST {base}/abrir_catraca
    pub async fn open_turnstile(&self) -> Result<(), GatewayError> {
        self.post("/abrir_catraca").await
    }

    async fn post(&self, path: &str) -> Result<(), GatewayError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "Sending device command");

        let response = self
            .client
            .post(&url)
            .send()
            .await
            .map_err(|e| GatewayError::Unreachable(e.to_string()))?;

        if response.status() != StatusCode::OK {
            return Err(GatewayError::Status(response.status().as_u16()));
        }

        Ok(())
    }
}

/// Turn the controller's JSON object into a report.
/// A missing key reads as free; a present but non-string value is malformed.
pub fn parse_report(body: &Value) -> Result<SpotReport, GatewayError> {
    let object = body
        .as_object()
        .ok_or_else(|| GatewayError::MalformedPayload("expected a JSON object".to_string()))?;

    let read = |id: SpotId| -> Result<Option<Occupancy>, GatewayError> {
        match object.get(id.report_key()) {
            None => Ok(Some(Occupancy::Free)),
            Some(Value::String(phrase)) => Ok(Occupancy::from_phrase(phrase)),
            Some(other) => Err(GatewayError::MalformedPayload(format!(
                "'{}' is not a string: {}",
                id.report_key(),
                other
            ))),
        }
    };

    Ok(SpotReport {
        spot1: read(SpotId::Spot1)?,
        spot2: read(SpotId::Spot2)?,
    })
}


#[cfg(test)]
mod tests {
    use super::fake::{unreachable_client, FakeDevice};
    use super::*;
    use serde_json::json;

    #[test]
    fn test_client_creation_trims_slash() {
        let client = DeviceClient::new("http://192.168.3.138/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://192.168.3.138");
    }

    #[test]
    fn test_parse_report() {
        let report = parse_report(&json!({
            "estado vaga 1": "vaga 1 ocupada",
            "estado vaga 2": "vaga 2 livre",
        }))
        .unwrap();

        assert_eq!(report.spot1, Some(Occupancy::Occupied));
        assert_eq!(report.spot2, Some(Occupancy::Free));
    }

    #[test]
    fn test_parse_report_missing_key_reads_free() {
        let report = parse_report(&json!({ "estado vaga 1": "vaga 1 ocupada" })).unwrap();
        assert_eq!(report.spot2, Some(Occupancy::Free));
    }

    #[test]
    fn test_parse_report_unrecognized_phrase() {
        let report = parse_report(&json!({ "estado vaga 1": "sensor error" })).unwrap();
        assert_eq!(report.spot1, None);
    }

    #[test]
    fn test_parse_report_rejects_non_object() {
        assert!(matches!(
            parse_report(&json!(["vaga 1 livre"])),
            Err(GatewayError::MalformedPayload(_))
        ));
        assert!(matches!(
            parse_report(&json!({ "estado vaga 1": 1 })),
            Err(GatewayError::MalformedPayload(_))
        ));
    }

    #[tokio::test]
    async fn test_poll_spots() {
        let device = FakeDevice::start().await;
        device.set_report(json!({
            "estado vaga 1": "vaga 1 livre",
            "estado vaga 2": "vaga 2 ocupada",
        }));

        let report = device.client().poll_spots().await.unwrap();
        assert_eq!(report.spot1, Some(Occupancy::Free));
        assert_eq!(report.spot2, Some(Occupancy::Occupied));
    }

    #[tokio::test]
    async fn test_commands_hit_fixed_paths() {
        let device = FakeDevice::start().await;
        let client = device.client();

        client.send_reserve(SpotId::Spot1).await.unwrap();
        client.send_reserve(SpotId::Spot2).await.unwrap();
        client.send_release(SpotId::Spot1).await.unwrap();
        client.send_release(SpotId::Spot2).await.unwrap();
        client.open_turnstile().await.unwrap();

        assert_eq!(
            device.calls(),
            vec![
                "/reservar_vaga1",
                "/reservar_vaga2",
                "/liberar_vaga1",
                "/liberar_vaga2",
                "/abrir_catraca",
            ]
        );
    }

    #[tokio::test]
    async fn test_non_200_is_status_error() {
        let device = FakeDevice::start().await;
        device.set_command_status(202);

        let result = device.client().open_turnstile().await;
        assert!(matches!(result, Err(GatewayError::Status(202))));
    }

    #[tokio::test]
    async fn test_poll_non_200_is_status_error() {
        let device = FakeDevice::start().await;
        device.set_report_status(500);

        let result = device.client().poll_spots().await;
        assert!(matches!(result, Err(GatewayError::Status(500))));
    }

    #[tokio::test]
    async fn test_poll_garbage_body_is_malformed() {
        let device = FakeDevice::start().await;
        device.set_raw_report(Some("vaga 1 livre, vaga 2 ocupada"));

        let result = device.client().poll_spots().await;
        assert!(matches!(result, Err(GatewayError::MalformedPayload(_))));
    }

    #[tokio::test]
    async fn test_unreachable_device() {
        let client = unreachable_client().await;

        assert!(matches!(
            client.poll_spots().await,
            Err(GatewayError::Unreachable(_))
        ));
        assert!(matches!(
            client.send_reserve(SpotId::Spot1).await,
            Err(GatewayError::Unreachable(_))
        ));
    }
}
