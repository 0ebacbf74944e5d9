use std::time::Duration;

use reqwest::{Client, Method};
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::ThinqConfig;
use crate::error::ThinqError;

// API key published with the vendor's open SDK; fixed per service, not a secret.
const API_KEY: &str = "v6GFvkweNo7DK7yD3ylIZ9w52aKBU0eJ7wLXkSR3";
const SERVICE_PHASE: &str = "OP";

/// Thin wrapper over the ThinQ Connect REST endpoints. One outbound request
/// per call, no retries, no caching; timeouts come from the HTTP client.
#[derive(Clone)]
pub struct ThinqClient {
    http: Client,
    config: ThinqConfig,
}

impl ThinqClient {
    pub fn new(config: ThinqConfig) -> Result<Self, ThinqError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { http, config })
    }

    pub fn country(&self) -> &str {
        &self.config.country
    }

    pub async fn device_list(&self) -> Result<Value, ThinqError> {
        self.request(Method::GET, "devices", None).await
    }

    pub async fn device_profile(&self, device_id: &str) -> Result<Value, ThinqError> {
        self.request(Method::GET, &format!("devices/{device_id}/profile"), None)
            .await
    }

    pub async fn device_status(&self, device_id: &str) -> Result<Value, ThinqError> {
        self.request(Method::GET, &format!("devices/{device_id}/state"), None)
            .await
    }

    /// Forward a control body built by the caller; the vendor's response is
    /// returned verbatim.
    pub async fn control(&self, device_id: &str, body: &Value) -> Result<Value, ThinqError> {
        self.request(
            Method::POST,
            &format!("devices/{device_id}/control"),
            Some(body),
        )
        .await
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, ThinqError> {
        let url = format!("{}/{}", self.config.base_url.trim_end_matches('/'), path);
        let message_id = Uuid::new_v4().simple().to_string();
        debug!(%method, path, message_id, "thinq request");

        let mut req = self
            .http
            .request(method, &url)
            .bearer_auth(&self.config.access_token)
            .header("x-country-code", &self.config.country)
            .header("x-client-id", &self.config.client_id)
            .header("x-message-id", &message_id)
            .header("x-api-key", API_KEY)
            .header("x-service-phase", SERVICE_PHASE);
        if let Some(body) = body {
            req = req.json(body);
        }

        let resp = req.send().await?;
        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            warn!(status = status.as_u16(), path, "thinq api call failed");
            return Err(api_error(status.as_u16(), &text));
        }
        if text.is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
    }
}

/// Decode the vendor error envelope `{"error": {"code", "message"}}`; fall
/// back to the raw body when the shape is different.
fn api_error(status: u16, body: &str) -> ThinqError {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        let err = value.get("error").unwrap_or(&value);
        let code = match err.get("code") {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => status.to_string(),
        };
        let message = err
            .get("message")
            .and_then(Value::as_str)
            .map(String::from)
            .unwrap_or_else(|| body.trim().to_string());
        return ThinqError::Api {
            status,
            code,
            message,
        };
    }
    ThinqError::Api {
        status,
        code: status.to_string(),
        message: body.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vendor_error_envelope_is_decoded() {
        let err = api_error(401, r#"{"error": {"code": "1218", "message": "Not connected device"}}"#);
        match err {
            ThinqError::Api {
                status,
                code,
                message,
            } => {
                assert_eq!(status, 401);
                assert_eq!(code, "1218");
                assert_eq!(message, "Not connected device");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn non_json_error_body_is_surfaced_raw() {
        let err = api_error(502, "upstream unavailable");
        assert!(err.to_string().contains("upstream unavailable"));
        match err {
            ThinqError::Api { code, message, .. } => {
                assert_eq!(code, "502");
                assert_eq!(message, "upstream unavailable");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn unreachable_endpoint_yields_http_error() {
        let mut cfg = ThinqConfig::new("t", "c");
        // Discard port; nothing listens there.
        cfg.base_url = "http://127.0.0.1:9".to_string();
        cfg.timeout_secs = 2;
        let client = ThinqClient::new(cfg).unwrap();
        let err = client.device_list().await.unwrap_err();
        assert!(matches!(err, ThinqError::Http(_)));
    }
}
