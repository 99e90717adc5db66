use super::result::ServiceResult;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// JSON body of a registration call. `referralCode` is sent as null when unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequest {
    pub email: String,
    pub password: String,
    pub captcha_token: String,
    pub referral_code: Option<String>,
}

#[async_trait]
pub trait RegistrationApi: Send + Sync {
    /// Register one account, optionally through `proxy`.
    ///
    /// `success` is true only when the body says `"result": "success"`.
    /// The raw body (when there is one) is kept in `data`.
    async fn register(
        &self,
        request: &RegistrationRequest,
        proxy: Option<&str>,
    ) -> ServiceResult<Value>;
}

#[derive(Debug, Clone)]
pub struct HttpRegistrationClient {
    url: String,
    timeout: Duration,
}

impl HttpRegistrationClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        HttpRegistrationClient {
            url: url.into(),
            timeout,
        }
    }

    fn client(&self, proxy: Option<&str>) -> Result<reqwest::Client> {
        let builder = reqwest::Client::builder().timeout(self.timeout);
        let builder = match proxy {
            Some(proxy) => builder.proxy(reqwest::Proxy::all(proxy).context("Invalid proxy URL")?),
            None => builder.no_proxy(),
        };
        builder.build().context("Failed to build HTTP client")
    }
}

/// `"result": "success"` in a 2xx body.
fn is_success_body(body: &Value) -> bool {
    body.get("result").and_then(Value::as_str) == Some("success")
}

#[async_trait]
impl RegistrationApi for HttpRegistrationClient {
    async fn register(
        &self,
        request: &RegistrationRequest,
        proxy: Option<&str>,
    ) -> ServiceResult<Value> {
        let client = match self.client(proxy) {
            Ok(client) => client,
            Err(e) => return ServiceResult::failure(0, format!("{:#}", e)),
        };

        let response = match client.post(&self.url).json(request).send().await {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                return ServiceResult::failure(0, format!("Request timed out: {}", e))
            }
            Err(e) => return ServiceResult::failure(0, format!("Request failed: {}", e)),
        };

        let status = response.status();
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                return ServiceResult::failure(
                    status.as_u16(),
                    format!("Failed to read response body: {}", e),
                )
            }
        };
        let body = serde_json::from_str::<Value>(&text).unwrap_or(Value::String(text));

        if !status.is_success() {
            return ServiceResult::failure(
                status.as_u16(),
                format!("Request failed with status code {}", status.as_u16()),
            )
            .with_data(body);
        }

        if is_success_body(&body) {
            ServiceResult::ok(body).with_status(status.as_u16())
        } else {
            ServiceResult::failure(status.as_u16(), "Registration was not accepted").with_data(body)
        }
    }
}
