use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

/// Resolves the egress IP seen through a proxy. Any error means the proxy is unusable.
#[async_trait]
pub trait ProxyChecker: Send + Sync {
    async fn check_ip(&self, proxy: &str) -> Result<String>;
}

#[derive(Debug, Deserialize)]
struct IpEcho {
    ip: String,
}

/// Asks an IP-echo endpoint (`{"ip": "..."}`) through the proxy.
#[derive(Debug, Clone)]
pub struct HttpProxyChecker {
    url: String,
    timeout: Duration,
}

impl HttpProxyChecker {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        HttpProxyChecker {
            url: url.into(),
            timeout,
        }
    }

    async fn fetch_ip(&self, proxy: &str) -> Result<String> {
        let client = reqwest::Client::builder()
            .proxy(reqwest::Proxy::all(proxy).context("Invalid proxy URL")?)
            .timeout(self.timeout)
            .build()
            .context("Failed to build proxied HTTP client")?;

        let response = client.get(&self.url).send().await?;
        let status = response.status();
        if status != reqwest::StatusCode::OK {
            bail!("Cannot check proxy IP. Status code: {}", status.as_u16());
        }

        let echo: IpEcho = response.json().await.context("Malformed IP echo response")?;
        Ok(echo.ip)
    }
}

#[async_trait]
impl ProxyChecker for HttpProxyChecker {
    async fn check_ip(&self, proxy: &str) -> Result<String> {
        self.fetch_ip(proxy).await.context("Error checking proxy IP")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::get, Json, Router};

    /// Plain-HTTP proxies receive absolute-form requests; axum routes them by path,
    /// so a local router stands in for both the proxy and the echo service.
    async fn spawn_proxy(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_check_ip_through_proxy() {
        let app = Router::new().route(
            "/ip",
            get(|| async { Json(serde_json::json!({"ip": "203.0.113.7"})) }),
        );
        let proxy = spawn_proxy(app).await;

        let checker = HttpProxyChecker::new("http://ipcheck.invalid/ip", Duration::from_secs(5));
        assert_eq!(checker.check_ip(&proxy).await.unwrap(), "203.0.113.7");
    }

    #[tokio::test]
    async fn test_non_200_is_error() {
        let app = Router::new().route("/ip", get(|| async { StatusCode::BAD_GATEWAY }));
        let proxy = spawn_proxy(app).await;

        let checker = HttpProxyChecker::new("http://ipcheck.invalid/ip", Duration::from_secs(5));
        let err = checker.check_ip(&proxy).await.unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("Error checking proxy IP"));
        assert!(message.contains("Status code: 502"));
    }

    #[tokio::test]
    async fn test_invalid_proxy_url_is_error() {
        let checker = HttpProxyChecker::new("http://ipcheck.invalid/ip", Duration::from_secs(1));
        assert!(checker.check_ip("not a url").await.is_err());
    }
}
