//! HTTP client for making requests to upstream services

use crate::config::OutgoingSettings;
use crate::providers::{ProviderError, ProviderResponse};
use crate::search::Cancellation;
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::debug;

/// HTTP client wrapper shared by all providers
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> anyhow::Result<Self> {
        Self::with_settings(&OutgoingSettings::default())
    }

    /// Create a new HTTP client with custom settings
    pub fn with_settings(settings: &OutgoingSettings) -> anyhow::Result<Self> {
        let mut builder = Client::builder()
            .timeout(Duration::try_from_secs_f64(settings.request_timeout)?)
            .pool_max_idle_per_host(settings.pool_maxsize)
            .user_agent(format!("ferret-rs/{}", crate::VERSION))
            .gzip(true)
            .brotli(true);

        // SSL verification
        if !settings.verify_ssl {
            builder = builder.danger_accept_invalid_certs(true);
        }

        // Proxy settings
        if let Some(ref proxy_url) = settings.proxies.all {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
        } else {
            if let Some(ref http) = settings.proxies.http {
                builder = builder.proxy(reqwest::Proxy::http(http)?);
            }
            if let Some(ref https) = settings.proxies.https {
                builder = builder.proxy(reqwest::Proxy::https(https)?);
            }
        }

        let client = builder.build()?;

        Ok(Self { client })
    }

    /// GET `url` under `cancel`, reading the whole body before returning.
    ///
    /// Non-2xx statuses come back as `ProviderError::BadResponse`. When the
    /// token fires the in-flight request is dropped along with its body.
    pub async fn get(
        &self,
        url: &str,
        cancel: &Cancellation,
    ) -> Result<ProviderResponse, ProviderError> {
        debug!("GET {}", url);

        cancel
            .run(async {
                let response = self
                    .client
                    .get(url)
                    .header("Accept", "application/json")
                    .send()
                    .await
                    .map_err(fetch_error)?;

                let status = response.status().as_u16();
                if !(200..300).contains(&status) {
                    return Err(ProviderError::BadResponse { status });
                }

                Self::parse_response(response).await
            })
            .await
    }

    /// Read the response into a `ProviderResponse`
    async fn parse_response(response: Response) -> Result<ProviderResponse, ProviderError> {
        let text = response.text().await.map_err(fetch_error)?;
        Ok(ProviderResponse { text })
    }
}

fn fetch_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::DeadlineExceeded
    } else {
        ProviderError::Fetch(err)
    }
}
