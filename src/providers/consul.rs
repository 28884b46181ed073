//! Consul catalog provider
//!
//! Searches service names and tags across every datacenter the catalog
//! reports. Datacenters are visited one after another and any failure
//! aborts the whole search.

use super::error::ProviderError;
use super::registry::ProviderRegistry;
use super::traits::{Provider, ProviderInfo};
use crate::config::ConsulSettings;
use crate::network::HttpClient;
use crate::results::{Result, Results};
use crate::search::{Cancellation, SearchRequest};
use crate::RESULTS_PER_PAGE;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

/// Service name to tags, as returned for one datacenter
pub type Catalog = BTreeMap<String, Vec<String>>;

/// Consul catalog search provider
pub struct ConsulProvider {
    url: String,
    client: HttpClient,
}

impl ConsulProvider {
    pub const NAME: &'static str = "consul";
    pub const TITLE: &'static str = "Consul";

    /// Create a provider for the catalog at `url`.
    ///
    /// A trailing slash is stripped. Empty or relative URLs are rejected.
    pub fn new(url: &str, client: HttpClient) -> std::result::Result<Self, ProviderError> {
        let url = url.trim().trim_end_matches('/');
        if url.is_empty() {
            return Err(ProviderError::Configuration("consul url is not set".to_string()));
        }
        Url::parse(url).map_err(|e| {
            ProviderError::Configuration(format!("invalid consul url {:?}: {}", url, e))
        })?;

        Ok(Self {
            url: url.to_string(),
            client,
        })
    }

    /// Base URL, without a trailing slash
    pub fn url(&self) -> &str {
        &self.url
    }

    /// List the datacenters known to the catalog, in the order reported.
    ///
    /// A `null` body means no datacenters.
    pub async fn datacenters(
        &self,
        cancel: &Cancellation,
    ) -> std::result::Result<Vec<String>, ProviderError> {
        let url = format!("{}/v1/catalog/datacenters", self.url);
        let response = self.client.get(&url, cancel).await?;
        let dcs: Option<Vec<String>> = response.json()?;
        Ok(dcs.unwrap_or_default())
    }

    /// Fetch the service catalog of one datacenter.
    ///
    /// A `null` body is an empty catalog and a `null` tag list an untagged
    /// service.
    pub async fn services(
        &self,
        dc: &str,
        cancel: &Cancellation,
    ) -> std::result::Result<Catalog, ProviderError> {
        let url = format!(
            "{}/v1/catalog/services?dc={}",
            self.url,
            urlencoding::encode(dc)
        );
        let response = self.client.get(&url, cancel).await?;
        let raw: Option<BTreeMap<String, Option<Vec<String>>>> = response.json()?;
        Ok(raw
            .unwrap_or_default()
            .into_iter()
            .map(|(service, tags)| (service, tags.unwrap_or_default()))
            .collect())
    }

    /// Append every entry of `catalog` matching `keyword` to `results`.
    ///
    /// A tagged service yields one result per tag when either the tag or the
    /// service name contains the keyword. An untagged service yields one
    /// result when its name does.
    pub fn collect_matches(
        &self,
        dc: &str,
        catalog: &Catalog,
        keyword: &str,
        results: &mut Results,
    ) {
        for (service, tags) in catalog {
            let link = format!("{}/ui/#/{}/services/{}", self.url, dc, service);

            if tags.is_empty() {
                if service.contains(keyword) {
                    let title = format!("{}.service.{}.consul", service, dc);
                    results.push(Result::new(link, title));
                }
                continue;
            }

            for tag in tags {
                if tag.contains(keyword) || service.contains(keyword) {
                    let title = format!("{}.{}.service.{}.consul", tag, service, dc);
                    results.push(Result::new(link.clone(), title));
                }
            }
        }
    }
}

#[async_trait]
impl Provider for ConsulProvider {
    fn info(&self) -> ProviderInfo {
        ProviderInfo::new(Self::NAME, Self::TITLE)
    }

    async fn search(
        &self,
        request: &SearchRequest,
        cancel: &Cancellation,
    ) -> std::result::Result<Results, ProviderError> {
        let page = request.page();

        let dcs = self
            .datacenters(cancel)
            .await
            .map_err(|e| ProviderError::Datacenters {
                source: Box::new(e),
            })?;
        debug!("Searching {} datacenters for {:?}", dcs.len(), request.keyword);

        let mut results = Results::new();
        for dc in &dcs {
            let catalog = self.services(dc, cancel).await?;
            let before = results.len();
            self.collect_matches(dc, &catalog, &request.keyword, &mut results);
            debug!(
                "Datacenter {} matched {} of {} services",
                dc,
                results.len() - before,
                catalog.len()
            );
        }

        Ok(results.page(page, RESULTS_PER_PAGE))
    }
}

/// Build the Consul provider from settings and add it to `registry`.
///
/// Errors are returned to the caller, which decides whether they are fatal.
pub fn register(
    registry: &mut ProviderRegistry,
    settings: &ConsulSettings,
    client: HttpClient,
) -> std::result::Result<Arc<ConsulProvider>, ProviderError> {
    let provider = Arc::new(ConsulProvider::new(&settings.url, client)?);
    registry.register(provider.clone())?;
    info!("Registered provider {} at {}", ConsulProvider::NAME, provider.url());
    Ok(provider)
}
