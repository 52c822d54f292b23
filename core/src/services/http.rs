// rocketcart/src/services/http.rs

//! `HttpApi`: stock oracle and catalog lookup backed by a JSON HTTP API
//! (`GET {base}/stock/{id}` and `GET {base}/products/{id}`).

use crate::config::CartConfig;
use crate::core::entry::{CatalogProduct, ProductId};
use crate::error::{CartError, CartResult};
use crate::services::{CatalogLookup, Stock, StockOracle};
use anyhow::Context as AnyhowContext;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument};

#[derive(Debug, Clone)]
pub struct HttpApi {
  client: reqwest::Client,
  base_url: String,
}

impl HttpApi {
  pub fn new(base_url: impl Into<String>, timeout: Duration) -> CartResult<Self> {
    let client = reqwest::Client::builder()
      .timeout(timeout)
      .build()
      .map_err(|e| CartError::Config(format!("Failed to build HTTP client: {}", e)))?;
    Ok(Self {
      client,
      base_url: base_url.into().trim_end_matches('/').to_string(),
    })
  }

  pub fn from_config(config: &CartConfig) -> CartResult<Self> {
    Self::new(config.api_base_url.clone(), config.request_timeout)
  }

  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  pub(crate) fn url(&self, resource: &str, product_id: ProductId) -> String {
    format!("{}/{}/{}", self.base_url, resource, product_id)
  }

  async fn get_json<T: DeserializeOwned>(&self, url: String) -> anyhow::Result<T> {
    debug!(%url, "GET");
    let response = self
      .client
      .get(&url)
      .send()
      .await
      .with_context(|| format!("request to {} failed", url))?
      .error_for_status()
      .with_context(|| format!("{} returned an error status", url))?;
    response
      .json::<T>()
      .await
      .with_context(|| format!("undecodable response body from {}", url))
  }
}

#[async_trait]
impl StockOracle for HttpApi {
  #[instrument(name = "HttpApi::stock", skip(self), err(Display))]
  async fn stock(&self, product_id: ProductId) -> anyhow::Result<Stock> {
    self.get_json(self.url("stock", product_id)).await
  }
}

#[async_trait]
impl CatalogLookup for HttpApi {
  #[instrument(name = "HttpApi::product", skip(self), err(Display))]
  async fn product(&self, product_id: ProductId) -> anyhow::Result<CatalogProduct> {
    self.get_json(self.url("products", product_id)).await
  }
}
