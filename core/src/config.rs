// rocketcart/src/config.rs

use crate::error::{CartError, CartResult};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_STORAGE_KEY: &str = "@RocketShoes:cart";
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3333";
pub const DEFAULT_STORAGE_DIR: &str = ".rocketcart";
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartConfig {
  /// Key the cart blob is stored under.
  pub storage_key: String,
  /// Base URL of the stock/catalog API.
  pub api_base_url: String,
  /// Directory used by `FileStorage`.
  pub storage_dir: PathBuf,
  pub request_timeout: Duration,
}

impl Default for CartConfig {
  fn default() -> Self {
    Self {
      storage_key: DEFAULT_STORAGE_KEY.to_string(),
      api_base_url: DEFAULT_API_BASE_URL.to_string(),
      storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
      request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
    }
  }
}

impl CartConfig {
  /// Reads `CART_STORAGE_KEY`, `CART_API_URL`, `CART_STORAGE_DIR` and
  /// `CART_HTTP_TIMEOUT_MS`, loading a `.env` file first if one is present.
  /// Unset variables fall back to the defaults.
  pub fn from_env() -> CartResult<Self> {
    dotenv().ok();

    let defaults = Self::default();
    let get_env = |var_name: &str| env::var(var_name).ok().filter(|v| !v.trim().is_empty());

    let storage_key = get_env("CART_STORAGE_KEY").unwrap_or(defaults.storage_key);
    let api_base_url = get_env("CART_API_URL").unwrap_or(defaults.api_base_url);
    if !(api_base_url.starts_with("http://") || api_base_url.starts_with("https://")) {
      return Err(CartError::Config(format!(
        "Invalid CART_API_URL '{}': expected an http(s) URL",
        api_base_url
      )));
    }
    let storage_dir = get_env("CART_STORAGE_DIR").map(PathBuf::from).unwrap_or(defaults.storage_dir);
    let request_timeout = match get_env("CART_HTTP_TIMEOUT_MS") {
      Some(raw) => {
        let ms = raw
          .trim()
          .parse::<u64>()
          .map_err(|e| CartError::Config(format!("Invalid CART_HTTP_TIMEOUT_MS '{}': {}", raw, e)))?;
        Duration::from_millis(ms)
      }
      None => defaults.request_timeout,
    };

    tracing::debug!(%storage_key, %api_base_url, storage_dir = %storage_dir.display(), "Cart configuration loaded.");

    Ok(Self {
      storage_key,
      api_base_url,
      storage_dir,
      request_timeout,
    })
  }
}
