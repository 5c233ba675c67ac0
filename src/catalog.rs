//! Product catalog sources.
//!
//! The joiner only ever sees a plain list of products. Every source swallows
//! its own failures, logs them and hands back an empty list, so a dead
//! catalog degrades enrichment instead of aborting the run.

use crate::error::CatalogError;
use crate::models::{CatalogEntry, CatalogProduct};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_CATALOG_URL: &str = "https://dummyjson.com/products?limit=100";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

// Products stay raw until each one is decoded on its own.
#[derive(Debug, Deserialize)]
struct CatalogResponse {
    #[serde(default)]
    products: Vec<serde_json::Value>,
}

pub trait ProductCatalog {
    fn name(&self) -> &str;

    /// All known products, or an empty list when the source is unavailable.
    fn fetch_all_products(&self) -> Vec<CatalogProduct>;
}

/// Catalog served over HTTP as `{"products": [...]}`.
pub struct HttpCatalog {
    client: reqwest::blocking::Client,
    url: String,
}

impl HttpCatalog {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, CatalogError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| CatalogError::Client(err.to_string()))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    fn try_fetch(&self) -> Result<Vec<CatalogProduct>, CatalogError> {
        let resp = self
            .client
            .get(&self.url)
            .send()
            .map_err(|err| CatalogError::Network(err.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(CatalogError::Status(status.as_u16()));
        }

        let body = resp
            .text()
            .map_err(|err| CatalogError::Network(err.to_string()))?;
        parse_catalog_response(&body)
    }
}

impl ProductCatalog for HttpCatalog {
    fn name(&self) -> &str {
        &self.url
    }

    fn fetch_all_products(&self) -> Vec<CatalogProduct> {
        match self.try_fetch() {
            Ok(products) => {
                log::info!("fetched {} products from {}", products.len(), self.url);
                products
            }
            Err(err) => {
                log::warn!("failed to fetch products from {}: {}", self.url, err);
                Vec::new()
            }
        }
    }
}

/// Catalog payload saved to disk, for runs without network access.
pub struct FileCatalog {
    path: PathBuf,
    label: String,
}

impl FileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let label = path.display().to_string();
        Self { path, label }
    }

    fn try_load(&self) -> Result<Vec<CatalogProduct>, CatalogError> {
        let body = std::fs::read_to_string(&self.path).map_err(|source| CatalogError::File {
            path: self.path.clone(),
            source,
        })?;
        parse_catalog_response(&body)
    }
}

impl ProductCatalog for FileCatalog {
    fn name(&self) -> &str {
        &self.label
    }

    fn fetch_all_products(&self) -> Vec<CatalogProduct> {
        self.try_load().unwrap_or_else(|err| {
            log::warn!("{err}");
            Vec::new()
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    products: Vec<CatalogProduct>,
}

impl StaticCatalog {
    pub fn new(products: Vec<CatalogProduct>) -> Self {
        Self { products }
    }
}

impl ProductCatalog for StaticCatalog {
    fn name(&self) -> &str {
        "static"
    }

    fn fetch_all_products(&self) -> Vec<CatalogProduct> {
        self.products.clone()
    }
}

/// Decodes a `{"products": [...]}` payload. Only an unreadable envelope is an
/// error; a product that does not decode is logged and skipped.
pub fn parse_catalog_response(body: &str) -> Result<Vec<CatalogProduct>, CatalogError> {
    let response: CatalogResponse =
        serde_json::from_str(body).map_err(|err| CatalogError::Format(err.to_string()))?;

    let mut products = Vec::with_capacity(response.products.len());
    for (idx, raw) in response.products.into_iter().enumerate() {
        match serde_json::from_value::<CatalogProduct>(raw) {
            Ok(product) => products.push(product),
            Err(err) => log::warn!("skipping catalog product #{}: {}", idx + 1, err),
        }
    }
    Ok(products)
}

/// Indexes products by id. A repeated id keeps the last record seen.
pub fn create_product_mapping(products: &[CatalogProduct]) -> HashMap<i64, CatalogEntry> {
    products
        .iter()
        .map(|product| {
            (
                product.id,
                CatalogEntry {
                    title: product.title.clone(),
                    category: product.category.clone(),
                    brand: product.brand.clone(),
                    rating: product.rating,
                },
            )
        })
        .collect()
}
