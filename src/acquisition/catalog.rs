//! Search and download client for the external product catalog.

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::error::{ProcessingError, Result};
use crate::models::{BoundingBox, Coordinate};
use crate::utils::constants::{CATALOG_RESULT_LIMIT, SEARCH_DAY_MARGIN, SEARCH_HALF_WIDTH_DEG};

#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub dataset_id: String,
    pub bbox: BoundingBox,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl SearchQuery {
    /// ±0.5° around the point, from the start of the previous day to the end of
    /// the next, so a pass just outside the target date still matches.
    pub fn around(dataset_id: &str, coordinate: &Coordinate, date: NaiveDate) -> Self {
        let start_day = date - Duration::days(SEARCH_DAY_MARGIN);
        let end_day = date + Duration::days(SEARCH_DAY_MARGIN);
        let end_of_day = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);

        Self {
            dataset_id: dataset_id.to_string(),
            bbox: coordinate.bounding_box(SEARCH_HALF_WIDTH_DEG),
            start: start_day.and_time(NaiveTime::MIN),
            end: end_day.and_time(end_of_day),
        }
    }
}

/// A granule returned by a catalog search.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogProduct {
    pub id: String,
    pub download_url: String,
}

impl CatalogProduct {
    /// Local file name: last URL path segment, or the product id.
    pub fn file_name(&self) -> String {
        self.download_url
            .split('?')
            .next()
            .and_then(|path| path.rsplit('/').next())
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("{}.h5", self.id))
    }
}

#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Products matching `query`, in the order the service returned them.
    async fn search(&self, query: &SearchQuery) -> Result<Vec<CatalogProduct>>;

    /// Download `product` to `dest`, returning the number of bytes written.
    async fn download(&self, product: &CatalogProduct, dest: &Path) -> Result<u64>;
}

/// JAXA G-Portal CSW endpoint with JSON output.
pub struct GPortalCatalog {
    client: Client,
    search_url: String,
    username: String,
    password: String,
}

impl GPortalCatalog {
    pub fn new(search_url: &str, username: &str, password: &str) -> Self {
        Self {
            client: Client::new(),
            search_url: search_url.to_string(),
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    /// None when credentials are missing.
    pub fn from_config(config: &AppConfig) -> Option<Self> {
        let (username, password) = config.catalog_credentials()?;
        Some(Self::new(&config.gportal_search_url, username, password))
    }

    fn search_params(query: &SearchQuery) -> Vec<(&'static str, String)> {
        vec![
            ("service", "CSW".to_string()),
            ("version", "3.0.0".to_string()),
            ("request", "GetRecords".to_string()),
            ("outputFormat", "application/json".to_string()),
            ("datasetId", query.dataset_id.clone()),
            ("bbox", query.bbox.to_query_param()),
            ("startTime", query.start.format("%Y-%m-%dT%H:%M:%S").to_string()),
            ("endTime", query.end.format("%Y-%m-%dT%H:%M:%S").to_string()),
            ("count", CATALOG_RESULT_LIMIT.to_string()),
        ]
    }
}

#[async_trait]
impl ProductCatalog for GPortalCatalog {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<CatalogProduct>> {
        debug!("catalog search {:?}", query);

        let response = self
            .client
            .get(&self.search_url)
            .query(&Self::search_params(query))
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => parse_search_response(&response.text().await?),
            other => Err(ProcessingError::Catalog(format!(
                "search returned status {}",
                other
            ))),
        }
    }

    async fn download(&self, product: &CatalogProduct, dest: &Path) -> Result<u64> {
        info!("downloading {}", product.id);

        let mut response = self
            .client
            .get(&product.download_url)
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(ProcessingError::Catalog(format!(
                "download of {} returned status {}",
                product.id,
                response.status()
            )));
        }

        // partial downloads stay invisible until persisted
        let dir = dest.parent().unwrap_or_else(|| Path::new("."));
        let mut file = tempfile::NamedTempFile::new_in(dir)?;
        let mut len: u64 = 0;
        while let Some(chunk) = response.chunk().await? {
            len += chunk.len() as u64;
            file.write_all(&chunk)?;
        }
        file.flush()?;

        if len == 0 {
            return Err(ProcessingError::Catalog(format!(
                "download of {} was empty",
                product.id
            )));
        }

        file.persist_noclobber(dest).map_err(|e| ProcessingError::Io(e.error))?;
        info!("{} kB saved to {}", len / 1024, dest.display());
        Ok(len)
    }
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    id: Option<String>,
    #[serde(default)]
    properties: FeatureProperties,
}

#[derive(Debug, Default, Deserialize)]
struct FeatureProperties {
    identifier: Option<String>,
    product: Option<ProductInfo>,
}

#[derive(Debug, Deserialize)]
struct ProductInfo {
    #[serde(rename = "fileName")]
    file_name: Option<String>,
}

/// Features without a download URL are skipped; order is preserved.
pub fn parse_search_response(body: &str) -> Result<Vec<CatalogProduct>> {
    let collection: FeatureCollection = serde_json::from_str(body)?;

    Ok(collection
        .features
        .into_iter()
        .filter_map(|feature| {
            let download_url = feature.properties.product?.file_name?;
            let id = feature
                .properties
                .identifier
                .or(feature.id)
                .unwrap_or_else(|| download_url.clone());
            Some(CatalogProduct { id, download_url })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_query_window() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 8).unwrap();
        let query = SearchQuery::around("10002010", &Coordinate::new(32.8, 130.7), date);

        assert_eq!(query.start.to_string(), "2026-01-07 00:00:00");
        assert_eq!(query.end.to_string(), "2026-01-09 23:59:59");
        assert!((query.bbox.min_lat - 32.3).abs() < 1e-9);
        assert!((query.bbox.max_lon - 131.2).abs() < 1e-9);
    }

    #[test]
    fn test_query_window_crosses_year() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let query = SearchQuery::around("id", &Coordinate::new(0.0, 0.0), date);
        assert_eq!(query.start.date(), NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());
    }

    #[test]
    fn test_search_params() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 8).unwrap();
        let query = SearchQuery::around("lst-id", &Coordinate::new(32.0, 130.0), date);
        let params = GPortalCatalog::search_params(&query);

        assert!(params.contains(&("datasetId", "lst-id".to_string())));
        assert!(params.contains(&("bbox", "129.5,31.5,130.5,32.5".to_string())));
        assert!(params.contains(&("startTime", "2026-01-07T00:00:00".to_string())));
        assert!(params.contains(&("endTime", "2026-01-09T23:59:59".to_string())));
    }

    #[test]
    fn test_parse_search_response_keeps_service_order() -> Result<()> {
        let body = r#"{
            "type": "FeatureCollection",
            "features": [
                {"id": "a", "properties": {"identifier": "GC1SG1_20260108D01D_T0527_L2SG_LST_Q_3000",
                 "product": {"fileName": "https://gportal.jaxa.jp/download/L2/GC1SG1_20260108D01D_T0527_L2SG_LST_Q_3000.h5"}}},
                {"id": "b", "properties": {"identifier": "no-file"}},
                {"id": "c", "properties": {"product": {"fileName": "https://example.org/files/second.h5?token=1"}}}
            ]
        }"#;

        let products = parse_search_response(body)?;

        assert_eq!(products.len(), 2);
        assert_eq!(products[0].id, "GC1SG1_20260108D01D_T0527_L2SG_LST_Q_3000");
        assert_eq!(
            products[0].file_name(),
            "GC1SG1_20260108D01D_T0527_L2SG_LST_Q_3000.h5"
        );
        assert_eq!(products[1].id, "c");
        assert_eq!(products[1].file_name(), "second.h5");
        Ok(())
    }

    #[test]
    fn test_parse_empty_response() -> Result<()> {
        assert!(parse_search_response(r#"{"features": []}"#)?.is_empty());
        assert!(parse_search_response(r#"{}"#)?.is_empty());
        assert!(parse_search_response("not json").is_err());
        Ok(())
    }

    #[test]
    fn test_file_name_falls_back_to_id() {
        let product = CatalogProduct {
            id: "granule".to_string(),
            download_url: "https://example.org/download/".to_string(),
        };
        assert_eq!(product.file_name(), "granule.h5");
    }
}
