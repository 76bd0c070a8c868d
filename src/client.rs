//! HTTP client for the phylo-explorer data service.
//!
//! The service exposes two endpoints under one base URL:
//! - `POST <base>`: a taxon-set query returning a comparison payload (or a
//!   `{"error": ...}` object). Refinement submissions use the same endpoint
//!   with the accumulated filter history.
//! - `GET <base>/all_species_heatmap`: the filterable-taxon catalog as an
//!   array of `"<name> -> [<taxid>]"` strings.

use anyhow::{Context, Result};
use std::time::Duration;

use crate::parser::{self, CatalogEntry, ServiceResponse};

pub struct ExplorerClient {
    base_url: String,
    http: reqwest::blocking::Client,
}

impl ExplorerClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .context("Failed to build HTTP client")?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Run a taxon-set query. Used both for the initial fetch and for
    /// refinement submissions (which pass the full accumulated id history).
    pub fn query(&self, search_taxids: &[u32], reduced_search: bool) -> Result<ServiceResponse> {
        let body = query_body(search_taxids, reduced_search);
        let text = self
            .http
            .post(&self.base_url)
            .header("Accept", "application/json")
            .json(&body)
            .send()
            .with_context(|| format!("POST {}", self.base_url))?
            .text()
            .context("Failed to read query response body")?;
        parser::parse_response(&text)
    }

    /// Submit a refinement: the full accumulated filter ids, with the
    /// complete (non-reduced) result set requested.
    pub fn submit_refinement(&self, search_taxids: &[u32]) -> Result<ServiceResponse> {
        self.query(search_taxids, false)
    }

    /// Fetch the filterable-taxon catalog.
    pub fn fetch_catalog(&self) -> Result<Vec<CatalogEntry>> {
        let url = format!("{}/all_species_heatmap", self.base_url);
        let lines: Vec<String> = self
            .http
            .get(&url)
            .send()
            .with_context(|| format!("GET {}", url))?
            .json()
            .context("Failed to parse catalog response as a JSON string array")?;
        Ok(parser::parse_catalog(&lines))
    }
}

/// Request body for a taxon-set query.
fn query_body(search_taxids: &[u32], reduced_search: bool) -> serde_json::Value {
    serde_json::json!({
        "search_taxids": search_taxids,
        "reduced_search": reduced_search,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_body_shape() {
        let body = query_body(&[9606, 10090], true);
        assert_eq!(body["search_taxids"], serde_json::json!([9606, 10090]));
        assert_eq!(body["reduced_search"], serde_json::json!(true));
    }

    #[test]
    fn test_refinement_requests_the_full_result_set() {
        // A refinement carries the accumulated ids with reduced_search off;
        // a reduced search would reshape the returned panels.
        let body = query_body(&[9606], false);
        assert_eq!(body["reduced_search"], serde_json::json!(false));
    }
}
