use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Sources requested per query; also the number shown per context section.
pub const MAX_SOURCES: usize = 3;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub results: Vec<SearchHit>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchHit {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub raw_content: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    search_depth: &'a str,
    include_answer: bool,
    include_raw_content: bool,
    max_results: usize,
}

#[derive(Debug, Clone)]
pub struct TavilyClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl TavilyClient {
    pub fn new(api_key: &str, base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn search(&self, query: &str) -> Result<SearchResult> {
        let request = SearchRequest {
            query,
            search_depth: "basic",
            include_answer: true,
            include_raw_content: true,
            max_results: MAX_SOURCES,
        };

        let response = self
            .client
            .post(format!("{}/search", self.base_url))
            .header("Authorization", format!("Bearer {}", &self.api_key))
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .context("Failed to send request to Tavily API")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Tavily API error ({}): {}", status, body);
        }

        response
            .json()
            .await
            .context("Failed to parse Tavily API response")
    }
}
