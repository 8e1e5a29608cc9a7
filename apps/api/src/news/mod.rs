//! Tech news proxy: fetches headlines from newsdata.io and reshapes them for the UI.

pub mod handlers;

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

const NEWS_API_URL: &str = "https://newsdata.io/api/1/news";
const NEWS_QUERY: &str = r#"software OR technology OR "tech jobs" OR "artificial intelligence""#;
const NEWS_LANGUAGE: &str = "en";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

const DEFAULT_TITLE: &str = "No Title";
const DEFAULT_DESCRIPTION: &str = "Click to explore this tech update for insights.";
const DEFAULT_URL: &str = "#";
const DEFAULT_SOURCE: &str = "Tech News";

#[derive(Debug, Error)]
pub enum NewsError {
    #[error("news API key is not configured")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("news provider error: {0}")]
    Provider(String),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One result as returned by newsdata.io. Every field may be missing or null.
#[derive(Debug, Default, Deserialize)]
struct ProviderArticle {
    title: Option<String>,
    description: Option<String>,
    link: Option<String>,
    image_url: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    source_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewsSource {
    pub name: String,
}

/// Article shape the UI renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewsArticle {
    pub title: String,
    pub description: String,
    pub url: String,
    pub image: Option<String>,
    #[serde(rename = "publishedAt")]
    pub published_at: Option<String>,
    pub source: NewsSource,
}

impl From<ProviderArticle> for NewsArticle {
    fn from(raw: ProviderArticle) -> Self {
        NewsArticle {
            title: non_empty(raw.title).unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            description: non_empty(raw.description)
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            url: non_empty(raw.link).unwrap_or_else(|| DEFAULT_URL.to_string()),
            image: raw.image_url,
            published_at: raw.pub_date,
            source: NewsSource {
                name: non_empty(raw.source_id).unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
            },
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[derive(Clone)]
pub struct NewsClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl NewsClient {
    pub fn new(api_key: Option<String>) -> Result<Self, NewsError> {
        Ok(Self {
            client: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
            api_key,
            base_url: NEWS_API_URL.to_string(),
        })
    }

    /// Fetches the latest English tech headlines.
    pub async fn fetch_tech_news(&self) -> Result<Vec<NewsArticle>, NewsError> {
        let api_key = self.api_key.as_deref().ok_or(NewsError::MissingApiKey)?;

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("apikey", api_key),
                ("q", NEWS_QUERY),
                ("language", NEWS_LANGUAGE),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let payload: Value = match serde_json::from_str(&body) {
            Ok(v) => v,
            Err(_) if !status.is_success() => {
                return Err(NewsError::Provider(format!(
                    "provider returned status {status}"
                )))
            }
            Err(e) => return Err(NewsError::Parse(e)),
        };

        let articles = articles_from_payload(payload)?;
        tracing::debug!(count = articles.len(), "Fetched news articles");
        Ok(articles)
    }
}

/// Maps a newsdata.io payload to UI articles, surfacing provider-side errors.
fn articles_from_payload(payload: Value) -> Result<Vec<NewsArticle>, NewsError> {
    if payload.get("status").and_then(Value::as_str) == Some("error") {
        let message = payload
            .pointer("/results/message")
            .or_else(|| payload.get("message"))
            .and_then(Value::as_str)
            .unwrap_or("Unknown API error");
        return Err(NewsError::Provider(message.to_string()));
    }

    let results = match payload.get("results") {
        Some(Value::Array(items)) => items.clone(),
        _ => Vec::new(),
    };

    results
        .into_iter()
        .map(|item| {
            serde_json::from_value::<ProviderArticle>(item)
                .map(NewsArticle::from)
                .map_err(NewsError::Parse)
        })
        .collect()
}
