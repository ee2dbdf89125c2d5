//! CORE API Client
//!
//! Issues paginated full-text searches against the CORE v2 articles endpoint.
//!
//! API Details:
//! - Search endpoint: GET /api-v2/articles/search/{query}
//! - `page` is 1-indexed, `pageSize` selects the page length
//! - The API key is passed as the `apiKey` query parameter
//! - Responses carry `totalHits` and a `data` array of article objects

use crate::download::ArticleSource;
use crate::error::{FetchError, OptionExt, Result};
use reqwest::Client;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use tracing::debug;
use url::Url;

/// CORE API search base URL
pub const CORE_API_BASE: &str = "http://core.ac.uk/api-v2/articles/search";

/// Enrichment flags sent with every search: metadata and full text on,
/// everything else off.
const SEARCH_FLAGS: &[(&str, &str)] = &[
    ("metadata", "true"),
    ("fulltext", "true"),
    ("citations", "false"),
    ("similar", "false"),
    ("duplicate", "false"),
    ("urls", "false"),
    ("faithfulMetadata", "false"),
];

/// Field holding the article body
pub const FULL_TEXT_FIELD: &str = "fullText";

/// Field holding the CORE identifier
pub const ID_FIELD: &str = "id";

/// One page of search results
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageResponse {
    /// Total matches reported by CORE at the time of the call
    #[serde(rename = "totalHits")]
    pub total_hits: u64,
    /// Articles on this page, in server order
    #[serde(default, deserialize_with = "null_as_empty")]
    pub data: Vec<Article>,
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<Article>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Article>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Remote identifier assigned by CORE
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArticleId(String);

impl ArticleId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An article record as returned by CORE.
///
/// The record is kept as an ordered JSON object so that every field other
/// than the full text is written back out exactly as received.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Article(Map<String, Value>);

impl Article {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// CORE identifier of this article. Numeric ids are normalized to their
    /// decimal string form.
    pub fn id(&self) -> Result<ArticleId> {
        let value = self.0.get(ID_FIELD).ok_or_parse("Article has no id field")?;
        match value {
            Value::String(s) => Ok(ArticleId(s.clone())),
            Value::Number(n) => Ok(ArticleId(n.to_string())),
            other => Err(FetchError::Parse(format!(
                "Unsupported article id: {}",
                other
            ))),
        }
    }

    /// Remove the full text from the record, keeping the order of the
    /// remaining fields. `None` when the field is absent or `null`.
    pub fn take_full_text(&mut self) -> Result<Option<String>> {
        match self.0.shift_remove(FULL_TEXT_FIELD) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(text)) => Ok(Some(text)),
            Some(other) => Err(FetchError::Parse(format!(
                "fullText is not a string: {}",
                type_name(&other)
            ))),
        }
    }

    /// Remaining fields, in server order
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// CORE search API client
pub struct CoreClient {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl CoreClient {
    /// Create a client against the public CORE endpoint
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let base_url = Url::parse(CORE_API_BASE)
            .map_err(|e| FetchError::Config(format!("Invalid base URL: {}", e)))?;
        Self::with_base_url(api_key, base_url)
    }

    /// Create a client against a custom endpoint (mirror or local stub)
    pub fn with_base_url(api_key: impl Into<String>, base_url: Url) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(FetchError::Config("CORE API key is empty".to_string()));
        }

        let client = Client::builder()
            .user_agent(concat!("corefetch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    /// Build the search URL for one page
    pub fn search_url(&self, query: &str, page: u64, page_size: u32) -> Result<Url> {
        let raw = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            urlencoding::encode(query)
        );
        let mut url =
            Url::parse(&raw).map_err(|e| FetchError::Config(format!("Invalid search URL: {}", e)))?;

        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("page", &page.to_string())
                .append_pair("pageSize", &page_size.to_string());
            for (key, value) in SEARCH_FLAGS {
                pairs.append_pair(key, value);
            }
            pairs.append_pair("apiKey", &self.api_key);
        }

        Ok(url)
    }

    /// Fetch one page of search results.
    ///
    /// One request per call: no retry, no caching.
    pub async fn search(&self, query: &str, page: u64, page_size: u32) -> Result<PageResponse> {
        let url = self.search_url(query, page, page_size)?;
        debug!(query = query, page = page, page_size = page_size, "Fetching CORE page");

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(FetchError::Api {
                code: status.as_u16(),
                message: format!("CORE API error: {} - {}", status, excerpt(&error_text)),
            });
        }

        let body = response.text().await?;
        parse_response(&body)
    }
}

/// Decode a search response body
pub fn parse_response(json_str: &str) -> Result<PageResponse> {
    serde_json::from_str(json_str)
        .map_err(|e| FetchError::Parse(format!("Failed to parse CORE response: {}", e)))
}

fn excerpt(text: &str) -> &str {
    match text.char_indices().nth(200) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// A CORE search bound to one query and page size
pub struct CoreSearch {
    client: CoreClient,
    query: String,
    page_size: u32,
}

impl CoreSearch {
    pub fn new(client: CoreClient, query: impl Into<String>, page_size: u32) -> Self {
        Self {
            client,
            query: query.into(),
            page_size,
        }
    }
}

impl ArticleSource for CoreSearch {
    async fn fetch_page(&self, page: u64) -> Result<PageResponse> {
        self.client.search(&self.query, page, self.page_size).await
    }
}
