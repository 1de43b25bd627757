use crate::traits::SearchApi;
use crate::{Query, ResultPage, SearchError, SearchResponse};
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

pub const SEARCH_PATH: &str = "/api/search";

/// `SearchApi` backed by the site's JSON endpoint.
pub struct HttpSearchApi {
    client: Arc<Client>,
    endpoint: Url,
}

impl HttpSearchApi {
    pub fn new(base_url: &str) -> Result<Self, SearchError> {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Result<Self, SearchError> {
        let endpoint = Url::parse(base_url)?.join(SEARCH_PATH)?;
        Ok(Self {
            client: Arc::new(client),
            endpoint,
        })
    }

    pub fn search_url(&self, query: &Query, page: Option<u32>) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("q", query.as_str());
            if let Some(page) = page {
                pairs.append_pair("page", &page.to_string());
            }
        }
        url
    }
}

#[async_trait]
impl SearchApi for HttpSearchApi {
    async fn search(&self, query: &Query, page: Option<u32>) -> Result<ResultPage, SearchError> {
        let url = self.search_url(query, page);
        debug!(%url, "search request");

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            warn!(status = %response.status(), query = %query, "search request failed");
            return Err(SearchError::Status {
                status: response.status().as_u16(),
            });
        }

        let body = response.text().await?;
        let parsed: SearchResponse = serde_json::from_str(&body)?;

        Ok(ResultPage::from_response(parsed, page))
    }
}
