use crate::config::CatalogConfig;
use crate::error::CatalogError;
use crate::model::{Category, Cursor, Page, Recipe};
use crate::remote::RemoteCatalogClient;
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// JSON-over-HTTP catalog client
pub struct HttpCatalogClient {
    client: Client,
    base_url: String,
    page_size: u32,
}

impl HttpCatalogClient {
    /// Create a client from configuration
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .user_agent("recipe-catalog/0.1")
            .build()?;

        Ok(HttpCatalogClient {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            page_size: config.page_size,
        })
    }

    #[doc(hidden)]
    pub fn with_base_url(base_url: String, page_size: u32) -> Self {
        HttpCatalogClient {
            client: Client::new(),
            base_url,
            page_size,
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, CatalogError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {} {:?}", url, query);

        let response = self.client.get(&url).query(query).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| CatalogError::Parse(e.to_string()))
    }
}

#[async_trait]
impl RemoteCatalogClient for HttpCatalogClient {
    async fn fetch_by_title(&self, title: &str, category: &str) -> Result<Recipe, CatalogError> {
        self.get_json(
            "/recipes/by-title",
            &[
                ("title", title.to_string()),
                ("category", category.to_string()),
            ],
        )
        .await
    }

    async fn fetch_page(
        &self,
        category: &str,
        query: &str,
        cursor: Cursor,
    ) -> Result<Page<Recipe>, CatalogError> {
        let mut params = vec![
            ("category", category.to_string()),
            ("cursor", cursor.0.to_string()),
            ("limit", self.page_size.to_string()),
        ];
        let query = query.trim();
        if !query.is_empty() {
            params.push(("query", query.to_string()));
        }

        self.get_json("/recipes", &params).await
    }

    async fn fetch_top_recipes(&self) -> Result<Vec<Recipe>, CatalogError> {
        self.get_json("/recipes/top", &[]).await
    }

    async fn fetch_categories(&self) -> Result<Vec<Category>, CatalogError> {
        self.get_json("/categories", &[]).await
    }
}
