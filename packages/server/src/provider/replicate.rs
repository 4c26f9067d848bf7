use async_trait::async_trait;
use serde_json::json;

use crate::config::ProviderConfig;

use super::{GenerationProvider, Prediction, ProviderError};

/// HTTP client for the Replicate predictions API.
pub struct ReplicateClient {
    client: reqwest::Client,
    base_url: String,
    api_token: String,
    version: String,
}

impl ReplicateClient {
    pub fn new(config: &ProviderConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            api_token: config.api_token.clone(),
            version: config.version.clone(),
        }
    }

    async fn parse_response(response: reqwest::Response) -> Result<Prediction, ProviderError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json::<Prediction>().await?)
    }
}

#[async_trait]
impl GenerationProvider for ReplicateClient {
    async fn create_prediction(&self, prompt: &str) -> Result<Prediction, ProviderError> {
        let response = self
            .client
            .post(format!("{}/v1/predictions", self.base_url))
            .header("Authorization", format!("Token {}", self.api_token))
            .json(&json!({
                "version": self.version,
                "input": {
                    "prompt": prompt,
                    "num_outputs": 1,
                    "apply_watermark": false,
                },
            }))
            .send()
            .await?;

        Self::parse_response(response).await
    }

    async fn get_prediction(&self, id: &str) -> Result<Prediction, ProviderError> {
        let response = self
            .client
            .get(format!("{}/v1/predictions/{}", self.base_url, id))
            .header("Authorization", format!("Token {}", self.api_token))
            .send()
            .await?;

        Self::parse_response(response).await
    }
}
