// piiguard-core/src/recognizers/http_model.rs
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use super::{EntityModel, ModelEntity, ModelError};
use crate::config::ModelConfig;

/// An entity model served over HTTP.
///
/// Sends `POST <endpoint>` with `{"text": .., "language": ..}` and expects a JSON
/// array of `{"label", "start", "end", "score"}` objects. Timeouts are applied by
/// the analyzer, not here, so one budget covers the whole call.
pub struct HttpEntityModel {
    client: Client,
    name: String,
    endpoint: String,
    api_key: Option<String>,
}

#[derive(Serialize)]
struct InferRequest<'a> {
    text: &'a str,
    language: &'a str,
}

impl HttpEntityModel {
    pub fn new(name: &str, endpoint: &str) -> Self {
        Self {
            client: Client::new(),
            name: name.to_string(),
            endpoint: endpoint.to_string(),
            api_key: None,
        }
    }

    pub fn from_config(name: &str, config: &ModelConfig) -> Self {
        let mut model = Self::new(name, &config.endpoint);
        model.api_key = config.api_key.clone();
        model
    }

    pub fn with_api_key(mut self, api_key: &str) -> Self {
        self.api_key = Some(api_key.to_string());
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl EntityModel for HttpEntityModel {
    fn name(&self) -> &str {
        &self.name
    }

    async fn infer(&self, text: &str, language: &str) -> Result<Vec<ModelEntity>, ModelError> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .header("User-Agent", "piiguard-model-client")
            .json(&InferRequest { text, language });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let resp = request
            .send()
            .await
            .map_err(|e| ModelError::Unavailable(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ModelError::Unavailable(format!("model server answered {}", status)));
        }

        resp.json::<Vec<ModelEntity>>()
            .await
            .map_err(|e| ModelError::InvalidResponse(e.to_string()))
    }
}
