//! HTTP client for the hosted model's invoke endpoint.
//!
//! Posts an Anthropic-style messages payload and pulls the generated
//! text out of the first content block.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{LanguageModel, ModelParams};

pub struct ModelApi {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
    params: ModelParams,
}

#[derive(Debug, Serialize)]
struct InvokeBody<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
    messages: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct InvokeResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    text: String,
}

impl ModelApi {
    pub fn new(base_url: &str, token: Option<String>, params: ModelParams) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            params,
        }
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl LanguageModel for ModelApi {
    async fn invoke(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/invoke", self.base_url);
        let body = InvokeBody {
            model: &self.params.model_id,
            max_tokens: self.params.max_tokens,
            temperature: self.params.temperature,
            top_p: 1.0,
            messages: vec![json!({
                "role": "user",
                "content": [{ "type": "text", "text": prompt }],
            })],
        };

        let response = self
            .authorize(self.client.post(&url))
            .json(&body)
            .send()
            .await
            .context("Failed to invoke model")?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(anyhow::anyhow!(
                "Model invocation failed ({}): {}",
                status,
                text
            ));
        }

        let parsed: InvokeResponse =
            serde_json::from_str(&text).context("Failed to parse model response")?;

        let generated = parsed
            .content
            .into_iter()
            .find(|block| block.block_type == "text")
            .map(|block| block.text)
            .ok_or_else(|| anyhow::anyhow!("Model response contained no text block"))?;

        Ok(generated)
    }
}
