use crate::config::AppConfig;
use crate::error::{GenerationError, SetupError};
use crate::providers::LlmProvider;
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

/// Sampling parameters sent with every completion request
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingParams {
    pub max_tokens: u32,
    pub temperature: f64,
    pub top_p: f64,
    pub top_k: u32,
    pub repetition_penalty: f64,
    pub stop: Vec<String>,
}

impl Default for SamplingParams {
    fn default() -> Self {
        SamplingParams {
            max_tokens: 800,
            temperature: 0.7,
            top_p: 0.9,
            top_k: 50,
            repetition_penalty: 1.1,
            stop: vec!["<|eot_id|>".to_string()],
        }
    }
}

/// Client for the Together AI chat-completion API
pub struct TogetherProvider {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
    sampling: SamplingParams,
}

impl TogetherProvider {
    /// Create a new provider from configuration
    pub fn new(config: &AppConfig) -> Result<Self, SetupError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(TogetherProvider {
            client,
            api_key: config.together_api_key.clone(),
            base_url: config.together_api_url.clone(),
            model: config.together_model.clone(),
            sampling: SamplingParams::default(),
        })
    }

    #[doc(hidden)]
    pub fn with_base_url(api_key: Option<String>, base_url: String, model: String) -> Self {
        TogetherProvider {
            client: Client::new(),
            api_key,
            base_url,
            model,
            sampling: SamplingParams::default(),
        }
    }

    fn request_body(&self, system: &str, prompt: &str) -> Value {
        json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": prompt}
            ],
            "max_tokens": self.sampling.max_tokens,
            "temperature": self.sampling.temperature,
            "top_p": self.sampling.top_p,
            "top_k": self.sampling.top_k,
            "repetition_penalty": self.sampling.repetition_penalty,
            "stop": self.sampling.stop
        })
    }
}

#[async_trait]
impl LlmProvider for TogetherProvider {
    fn provider_name(&self) -> &str {
        "together"
    }

    async fn complete(&self, system: &str, prompt: &str) -> Result<String, GenerationError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| GenerationError::MissingApiKey(self.provider_name().to_string()))?;

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&self.request_body(system, prompt))
            .send()
            .await?
            .error_for_status()?;

        let response_body: Value = response.json().await?;
        debug!("{:?}", response_body);
        let content = response_body["choices"][0]["message"]["content"]
            .as_str()
            .ok_or(GenerationError::MissingContent)?
            .to_string();

        Ok(content)
    }
}
