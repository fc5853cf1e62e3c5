//! Ollama caption backend for local vision models.
//!
//! Talks to a local Ollama instance via its HTTP API. `/api/generate` returns
//! a single sequence per call, so N candidates cost N calls, each with its
//! own seed derived from the request seed.

use super::model::{CaptionModel, CaptionRequest, SamplingConfig};
use crate::error::PipelineError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Ollama backend for local vision model inference.
pub struct OllamaCaptioner {
    endpoint: String,
    model: String,
    client: reqwest::Client,
}

impl OllamaCaptioner {
    pub fn new(endpoint: &str, model: &str) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.to_string(),
            client: reqwest::Client::new(),
        }
    }
}

/// Ollama /api/generate request body.
#[derive(Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    images: [&'a str; 1],
    stream: bool,
    options: OllamaOptions,
}

#[derive(Serialize, Debug, PartialEq)]
struct OllamaOptions {
    temperature: f32,
    top_k: u32,
    top_p: f32,
    repeat_penalty: f32,
    num_predict: u32,
    seed: u64,
}

impl OllamaOptions {
    fn from_sampling(sampling: &SamplingConfig, seed: u64) -> Self {
        Self {
            temperature: sampling.temperature,
            top_k: sampling.top_k,
            top_p: sampling.top_p,
            repeat_penalty: sampling.repetition_penalty,
            num_predict: sampling.max_length,
            seed,
        }
    }
}

/// Ollama /api/generate response.
#[derive(Deserialize)]
struct OllamaResponse {
    response: String,
}

impl OllamaCaptioner {
    async fn generate_one(&self, request: &CaptionRequest, seed: u64) -> Result<String, PipelineError> {
        let url = format!("{}/api/generate", self.endpoint);

        let body = OllamaRequest {
            model: &self.model,
            prompt: &request.prompt,
            images: [request.image.data.as_str()],
            stream: false,
            options: OllamaOptions::from_sampling(&request.sampling, seed),
        };

        let resp = self
            .client
            .post(&url)
            .json(&body)
            .timeout(self.timeout())
            .send()
            .await
            .map_err(|e| PipelineError::generation(format!("Ollama request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(PipelineError::Generation {
                message: format!("Ollama HTTP {status}: {text}"),
                status_code: Some(status.as_u16()),
            });
        }

        let ollama_resp: OllamaResponse = resp.json().await.map_err(|e| {
            PipelineError::generation(format!("Failed to parse Ollama response: {e}"))
        })?;

        Ok(ollama_resp.response)
    }
}

#[async_trait]
impl CaptionModel for OllamaCaptioner {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn is_available(&self) -> bool {
        let url = format!("{}/api/tags", self.endpoint);
        match self.client.get(&url).timeout(Duration::from_secs(5)).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    async fn generate(&self, request: &CaptionRequest) -> Result<Vec<String>, PipelineError> {
        let start = Instant::now();
        let n = request.sampling.num_return_sequences;
        let mut captions = Vec::with_capacity(n);

        for i in 0..n {
            let seed = request.seed.wrapping_add(i as u64);
            captions.push(self.generate_one(request, seed).await?);
        }

        tracing::debug!(
            model = %self.model,
            sequences = n,
            latency_ms = start.elapsed().as_millis() as u64,
            "Ollama captions generated"
        );
        Ok(captions)
    }

    fn timeout(&self) -> Duration {
        // Vision models running locally can be slow
        Duration::from_secs(120)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_trailing_slash_trimmed() {
        let c = OllamaCaptioner::new("http://localhost:11434/", "llava");
        assert_eq!(c.endpoint, "http://localhost:11434");
    }

    #[test]
    fn test_options_from_default_sampling() {
        let opts = OllamaOptions::from_sampling(&SamplingConfig::default(), 99);
        assert_eq!(
            opts,
            OllamaOptions {
                temperature: 1.3,
                top_k: 50,
                top_p: 0.95,
                repeat_penalty: 1.3,
                num_predict: 40,
                seed: 99,
            }
        );
    }

    #[test]
    fn test_options_serialize_every_sampling_field() {
        let opts = OllamaOptions::from_sampling(&SamplingConfig::default(), 7);
        let json = serde_json::to_value(&opts).unwrap();
        assert_eq!(json["top_k"], 50);
        assert_eq!(json["num_predict"], 40);
        assert_eq!(json["seed"], 7);
        assert!(json["top_p"].as_f64().unwrap() > 0.9);
    }
}
