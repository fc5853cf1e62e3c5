//! OpenAI-compatible caption backend using the Chat Completions API.
//!
//! Sends the image via data URL in the user message content array and asks
//! for `n` choices in one call. Top-k and repetition penalty have no
//! Chat Completions equivalent and are not sent.

use super::model::{CaptionModel, CaptionRequest};
use crate::error::PipelineError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// OpenAI-compatible backend.
pub struct OpenAiCaptioner {
    api_key: String,
    model: String,
    client: reqwest::Client,
    endpoint: String,
}

impl OpenAiCaptioner {
    pub fn new(endpoint: &str, api_key: &str, model: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
            client: reqwest::Client::new(),
            endpoint: endpoint.to_string(),
        }
    }
}

// --- Request types ---

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
    n: usize,
    seed: u64,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: Vec<ChatContent>,
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum ChatContent {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

// --- Response types ---

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl ChatRequest {
    fn build(model: &str, request: &CaptionRequest) -> Self {
        let sampling = &request.sampling;
        Self {
            model: model.to_string(),
            max_tokens: sampling.max_length,
            temperature: sampling.temperature,
            top_p: sampling.top_p,
            n: sampling.num_return_sequences,
            seed: request.seed,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: vec![
                    ChatContent::ImageUrl {
                        image_url: ImageUrl {
                            url: request.image.data_url(),
                        },
                    },
                    ChatContent::Text {
                        text: request.prompt.clone(),
                    },
                ],
            }],
        }
    }
}

#[async_trait]
impl CaptionModel for OpenAiCaptioner {
    fn name(&self) -> &str {
        "openai"
    }

    async fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn generate(&self, request: &CaptionRequest) -> Result<Vec<String>, PipelineError> {
        let start = Instant::now();
        let body = ChatRequest::build(&self.model, request);

        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .timeout(self.timeout())
            .send()
            .await
            .map_err(|e| PipelineError::generation(format!("OpenAI request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(PipelineError::Generation {
                message: format!("OpenAI HTTP {status}: {text}"),
                status_code: Some(status.as_u16()),
            });
        }

        let chat_resp: ChatResponse = resp.json().await.map_err(|e| {
            PipelineError::generation(format!("Failed to parse OpenAI response: {e}"))
        })?;

        let captions = chat_resp
            .choices
            .into_iter()
            .map(|c| {
                c.message.content.ok_or_else(|| {
                    PipelineError::generation("OpenAI returned a choice without content")
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(
            model = %self.model,
            sequences = captions.len(),
            latency_ms = start.elapsed().as_millis() as u64,
            "OpenAI captions generated"
        );
        Ok(captions)
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caption::model::{ImageInput, SamplingConfig};
    use image::RgbImage;

    fn request() -> CaptionRequest {
        let pixel = RgbImage::from_pixel(2, 2, image::Rgb([0, 0, 0]));
        CaptionRequest {
            image: ImageInput::from_rgb(&pixel).unwrap(),
            prompt: "Caption this.".to_string(),
            sampling: SamplingConfig::default(),
            seed: 4242,
        }
    }

    #[test]
    fn test_chat_request_carries_sampling() {
        let body = serde_json::to_value(ChatRequest::build("gpt-4o-mini", &request())).unwrap();
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["n"], 3);
        assert_eq!(body["max_tokens"], 40);
        assert_eq!(body["seed"], 4242);
        assert!(body.get("top_k").is_none());
        assert!(body.get("repetition_penalty").is_none());
        assert!(body["top_p"].as_f64().unwrap() > 0.9);

        let content = &body["messages"][0]["content"];
        assert_eq!(content[0]["type"], "image_url");
        assert!(content[0]["image_url"]["url"]
            .as_str()
            .unwrap()
            .starts_with("data:image/png;base64,"));
        assert_eq!(content[1]["text"], "Caption this.");
    }

    #[test]
    fn test_chat_response_parses_choices() {
        let raw = r#"{"choices":[{"message":{"content":"a cat"}},{"message":{"content":null}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.choices.len(), 2);
        assert_eq!(parsed.choices[0].message.content.as_deref(), Some("a cat"));
        assert!(parsed.choices[1].message.content.is_none());
    }
}
