//! Caption model trait and request types.
//!
//! Defines the interface that all caption backends implement, plus the
//! factory that creates the right backend from CLI flags and config.

use crate::config::ModelConfig;
use crate::error::PipelineError;
use async_trait::async_trait;
use base64::Engine;
use image::{ImageFormat, RgbImage};
use std::io::Cursor;
use std::time::Duration;

/// Backend identifiers accepted by [`CaptionModelFactory::create`].
pub const KNOWN_PROVIDERS: &[&str] = &["ollama", "openai"];

/// Base64-encoded image ready to send to a model API.
#[derive(Debug, Clone)]
pub struct ImageInput {
    /// Base64-encoded image bytes
    pub data: String,
    /// MIME type; always `image/png`
    pub media_type: String,
}

impl ImageInput {
    /// Encode a decoded RGB bitmap as a base64 PNG.
    pub fn from_rgb(image: &RgbImage) -> Result<Self, PipelineError> {
        let mut buf = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .map_err(|e| PipelineError::generation(format!("Failed to encode image: {e}")))?;
        Ok(Self {
            data: base64::engine::general_purpose::STANDARD.encode(&buf),
            media_type: "image/png".to_string(),
        })
    }

    /// Return a data URL suitable for OpenAI-style APIs.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.data)
    }
}

/// Sampling parameters for caption generation. Generation always samples.
///
/// The defaults are the fixed production settings; they are not exposed in
/// the config file.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingConfig {
    pub top_k: u32,
    pub top_p: f32,
    pub temperature: f32,
    pub repetition_penalty: f32,
    /// Maximum output length in tokens
    pub max_length: u32,
    pub num_return_sequences: usize,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            top_k: 50,
            top_p: 0.95,
            temperature: 1.3,
            repetition_penalty: 1.3,
            max_length: 40,
            num_return_sequences: 3,
        }
    }
}

/// A request for candidate captions of one image.
#[derive(Debug, Clone)]
pub struct CaptionRequest {
    pub image: ImageInput,
    /// Instruction for prompt-driven vision models
    pub prompt: String,
    pub sampling: SamplingConfig,
    /// Per-call random seed; backends derive any further seeds from it.
    pub seed: u64,
}

/// Trait that all caption backends implement.
///
/// Uses `async_trait` because native async fn in trait is not object-safe
/// (we need `Arc<dyn CaptionModel>` shared across requests).
#[async_trait]
pub trait CaptionModel: Send + Sync {
    /// Backend name for logging (e.g., "ollama").
    fn name(&self) -> &str;

    /// Check whether the backend is configured and reachable.
    async fn is_available(&self) -> bool;

    /// Generate `request.sampling.num_return_sequences` raw caption strings.
    async fn generate(&self, request: &CaptionRequest) -> Result<Vec<String>, PipelineError>;

    /// Per-sequence timeout for this backend.
    fn timeout(&self) -> Duration;
}

/// Resolve `${ENV_VAR}` references in config strings.
pub fn resolve_env_var(value: &str) -> Option<String> {
    if value.starts_with("${") && value.ends_with('}') {
        let var_name = &value[2..value.len() - 1];
        std::env::var(var_name).ok().filter(|v| !v.is_empty())
    } else if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Factory that creates the appropriate backend from CLI flags and config.
pub struct CaptionModelFactory;

impl CaptionModelFactory {
    /// Create a caption backend.
    ///
    /// # Arguments
    /// * `provider` - Backend identifier ("ollama", "openai")
    /// * `config` - The model config section
    /// * `model_override` - Optional model name that overrides the config default
    pub fn create(
        provider: &str,
        config: &ModelConfig,
        model_override: Option<&str>,
    ) -> Result<Box<dyn CaptionModel>, PipelineError> {
        match provider {
            "ollama" => {
                let cfg = config.ollama.clone().unwrap_or_default();
                let model = model_override
                    .map(String::from)
                    .unwrap_or(cfg.model.clone());
                Ok(Box::new(super::ollama::OllamaCaptioner::new(
                    &cfg.endpoint,
                    &model,
                )))
            }
            "openai" => {
                let cfg = config.openai.clone().unwrap_or_default();
                let api_key = resolve_env_var(&cfg.api_key).ok_or_else(|| {
                    PipelineError::ModelUnavailable(
                        "OpenAI API key not set. Set OPENAI_API_KEY env var.".to_string(),
                    )
                })?;
                let model = model_override
                    .map(String::from)
                    .unwrap_or(cfg.model.clone());
                Ok(Box::new(super::openai::OpenAiCaptioner::new(
                    &cfg.endpoint,
                    &api_key,
                    &model,
                )))
            }
            other => Err(PipelineError::ModelUnavailable(format!(
                "Unknown caption provider: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OpenAiConfig;

    #[test]
    fn test_image_input_from_rgb_is_png() {
        let img = RgbImage::from_pixel(4, 4, image::Rgb([10, 200, 30]));
        let input = ImageInput::from_rgb(&img).unwrap();
        assert_eq!(input.media_type, "image/png");

        let bytes = base64::engine::general_purpose::STANDARD
            .decode(&input.data)
            .unwrap();
        assert_eq!(&bytes[..4], &[0x89, b'P', b'N', b'G']);
        assert!(input.data_url().starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_sampling_defaults() {
        let s = SamplingConfig::default();
        assert_eq!(s.top_k, 50);
        assert_eq!(s.top_p, 0.95);
        assert_eq!(s.temperature, 1.3);
        assert_eq!(s.repetition_penalty, 1.3);
        assert_eq!(s.max_length, 40);
        assert_eq!(s.num_return_sequences, 3);
    }

    #[test]
    fn test_resolve_env_var() {
        assert_eq!(resolve_env_var("plain-key"), Some("plain-key".to_string()));
        assert_eq!(resolve_env_var(""), None);
        assert_eq!(resolve_env_var("${DEFINITELY_NOT_SET_TONECAP_123}"), None);
    }

    #[test]
    fn test_factory_creates_ollama() {
        let model = CaptionModelFactory::create("ollama", &ModelConfig::default(), Some("moondream"))
            .unwrap();
        assert_eq!(model.name(), "ollama");
    }

    #[test]
    fn test_factory_openai_with_literal_key() {
        let config = ModelConfig {
            provider: "openai".to_string(),
            openai: Some(OpenAiConfig {
                api_key: "sk-test".to_string(),
                ..OpenAiConfig::default()
            }),
            ..ModelConfig::default()
        };
        let model = CaptionModelFactory::create("openai", &config, None).unwrap();
        assert_eq!(model.name(), "openai");
    }

    #[test]
    fn test_factory_openai_missing_key() {
        let config = ModelConfig {
            openai: Some(OpenAiConfig {
                api_key: "${DEFINITELY_NOT_SET_TONECAP_456}".to_string(),
                ..OpenAiConfig::default()
            }),
            ..ModelConfig::default()
        };
        let err = CaptionModelFactory::create("openai", &config, None)
            .err()
            .unwrap();
        assert!(matches!(err, PipelineError::ModelUnavailable(_)));
    }

    #[test]
    fn test_factory_unknown_provider() {
        let err = CaptionModelFactory::create("blip", &ModelConfig::default(), None)
            .err()
            .unwrap();
        assert!(err.to_string().contains("Unknown caption provider: blip"));
    }
}
