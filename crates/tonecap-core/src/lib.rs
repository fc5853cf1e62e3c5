//! Tonecap Core - tone-styled image captions with relevant hashtags.
//!
//! Tonecap asks a vision model for a handful of candidate captions, then
//! rewrites each one in a chosen tone, decorating it with emoji or
//! keyword-matched hashtags.
//!
//! # Architecture
//!
//! ```text
//! Image → Decode (RGB) → Caption model (3 sampled sequences) → Tone stylist → captions
//!                                                               └─ Hashtag matcher
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use tonecap_core::{Config, ModelOverrides, Tonecap, ToneMode};
//!
//! #[tokio::main]
//! async fn main() -> tonecap_core::Result<()> {
//!     let config = Config::load()?;
//!     let tonecap = Tonecap::connect(config, &ModelOverrides::default()).await?;
//!
//!     let captions = tonecap
//!         .pipeline()
//!         .caption_file("./beach.jpg".as_ref(), Some(ToneMode::Friendly))
//!         .await?;
//!     for caption in captions {
//!         println!("{caption}");
//!     }
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod caption;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod style;
pub mod types;

use std::sync::Arc;

// Re-exports for convenient access
pub use caption::{CaptionModel, CaptionModelFactory, CaptionRequester, SamplingConfig};
pub use config::Config;
pub use error::{ConfigError, PipelineError, PipelineResult, Result, TonecapError};
pub use pipeline::{CaptionPipeline, ImageDecoder};
pub use style::{HashtagMatcher, ToneMode, ToneStylist};
pub use types::{GenerateOutcome, GenerateResponse, StyledCaption};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// CLI-level overrides for the configured caption backend.
#[derive(Debug, Clone, Default)]
pub struct ModelOverrides {
    /// Backend identifier replacing `model.provider`
    pub provider: Option<String>,
    /// Model name replacing the backend's configured model
    pub model: Option<String>,
}

/// Tonecap - the main entry point for captioning.
pub struct Tonecap {
    config: Config,
    model: Arc<dyn CaptionModel>,
    pipeline: CaptionPipeline,
}

impl Tonecap {
    /// Build an instance around an existing model.
    pub fn new(config: Config, model: Arc<dyn CaptionModel>) -> Self {
        tracing::debug!("Initializing Tonecap v{} with {} model", VERSION, model.name());
        let pipeline = CaptionPipeline::new(model.clone(), &config);
        Self {
            config,
            model,
            pipeline,
        }
    }

    /// Create the configured backend and verify it is reachable.
    ///
    /// Fails with [`PipelineError::ModelUnavailable`] when the backend can't
    /// be built (unknown provider, missing API key) or doesn't respond.
    pub async fn connect(config: Config, overrides: &ModelOverrides) -> Result<Self> {
        let provider = overrides
            .provider
            .as_deref()
            .unwrap_or(&config.model.provider)
            .to_string();

        let model: Arc<dyn CaptionModel> = Arc::from(CaptionModelFactory::create(
            &provider,
            &config.model,
            overrides.model.as_deref(),
        )?);

        if !model.is_available().await {
            return Err(PipelineError::ModelUnavailable(format!(
                "{provider} backend is not reachable"
            ))
            .into());
        }

        tracing::info!("Caption model ready ({provider})");
        Ok(Self::new(config, model))
    }

    /// Get a reference to the current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Re-probe the caption backend.
    pub async fn model_available(&self) -> bool {
        self.model.is_available().await
    }

    /// The shared captioning pipeline.
    pub fn pipeline(&self) -> &CaptionPipeline {
        &self.pipeline
    }

    /// Take the pipeline out, e.g. to share it across server handlers.
    pub fn into_pipeline(self) -> CaptionPipeline {
        self.pipeline
    }
}
