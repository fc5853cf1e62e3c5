//! Caption requester: turns a decoded image into raw candidate captions.
//!
//! Each call draws its own seed and sends it with the request, so concurrent
//! callers sharing one model never disturb each other's randomness.

use std::sync::Arc;

use image::RgbImage;
use rand::Rng;

use super::clean::clean_caption;
use super::model::{CaptionModel, CaptionRequest, ImageInput, SamplingConfig};
use crate::error::{PipelineError, PipelineResult};

/// Seeds are drawn from `0..SEED_RANGE`.
pub const SEED_RANGE: u64 = 100_000;

/// An unstyled caption as returned by the model, after token cleanup.
pub type RawCaption = String;

/// Builds generation requests and invokes the caption model.
#[derive(Clone)]
pub struct CaptionRequester {
    model: Arc<dyn CaptionModel>,
    prompt: String,
    sampling: SamplingConfig,
}

impl CaptionRequester {
    /// Requester with the fixed production sampling settings.
    pub fn new(model: Arc<dyn CaptionModel>, prompt: impl Into<String>) -> Self {
        Self {
            model,
            prompt: prompt.into(),
            sampling: SamplingConfig::default(),
        }
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    pub fn sampling(&self) -> &SamplingConfig {
        &self.sampling
    }

    /// Draw a fresh generation seed.
    pub fn draw_seed<R: Rng + ?Sized>(rng: &mut R) -> u64 {
        rng.gen_range(0..SEED_RANGE)
    }

    /// Request captions with a freshly drawn seed.
    pub async fn request(&self, image: &RgbImage) -> PipelineResult<Vec<RawCaption>> {
        let seed = Self::draw_seed(&mut rand::thread_rng());
        self.request_with_seed(image, seed).await
    }

    /// Request captions with an explicit seed.
    ///
    /// Fails unless the model returns exactly `num_return_sequences`
    /// non-empty captions; there is no retry.
    pub async fn request_with_seed(
        &self,
        image: &RgbImage,
        seed: u64,
    ) -> PipelineResult<Vec<RawCaption>> {
        let request = CaptionRequest {
            image: ImageInput::from_rgb(image)?,
            prompt: self.prompt.clone(),
            sampling: self.sampling.clone(),
            seed,
        };

        tracing::debug!(
            model = self.model.name(),
            seed,
            width = image.width(),
            height = image.height(),
            "Requesting captions"
        );

        let raw = self.model.generate(&request).await?;

        let expected = self.sampling.num_return_sequences;
        if raw.len() != expected {
            return Err(PipelineError::generation(format!(
                "{} returned {} captions, expected {expected}",
                self.model.name(),
                raw.len()
            )));
        }

        let captions: Vec<RawCaption> = raw.iter().map(|r| clean_caption(r)).collect();
        if captions.iter().any(|c| c.is_empty()) {
            return Err(PipelineError::generation(format!(
                "{} returned an empty caption",
                self.model.name()
            )));
        }

        Ok(captions)
    }
}
