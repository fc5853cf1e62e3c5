//! Captioning pipeline: decode → request raw captions → apply tone.

pub mod decode;

pub use decode::{DecodedImage, ImageDecoder};

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::caption::{CaptionModel, CaptionRequester};
use crate::config::Config;
use crate::error::{PipelineError, PipelineResult};
use crate::style::{ToneMode, ToneStylist};
use crate::types::StyledCaption;

/// Ties the decoder, caption requester and tone stylist together.
///
/// Holds no per-request state; one instance is shared by every request.
#[derive(Clone)]
pub struct CaptionPipeline {
    decoder: ImageDecoder,
    requester: CaptionRequester,
    stylist: ToneStylist,
    generate_timeout_ms: u64,
}

impl CaptionPipeline {
    pub fn new(model: Arc<dyn CaptionModel>, config: &Config) -> Self {
        Self {
            decoder: ImageDecoder::new(config.limits.clone()),
            requester: CaptionRequester::new(model, config.model.prompt.clone()),
            stylist: ToneStylist::default(),
            generate_timeout_ms: config.limits.generate_timeout_ms,
        }
    }

    pub fn decoder(&self) -> &ImageDecoder {
        &self.decoder
    }

    pub fn requester(&self) -> &CaptionRequester {
        &self.requester
    }

    /// Caption an uploaded image. `label` names the upload in errors.
    pub async fn caption_bytes(
        &self,
        bytes: Vec<u8>,
        label: &Path,
        tone: Option<ToneMode>,
    ) -> PipelineResult<Vec<StyledCaption>> {
        let decoded = self.decoder.decode_from_bytes(bytes, label).await?;
        self.caption_decoded(&decoded, label, tone).await
    }

    /// Caption an image file on disk.
    pub async fn caption_file(
        &self,
        path: &Path,
        tone: Option<ToneMode>,
    ) -> PipelineResult<Vec<StyledCaption>> {
        let decoded = self.decoder.decode_file(path).await?;
        self.caption_decoded(&decoded, path, tone).await
    }

    /// Request raw captions for an already-decoded image and style each one.
    ///
    /// All-or-nothing: any model failure or timeout returns an error and no
    /// partial captions.
    pub async fn caption_decoded(
        &self,
        decoded: &DecodedImage,
        label: &Path,
        tone: Option<ToneMode>,
    ) -> PipelineResult<Vec<StyledCaption>> {
        let limit = Duration::from_millis(self.generate_timeout_ms);
        let raw = tokio::time::timeout(limit, self.requester.request(&decoded.image))
            .await
            .map_err(|_| PipelineError::Timeout {
                path: label.to_path_buf(),
                stage: "generate".to_string(),
                timeout_ms: self.generate_timeout_ms,
            })??;

        let mut rng = rand::thread_rng();
        let styled: Vec<StyledCaption> = raw
            .iter()
            .map(|caption| self.stylist.style_with_rng(caption, tone, &mut rng))
            .collect();

        tracing::info!(
            model = self.requester.model_name(),
            tone = tone.map(|t| t.as_str()).unwrap_or("none"),
            captions = styled.len(),
            "Captions generated for {:?}",
            label
        );
        Ok(styled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caption::requester::tests::ScriptedModel;
    use crate::caption::CaptionRequest;
    use crate::pipeline::decode::tests::png_bytes;
    use async_trait::async_trait;

    fn pipeline(model: ScriptedModel) -> CaptionPipeline {
        CaptionPipeline::new(Arc::new(model), &Config::default())
    }

    #[tokio::test]
    async fn test_caption_bytes_professional() {
        let p = pipeline(ScriptedModel::new(&[
            "a laptop on a desk",
            "a desk with a laptop.",
            "[CLS] an office desk",
        ]));
        let captions = p
            .caption_bytes(png_bytes(4, 4), Path::new("upload"), Some(ToneMode::Professional))
            .await
            .unwrap();
        assert_eq!(
            captions,
            vec![
                "A laptop on a desk. A clear representation of the subject matter.",
                "A desk with a laptop. A clear representation of the subject matter.",
                "An office desk. A clear representation of the subject matter.",
            ]
        );
    }

    #[tokio::test]
    async fn test_caption_bytes_unknown_tone_is_identity() {
        let p = pipeline(ScriptedModel::new(&["a cat", "a dog.", "a bird"]));
        let captions = p
            .caption_bytes(png_bytes(4, 4), Path::new("upload"), None)
            .await
            .unwrap();
        assert_eq!(captions, vec!["A cat", "A dog", "A bird"]);
    }

    #[tokio::test]
    async fn test_caption_bytes_promotional_has_three_lines() {
        let p = pipeline(ScriptedModel::new(&[
            "a bitcoin chart",
            "a dog on grass",
            "a gym at dawn",
        ]));
        let captions = p
            .caption_bytes(png_bytes(4, 4), Path::new("upload"), Some(ToneMode::Promotional))
            .await
            .unwrap();
        for caption in &captions {
            let lines: Vec<&str> = caption.lines().collect();
            assert_eq!(lines.len(), 3);
            assert_eq!(lines[1], "Join the movement.");
        }
        assert_eq!(captions[1].lines().nth(2), Some("#Trending #ViralPost"));
    }

    #[tokio::test]
    async fn test_decode_failure_skips_model() {
        let model = Arc::new(ScriptedModel::new(&["a", "b", "c"]));
        let p = CaptionPipeline::new(model.clone(), &Config::default());
        let err = p
            .caption_bytes(b"nope".to_vec(), Path::new("upload"), Some(ToneMode::Casual))
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::UnsupportedFormat { .. }));
        assert!(model.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_file_skips_model() {
        let model = Arc::new(ScriptedModel::new(&["a", "b", "c"]));
        let p = CaptionPipeline::new(model.clone(), &Config::default());
        let err = p
            .caption_file(Path::new("/nonexistent/cat.png"), Some(ToneMode::Casual))
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::FileNotFound(_)));
        assert!(model.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_generation_failure_returns_no_captions() {
        let p = pipeline(ScriptedModel::failing());
        let err = p
            .caption_bytes(png_bytes(4, 4), Path::new("upload"), Some(ToneMode::Casual))
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Generation { .. }));
    }

    struct StalledModel;

    #[async_trait]
    impl CaptionModel for StalledModel {
        fn name(&self) -> &str {
            "stalled"
        }

        async fn is_available(&self) -> bool {
            true
        }

        async fn generate(&self, _request: &CaptionRequest) -> Result<Vec<String>, PipelineError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(Vec::new())
        }

        fn timeout(&self) -> Duration {
            Duration::from_secs(60)
        }
    }

    #[tokio::test]
    async fn test_generation_timeout() {
        let mut config = Config::default();
        config.limits.generate_timeout_ms = 20;
        let p = CaptionPipeline::new(Arc::new(StalledModel), &config);
        let err = p
            .caption_bytes(png_bytes(4, 4), Path::new("upload"), None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Timeout { ref stage, timeout_ms: 20, .. } if stage == "generate"
        ));
    }
}
