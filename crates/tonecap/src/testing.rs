//! Shared fixtures for CLI and server tests.

use async_trait::async_trait;
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tonecap_core::caption::CaptionRequest;
use tonecap_core::{CaptionModel, CaptionPipeline, Config, PipelineError};

/// Caption model returning fixed captions and counting calls.
pub struct FixedModel {
    captions: Vec<String>,
    pub calls: AtomicUsize,
}

impl FixedModel {
    pub fn new(captions: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            captions: captions.iter().map(|c| c.to_string()).collect(),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CaptionModel for FixedModel {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn is_available(&self) -> bool {
        true
    }

    async fn generate(&self, _request: &CaptionRequest) -> Result<Vec<String>, PipelineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.captions.clone())
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(1)
    }
}

pub fn pipeline(model: Arc<FixedModel>) -> CaptionPipeline {
    CaptionPipeline::new(model, &Config::default())
}

/// A small solid-color PNG.
pub fn png_bytes() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(4, 4, image::Rgb([10, 120, 200]));
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}
