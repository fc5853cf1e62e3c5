//! Caption model integration.
//!
//! Provides the model abstraction over vision backends (Ollama, OpenAI-style
//! APIs) and the requester that turns a decoded image into raw captions.

pub(crate) mod clean;
pub(crate) mod model;
pub(crate) mod ollama;
pub(crate) mod openai;
pub(crate) mod requester;

pub use clean::clean_caption;
pub use model::{
    resolve_env_var, CaptionModel, CaptionModelFactory, CaptionRequest, ImageInput,
    SamplingConfig, KNOWN_PROVIDERS,
};
pub use requester::{CaptionRequester, RawCaption, SEED_RANGE};
