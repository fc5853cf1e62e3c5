//! Command implementations for the Tonecap CLI.

pub mod caption;
pub mod config;
pub mod interactive;
pub mod serve;

use clap::Args;
use tonecap_core::ModelOverrides;

/// Backend overrides shared by every command that builds a model.
#[derive(Args, Debug, Clone, Default)]
pub struct ModelArgs {
    /// Caption backend to use (ollama, openai)
    #[arg(long, global = true)]
    pub provider: Option<String>,

    /// Model name for the selected backend
    #[arg(long, global = true)]
    pub model: Option<String>,
}

impl From<ModelArgs> for ModelOverrides {
    fn from(args: ModelArgs) -> Self {
        ModelOverrides {
            provider: args.provider,
            model: args.model,
        }
    }
}
