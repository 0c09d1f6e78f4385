use async_trait::async_trait;
use serde::Serialize;

use crate::llm::messages::ChatMessage;

pub const IMAGE_SIZE: &str = "1024x1024";
pub const IMAGE_QUALITY: &str = "standard";

#[derive(Debug, thiserror::Error)]
#[error("Classification failed: {0}")]
pub struct ClassificationError(pub String);

#[derive(Debug, thiserror::Error)]
#[error("Image generation failed: {0}")]
pub struct ImageGenerationError(pub String);

/// Body of an image generation call, minus the model name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageRequest {
    pub prompt: String,
    pub size: &'static str,
    pub quality: &'static str,
    pub n: u8,
}

impl ImageRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            size: IMAGE_SIZE,
            quality: IMAGE_QUALITY,
            n: 1,
        }
    }
}

/// Text + vision chat completion.
#[async_trait]
pub trait CompletionService: Send + Sync {
    fn name(&self) -> &'static str;

    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ClassificationError>;
}

/// Single-image generation returning a hosted URL.
#[async_trait]
pub trait ImageService: Send + Sync {
    fn name(&self) -> &'static str;

    async fn generate(&self, request: &ImageRequest) -> Result<String, ImageGenerationError>;
}
