pub mod media;
pub mod messages;
pub mod openai;
pub mod service;

pub use openai::OpenAiClient;
pub use service::ClassificationError;
