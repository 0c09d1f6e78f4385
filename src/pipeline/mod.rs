pub mod extract;
pub mod image_prompt;
pub mod prompt;

use std::sync::Arc;

use tracing::{info, warn};

use crate::llm::messages::count_image_parts;
use crate::llm::service::{
    ClassificationError, CompletionService, ImageGenerationError, ImageRequest, ImageService,
};
use crate::persona::{Consent, ReferenceSet, SurveyResponse, UserPhoto};

pub use extract::extract_match_summary;
pub use image_prompt::build_image_prompt;
pub use prompt::build_classification_request;

/// Validated values collected by the wizard before the result step.
#[derive(Debug, Clone)]
pub struct MatchInputs {
    pub survey: SurveyResponse,
    pub consent: Consent,
    pub photo: Option<Arc<UserPhoto>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchImage {
    pub url: String,
}

/// Result of a run whose classification phase succeeded. The image phase has
/// its own error channel so a failed portrait never hides the analysis.
#[derive(Debug)]
pub struct MatchOutcome {
    pub analysis: String,
    pub match_summary: Option<String>,
    pub image_prompt: String,
    pub image: Result<MatchImage, ImageGenerationError>,
}

#[derive(Clone)]
pub struct MatchPipeline {
    references: Arc<ReferenceSet>,
    completion: Arc<dyn CompletionService>,
    images: Arc<dyn ImageService>,
}

impl MatchPipeline {
    pub fn new(
        references: Arc<ReferenceSet>,
        completion: Arc<dyn CompletionService>,
        images: Arc<dyn ImageService>,
    ) -> Self {
        Self {
            references,
            completion,
            images,
        }
    }

    pub async fn classify(&self, inputs: &MatchInputs) -> Result<String, ClassificationError> {
        let messages = build_classification_request(
            &self.references,
            &inputs.survey,
            inputs.consent,
            inputs.photo.as_deref(),
        );
        info!(
            "Requesting persona classification from {} (messages={}, image_parts={}, photo={})",
            self.completion.name(),
            messages.len(),
            count_image_parts(&messages),
            inputs.photo.is_some()
        );
        self.completion.complete(&messages).await
    }

    pub async fn generate_match_image(&self, prompt: &str) -> Result<MatchImage, ImageGenerationError> {
        let request = ImageRequest::new(prompt);
        info!(
            "Requesting match portrait from {} (size={}, quality={})",
            self.images.name(),
            request.size,
            request.quality
        );
        let url = self.images.generate(&request).await?;
        Ok(MatchImage { url })
    }

    /// Classify, then generate the portrait from the extracted summary. The
    /// image phase only runs once classification has succeeded.
    pub async fn run(&self, inputs: &MatchInputs) -> Result<MatchOutcome, ClassificationError> {
        let analysis = self.classify(inputs).await?;

        let match_summary = extract_match_summary(&analysis);
        if match_summary.is_none() {
            warn!("Match summary section not found in analysis; using fallback image prompt");
        }
        let image_prompt = build_image_prompt(match_summary.as_deref());

        let image = self.generate_match_image(&image_prompt).await;
        if let Err(err) = &image {
            warn!("Match image generation failed: {}", err);
        }

        Ok(MatchOutcome {
            analysis,
            match_summary,
            image_prompt,
            image,
        })
    }
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use crate::persona::reference::MATCH_SECTION_HEADER;
    use crate::persona::{EnergyPreference, TravelStyle};
    use crate::pipeline::image_prompt::{BASE_IMAGE_INSTRUCTION, FALLBACK_CLAUSE};

    fn outdoor_spontaneous() -> MatchInputs {
        MatchInputs {
            survey: SurveyResponse {
                energy: EnergyPreference::Outdoor,
                travel: TravelStyle::Spontaneous,
            },
            consent: Consent::Granted,
            photo: None,
        }
    }

    #[tokio::test]
    async fn summary_flows_into_image_prompt() {
        let reply = format!("**[분류된 페르소나: 테토 (TETO)]**\n\n{MATCH_SECTION_HEADER}\nLoves adventure.");
        let completion = Arc::new(StubCompletion::replying(&reply));
        let images = Arc::new(StubImages::replying("https://images.example/match.png"));
        let pipeline = pipeline(completion.clone(), images.clone());

        let outcome = pipeline.run(&outdoor_spontaneous()).await.unwrap();

        assert_eq!(count_image_parts(&completion.last_request.lock()), 2);
        assert_eq!(outcome.analysis, reply);
        assert_eq!(outcome.match_summary.as_deref(), Some("Loves adventure."));
        assert!(outcome.image_prompt.starts_with(BASE_IMAGE_INSTRUCTION));
        assert!(outcome.image_prompt.ends_with("Loves adventure."));
        assert_eq!(images.last_prompt.lock().as_deref(), Some(outcome.image_prompt.as_str()));
        assert_eq!(
            outcome.image.unwrap(),
            MatchImage {
                url: "https://images.example/match.png".to_string()
            }
        );
    }

    #[tokio::test]
    async fn image_failure_keeps_classification_text() {
        let completion = Arc::new(StubCompletion::replying("분석 결과"));
        let images = Arc::new(StubImages::failing("content policy violation"));
        let pipeline = pipeline(completion, images.clone());

        let outcome = pipeline.run(&outdoor_spontaneous()).await.unwrap();

        assert_eq!(outcome.analysis, "분석 결과");
        assert!(outcome.match_summary.is_none());
        assert!(outcome.image_prompt.ends_with(FALLBACK_CLAUSE));
        let err = outcome.image.unwrap_err();
        assert_eq!(err.to_string(), "Image generation failed: content policy violation");
        assert_eq!(images.call_count(), 1);
    }

    #[tokio::test]
    async fn classification_failure_skips_image_call() {
        let completion = Arc::new(StubCompletion::failing("status 401: invalid key"));
        let images = Arc::new(StubImages::replying("https://images.example/unused.png"));
        let pipeline = pipeline(completion.clone(), images.clone());

        let err = pipeline.run(&outdoor_spontaneous()).await.unwrap_err();

        assert_eq!(err.to_string(), "Classification failed: status 401: invalid key");
        assert_eq!(completion.call_count(), 1);
        assert_eq!(images.call_count(), 0);
    }
}
