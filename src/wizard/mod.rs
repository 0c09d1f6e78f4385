pub mod store;

use std::sync::Arc;

use thiserror::Error;

use crate::persona::{Consent, SurveyResponse, UserPhoto};
use crate::pipeline::{MatchImage, MatchInputs};

pub use store::SessionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    Photo,
    Survey,
    Consent,
    Result,
}

impl WizardStep {
    pub const ALL: [WizardStep; 4] = [
        WizardStep::Photo,
        WizardStep::Survey,
        WizardStep::Consent,
        WizardStep::Result,
    ];

    #[cfg(test)]
    pub fn number(self) -> usize {
        match self {
            WizardStep::Photo => 1,
            WizardStep::Survey => 2,
            WizardStep::Consent => 3,
            WizardStep::Result => 4,
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            WizardStep::Photo => "/photo",
            WizardStep::Survey => "/survey",
            WizardStep::Consent => "/consent",
            WizardStep::Result => "/result",
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            WizardStep::Photo => "photo",
            WizardStep::Survey => "survey",
            WizardStep::Consent => "consent",
            WizardStep::Result => "result",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WizardStep::Photo => "1️⃣ 프로필 사진 업로드",
            WizardStep::Survey => "2️⃣ 성향 설문조사",
            WizardStep::Consent => "3️⃣ 데이터 동의",
            WizardStep::Result => "4️⃣ 결과 보기",
        }
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PrerequisiteError {
    #[error("⚠️ 설문조사를 먼저 완료해주세요 (2단계).")]
    SurveyIncomplete,
    #[error("⚠️ 데이터 동의 단계를 완료해주세요 (3단계).")]
    ConsentIncomplete,
}

impl PrerequisiteError {
    /// Step the user should be sent back to.
    pub fn step(self) -> WizardStep {
        match self {
            PrerequisiteError::SurveyIncomplete => WizardStep::Survey,
            PrerequisiteError::ConsentIncomplete => WizardStep::Consent,
        }
    }
}

/// Per-session wizard state. Each field is written only by its own step.
/// The photo is shared so snapshots do not copy the upload.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    photo: Option<Arc<UserPhoto>>,
    survey: Option<SurveyResponse>,
    consent: Option<Consent>,
    match_image: Option<MatchImage>,
}

impl SessionContext {
    pub fn photo(&self) -> Option<&UserPhoto> {
        self.photo.as_deref()
    }

    pub fn survey(&self) -> Option<SurveyResponse> {
        self.survey
    }

    pub fn consent(&self) -> Option<Consent> {
        self.consent
    }

    pub fn match_image(&self) -> Option<&MatchImage> {
        self.match_image.as_ref()
    }

    pub fn set_photo(&mut self, photo: UserPhoto) {
        self.photo = Some(Arc::new(photo));
    }

    pub fn set_survey(&mut self, survey: SurveyResponse) {
        self.survey = Some(survey);
    }

    pub fn set_consent(&mut self, consent: Consent) {
        self.consent = Some(consent);
    }

    pub fn clear_match_image(&mut self) {
        self.match_image = None;
    }

    pub fn set_match_image(&mut self, image: MatchImage) {
        self.match_image = Some(image);
    }

    /// Survey is checked before consent so the earliest missing step is
    /// reported.
    pub fn result_inputs(&self) -> Result<MatchInputs, PrerequisiteError> {
        let survey = self.survey.ok_or(PrerequisiteError::SurveyIncomplete)?;
        let consent = self.consent.ok_or(PrerequisiteError::ConsentIncomplete)?;
        Ok(MatchInputs {
            survey,
            consent,
            photo: self.photo.clone(),
        })
    }
}
