//! Few-shot request assembly for persona classification.

use crate::llm::messages::{ChatMessage, ContentPart, ImageDetail, Role};
use crate::persona::{Consent, ReferenceSet, SurveyResponse, UserPhoto};

pub const SYSTEM_INSTRUCTION: &str = "당신은 이미지 분류 전문가입니다. 사진을 '에겐' 또는 '테토' 두 가지 예시 이미지와 비교하여 하나의 카테고리로 분류해야 합니다. 출력 형식은 예시와 완전히 동일해야 합니다.";

/// Fidelity for the fixed examples. The live photo is always sent at
/// [`ImageDetail::High`].
pub const REFERENCE_IMAGE_DETAIL: ImageDetail = ImageDetail::Low;
pub const LIVE_PHOTO_DETAIL: ImageDetail = ImageDetail::High;

pub fn live_request_text(survey: &SurveyResponse, consent: Consent) -> String {
    format!(
        "**[실제 사용자 입력 및 묘사 요청]**\n\
         위의 '에겐'과 '테토' 예시를 참고하여, 다음 '사진'을 분류하세요.\n\
         \n\
         1. 사진 분석을 통해 예시 중 어떤 페르소나(에겐 또는 테토)인지 두 개 카테고리 중 하나로 반드시 분류하세요.\n\
         2. 선택된 페르소나의 분석 형식에 맞춰 설문 정보와 사진을 묘사하세요.\n\
         \n\
         [사용자 설문 정보]\n\
         - Q1 응답: {q1}\n\
         - Q2 응답: {q2}\n\
         - 데이터 동의: {consent} (분석에 크게 중요하지 않지만 참고만 할 것)",
        q1 = survey.energy.answer_text(),
        q2 = survey.travel.answer_text(),
        consent = consent.answer_text(),
    )
}

/// Builds system, EGEN pair, TETO pair, then the single live user turn.
pub fn build_classification_request(
    references: &ReferenceSet,
    survey: &SurveyResponse,
    consent: Consent,
    photo: Option<&UserPhoto>,
) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(6);
    messages.push(ChatMessage::system(SYSTEM_INSTRUCTION));

    for example in references.iter() {
        messages.push(ChatMessage::new(
            Role::User,
            vec![
                ContentPart::text(example.persona.few_shot_prompt()),
                ContentPart::image(example.data_url(), REFERENCE_IMAGE_DETAIL),
            ],
        ));
        messages.push(ChatMessage::assistant(example.canonical_output().render()));
    }

    let mut live = vec![ContentPart::text(live_request_text(survey, consent))];
    if let Some(photo) = photo {
        live.push(ContentPart::image(photo.data_url(), LIVE_PHOTO_DETAIL));
    }
    messages.push(ChatMessage::new(Role::User, live));

    messages
}
