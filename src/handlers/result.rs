use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Response;
use tracing::{info, warn};
use uuid::Uuid;

use crate::handlers::pages::{escape_html, markdown_to_html, Notice, Page};
use crate::handlers::session::SessionHandle;
use crate::llm::ClassificationError;
use crate::pipeline::MatchOutcome;
use crate::state::AppState;
use crate::utils::timing::start_step_timer;
use crate::wizard::{PrerequisiteError, WizardStep};

const TITLE: &str = "💞 AI 매칭 결과";

#[derive(Debug)]
pub enum ResultView {
    Incomplete(PrerequisiteError),
    ClassificationFailed {
        error: ClassificationError,
        photo_missing: bool,
    },
    Completed {
        outcome: MatchOutcome,
        photo_missing: bool,
    },
}

/// Runs the pipeline for one session. No service is called unless the survey
/// and consent steps are complete.
pub async fn run_result_step(state: &AppState, session_id: Uuid) -> ResultView {
    let inputs = match state.sessions.snapshot(session_id).result_inputs() {
        Ok(inputs) => inputs,
        Err(err) => return ResultView::Incomplete(err),
    };
    let photo_missing = inputs.photo.is_none();

    state
        .sessions
        .update(session_id, |context| context.clear_match_image());

    match state.pipeline.run(&inputs).await {
        Ok(outcome) => {
            if let Ok(image) = &outcome.image {
                let image = image.clone();
                state
                    .sessions
                    .update(session_id, move |context| context.set_match_image(image));
            }
            ResultView::Completed {
                outcome,
                photo_missing,
            }
        }
        Err(error) => ResultView::ClassificationFailed {
            error,
            photo_missing,
        },
    }
}

fn incomplete_page(err: PrerequisiteError) -> Page {
    let step = err.step();
    Page::new(WizardStep::Result, TITLE)
        .notice(Notice::Warning(err.to_string()))
        .body(format!(
            "<p><a href=\"{}\">{}(으)로 이동</a></p>\n",
            step.path(),
            escape_html(step.label())
        ))
}

fn photo_missing_notice() -> Notice {
    Notice::Warning(
        "⚠️ 프로필 사진이 업로드되지 않아, 설문 결과 기반으로만 페르소나를 추론하여 분석합니다.".to_string(),
    )
}

fn run_button() -> &'static str {
    "<form method=\"post\" action=\"/result\"><button type=\"submit\">✨ 결과 보기</button></form>\n"
}

fn completed_body(outcome: &MatchOutcome) -> String {
    let mut body = String::from(run_button());
    body.push_str(&Notice::Success("✨ 결과가 도출되었습니다!".to_string()).to_html());
    body.push_str("<h3>💬 AI 분석 결과</h3>\n<div class=\"analysis\">\n");
    body.push_str(&markdown_to_html(&outcome.analysis));
    body.push_str("</div>\n<hr>\n<h3>🎉 이분과 어울릴 것 같아요!</h3>\n");

    let summary_notice = match &outcome.match_summary {
        Some(summary) => Notice::Info(format!(
            "AI가 어울리는 사람의 특징을 바탕으로 이미지를 생성합니다: \n\n {summary}"
        )),
        None => Notice::Warning(
            "⚠️ '어울리는 사람의 페르소나 요약'을 찾을 수 없어 일반적인 소개팅 프로필 이미지를 생성합니다.".to_string(),
        ),
    };
    body.push_str(&summary_notice.to_html());
    body.push_str(&format!(
        "<details><summary>이미지 생성 프롬프트</summary><pre>{}</pre></details>\n",
        escape_html(&outcome.image_prompt)
    ));

    match &outcome.image {
        Ok(image) => {
            body.push_str(&format!(
                "<figure><img src=\"{}\" style=\"width:100%\" alt=\"generated match\"><figcaption>AI가 생성한 매칭 페르소나 이미지</figcaption></figure>\n",
                escape_html(&image.url)
            ));
            body.push_str(
                &Notice::Success("✅ 매칭 페르소나 이미지가 성공적으로 생성되었습니다!".to_string()).to_html(),
            );
        }
        Err(err) => {
            body.push_str(&Notice::Error(format!("이미지 생성 중 오류가 발생했습니다: {err}")).to_html());
        }
    }
    body
}

pub fn render_result(view: &ResultView) -> Page {
    match view {
        ResultView::Incomplete(err) => incomplete_page(*err),
        ResultView::ClassificationFailed {
            error,
            photo_missing,
        } => {
            let mut page = Page::new(WizardStep::Result, TITLE);
            if *photo_missing {
                page = page.notice(photo_missing_notice());
            }
            page.notice(Notice::Error(format!("API 호출 중 오류가 발생했습니다:\n\n{error}")))
                .body(run_button().to_string())
        }
        ResultView::Completed {
            outcome,
            photo_missing,
        } => {
            let mut page = Page::new(WizardStep::Result, TITLE);
            if *photo_missing {
                page = page.notice(photo_missing_notice());
            }
            page.body(completed_body(outcome))
        }
    }
}

pub async fn show(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let session = SessionHandle::resolve(&state, &headers);
    let context = state.sessions.snapshot(session.id);

    let page = match context.result_inputs() {
        Err(err) => incomplete_page(err),
        Ok(_) => {
            let mut body = String::from(run_button());
            if let Some(image) = context.match_image() {
                body.push_str(&format!(
                    "<h3>🎉 이분과 어울릴 것 같아요!</h3>\n<figure><img src=\"{}\" style=\"width:100%\" alt=\"generated match\"><figcaption>AI가 생성한 매칭 페르소나 이미지</figcaption></figure>\n",
                    escape_html(&image.url)
                ));
            }
            Page::new(WizardStep::Result, TITLE).body(body)
        }
    };
    session.finish(page.render())
}

pub async fn run(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let session = SessionHandle::resolve(&state, &headers);
    let mut timer = start_step_timer(WizardStep::Result.slug(), &session.id.to_string());

    let view = run_result_step(&state, session.id).await;
    match &view {
        ResultView::Incomplete(err) => {
            info!("Result step for session {} blocked: {:?}", session.id, err);
            timer.mark_status("incomplete", Some(format!("{err:?}")));
        }
        ResultView::ClassificationFailed { error, .. } => {
            warn!("Classification failed for session {}: {}", session.id, error);
            timer.mark_status("error", Some("classification".to_string()));
        }
        ResultView::Completed { outcome, .. } => {
            if outcome.image.is_err() {
                timer.mark_status("partial", Some("image".to_string()));
            }
        }
    }
    timer.log_completed();

    session.finish(render_result(&view).render())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::Config;
    use crate::persona::reference::MATCH_SECTION_HEADER;
    use crate::persona::{Consent, EnergyPreference, SurveyResponse, TravelStyle};
    use crate::pipeline::testing::{pipeline, StubCompletion, StubImages};

    fn state_with(completion: Arc<StubCompletion>, images: Arc<StubImages>) -> AppState {
        let config = Config::from_lookup(|name| (name == "OPENAI_API_KEY").then(|| "sk-test".to_string()))
            .unwrap();
        AppState::new(Arc::new(config), pipeline(completion, images))
    }

    fn complete_session(state: &AppState) -> Uuid {
        let (id, _) = state.sessions.resolve(None);
        state.sessions.update(id, |context| {
            context.set_survey(SurveyResponse {
                energy: EnergyPreference::Outdoor,
                travel: TravelStyle::Spontaneous,
            });
            context.set_consent(Consent::Granted);
        });
        id
    }

    #[tokio::test]
    async fn empty_survey_makes_no_service_call() {
        let completion = Arc::new(StubCompletion::replying("unused"));
        let images = Arc::new(StubImages::replying("https://images.example/unused.png"));
        let state = state_with(completion.clone(), images.clone());
        let (id, _) = state.sessions.resolve(None);

        let view = run_result_step(&state, id).await;

        assert!(matches!(view, ResultView::Incomplete(PrerequisiteError::SurveyIncomplete)));
        assert_eq!(completion.call_count(), 0);
        assert_eq!(images.call_count(), 0);
        let html = render_result(&view).render().0;
        assert!(html.contains("href=\"/survey\""));
    }

    #[tokio::test]
    async fn stores_generated_image_in_session() {
        let reply = format!("{MATCH_SECTION_HEADER}\nLoves adventure.");
        let completion = Arc::new(StubCompletion::replying(&reply));
        let images = Arc::new(StubImages::replying("https://images.example/match.png"));
        let state = state_with(completion, images);
        let id = complete_session(&state);

        let view = run_result_step(&state, id).await;

        match &view {
            ResultView::Completed { outcome, photo_missing } => {
                assert!(*photo_missing);
                assert!(outcome.image_prompt.ends_with("Loves adventure."));
            }
            other => panic!("unexpected view: {other:?}"),
        }
        assert_eq!(
            state.sessions.snapshot(id).match_image().map(|image| image.url.as_str()),
            Some("https://images.example/match.png")
        );
        let html = render_result(&view).render().0;
        assert!(html.contains("https://images.example/match.png"));
        assert!(html.contains("프로필 사진이 업로드되지 않아"));
        assert!(html.contains("<summary>이미지 생성 프롬프트</summary>"));
        assert!(html.contains("Based on the following description: Loves adventure.</pre>"));
    }

    #[tokio::test]
    async fn image_failure_still_shows_analysis() {
        let completion = Arc::new(StubCompletion::replying("**[분류된 페르소나: 에겐 (EGEN)]**"));
        let images = Arc::new(StubImages::failing("rate limited"));
        let state = state_with(completion, images);
        let id = complete_session(&state);
        state.sessions.update(id, |context| {
            context.set_match_image(crate::pipeline::MatchImage {
                url: "https://images.example/old.png".to_string(),
            })
        });

        let view = run_result_step(&state, id).await;

        assert!(matches!(&view, ResultView::Completed { outcome, .. } if outcome.image.is_err()));
        assert!(state.sessions.snapshot(id).match_image().is_none());
        let html = render_result(&view).render().0;
        assert!(html.contains("<strong>[분류된 페르소나: 에겐 (EGEN)]</strong>"));
        assert!(html.contains("이미지 생성 중 오류가 발생했습니다: Image generation failed: rate limited"));
    }

    #[tokio::test]
    async fn classification_failure_is_reported() {
        let completion = Arc::new(StubCompletion::failing("timeout"));
        let images = Arc::new(StubImages::replying("https://images.example/unused.png"));
        let state = state_with(completion, images.clone());
        let id = complete_session(&state);

        let view = run_result_step(&state, id).await;

        assert!(matches!(view, ResultView::ClassificationFailed { .. }));
        assert_eq!(images.call_count(), 0);
        let html = render_result(&view).render().0;
        assert!(html.contains("API 호출 중 오류가 발생했습니다"));
    }
}
