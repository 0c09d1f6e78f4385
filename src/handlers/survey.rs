use axum::extract::{Form, State};
use axum::http::HeaderMap;
use axum::response::Response;
use serde::Deserialize;

use crate::handlers::pages::{radio_group, Notice, Page, RadioOption};
use crate::handlers::session::SessionHandle;
use crate::persona::{EnergyPreference, SurveyResponse, TravelStyle};
use crate::state::AppState;
use crate::wizard::{SessionContext, WizardStep};

#[derive(Debug, Deserialize)]
pub struct SurveyForm {
    energy: Option<EnergyPreference>,
    travel: Option<TravelStyle>,
}

impl SurveyForm {
    fn into_survey(self) -> Option<SurveyResponse> {
        Some(SurveyResponse {
            energy: self.energy?,
            travel: self.travel?,
        })
    }
}

fn survey_page(context: &SessionContext, notices: Vec<Notice>) -> Page {
    let current = context.survey();
    let energy_options: Vec<RadioOption<'_>> = EnergyPreference::ALL
        .iter()
        .map(|option| RadioOption {
            value: option.form_value(),
            label: option.answer_text(),
        })
        .collect();
    let travel_options: Vec<RadioOption<'_>> = TravelStyle::ALL
        .iter()
        .map(|option| RadioOption {
            value: option.form_value(),
            label: option.answer_text(),
        })
        .collect();

    let mut body = String::from("<form method=\"post\" action=\"/survey\">\n");
    body.push_str(&radio_group(
        "energy",
        EnergyPreference::QUESTION,
        &energy_options,
        current.map(|survey| survey.energy.form_value()),
    ));
    body.push_str(&radio_group(
        "travel",
        TravelStyle::QUESTION,
        &travel_options,
        current.map(|survey| survey.travel.form_value()),
    ));
    body.push_str("<button type=\"submit\">설문 제출</button>\n</form>\n");

    let mut page = Page::new(WizardStep::Survey, "💬 성향 설문조사")
        .header("2단계: 나의 취향을 알려주세요")
        .body(body);
    page.notices = notices;
    page
}

pub async fn show(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let session = SessionHandle::resolve(&state, &headers);
    let context = state.sessions.snapshot(session.id);
    session.finish(survey_page(&context, Vec::new()).render())
}

pub async fn submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<SurveyForm>,
) -> Response {
    let session = SessionHandle::resolve(&state, &headers);
    let notice = match form.into_survey() {
        Some(survey) => {
            state.sessions.update(session.id, |context| context.set_survey(survey));
            Notice::Success("✅ 설문이 완료되었습니다. 상단의 단계 메뉴에서 다음 단계로 이동하세요.".to_string())
        }
        None => Notice::Warning("⚠️ 두 문항에 모두 답해주세요.".to_string()),
    };
    let context = state.sessions.snapshot(session.id);
    session.finish(survey_page(&context, vec![notice]).render())
}
