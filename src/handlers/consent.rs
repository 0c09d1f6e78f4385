use axum::extract::{Form, State};
use axum::http::HeaderMap;
use axum::response::Response;
use serde::Deserialize;

use crate::handlers::pages::{radio_group, Notice, Page, RadioOption};
use crate::handlers::session::SessionHandle;
use crate::persona::Consent;
use crate::state::AppState;
use crate::wizard::{SessionContext, WizardStep};

#[derive(Debug, Deserialize)]
pub struct ConsentForm {
    consent: Option<Consent>,
}

fn consent_page(context: &SessionContext, notices: Vec<Notice>) -> Page {
    let options: Vec<RadioOption<'_>> = Consent::ALL
        .iter()
        .map(|option| RadioOption {
            value: option.form_value(),
            label: option.answer_text(),
        })
        .collect();

    let mut body = String::from("<form method=\"post\" action=\"/consent\">\n");
    body.push_str(&radio_group(
        "consent",
        Consent::QUESTION,
        &options,
        context.consent().map(Consent::form_value),
    ));
    body.push_str("<button type=\"submit\">저장</button>\n</form>\n");

    let mut page = Page::new(WizardStep::Consent, "🔒 데이터 활용 동의")
        .header("3단계: 데이터 제공에 동의해주세요")
        .body(body);
    page.notices = notices;
    page
}

pub async fn show(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let session = SessionHandle::resolve(&state, &headers);
    let context = state.sessions.snapshot(session.id);
    session.finish(consent_page(&context, Vec::new()).render())
}

pub async fn submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<ConsentForm>,
) -> Response {
    let session = SessionHandle::resolve(&state, &headers);
    let notice = match form.consent {
        Some(consent) => {
            state.sessions.update(session.id, |context| context.set_consent(consent));
            Notice::Info("👉 '4️⃣ 결과 보기' 단계로 이동해 결과를 확인하세요!".to_string())
        }
        None => Notice::Warning("⚠️ 동의 여부를 선택해주세요.".to_string()),
    };
    let context = state.sessions.snapshot(session.id);
    session.finish(consent_page(&context, vec![notice]).render())
}
