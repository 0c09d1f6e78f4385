use axum::extract::{Multipart, State};
use axum::http::HeaderMap;
use axum::response::Response;
use tracing::{info, warn};

use crate::handlers::pages::{escape_html, Notice, Page};
use crate::handlers::session::SessionHandle;
use crate::persona::photo::ACCEPTED_EXTENSIONS;
use crate::persona::UserPhoto;
use crate::state::AppState;
use crate::wizard::{SessionContext, WizardStep};

const PHOTO_FIELD: &str = "photo";

fn photo_page(context: &SessionContext, notices: Vec<Notice>) -> Page {
    let accept = ACCEPTED_EXTENSIONS
        .iter()
        .map(|ext| format!(".{ext}"))
        .collect::<Vec<_>>()
        .join(",");
    let mut body = format!(
        "<form method=\"post\" action=\"/photo\" enctype=\"multipart/form-data\">\n\
         <label>프로필 사진을 업로드하세요.<br><input type=\"file\" name=\"{PHOTO_FIELD}\" accept=\"{accept}\"></label>\n\
         <button type=\"submit\">업로드</button>\n</form>\n"
    );
    if let Some(photo) = context.photo() {
        let caption = match photo.file_name.as_deref() {
            Some(name) => format!("업로드한 사진 ({})", escape_html(name)),
            None => "업로드한 사진".to_string(),
        };
        body.push_str(&format!(
            "<figure><img src=\"{}\" width=\"250\" alt=\"uploaded photo\"><figcaption>{}</figcaption></figure>\n",
            escape_html(&photo.data_url()),
            caption
        ));
    }
    body.push_str(&Notice::Info("👉 상단의 단계를 눌러 다음 단계로 이동하세요.".to_string()).to_html());

    let mut page = Page::new(WizardStep::Photo, "💘 소개팅 매칭 웹페이지")
        .header("1단계: 프로필 사진 업로드")
        .body(body);
    page.notices = notices;
    page
}

pub async fn show(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let session = SessionHandle::resolve(&state, &headers);
    let context = state.sessions.snapshot(session.id);
    session.finish(photo_page(&context, Vec::new()).render())
}

pub async fn upload(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    let session = SessionHandle::resolve(&state, &headers);
    let notice = match read_photo_field(&mut multipart, state.config.max_upload_bytes).await {
        Ok(Some(photo)) => {
            info!(
                "Session {} uploaded photo ({} bytes, {})",
                session.id,
                photo.bytes.len(),
                photo.mime.as_str()
            );
            state.sessions.update(session.id, |context| context.set_photo(photo));
            Notice::Success("✅ 사진이 업로드되었습니다!".to_string())
        }
        Ok(None) => Notice::Warning("사진 파일을 선택해주세요.".to_string()),
        Err(message) => {
            warn!("Rejected photo upload for session {}: {}", session.id, message);
            Notice::Warning(message)
        }
    };

    let context = state.sessions.snapshot(session.id);
    session.finish(photo_page(&context, vec![notice]).render())
}

async fn read_photo_field(multipart: &mut Multipart, max_bytes: usize) -> Result<Option<UserPhoto>, String> {
    while let Some(field) = multipart.next_field().await.map_err(|err| err.body_text())? {
        if field.name() != Some(PHOTO_FIELD) {
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let declared_mime = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map_err(|err| err.body_text())?;
        if bytes.is_empty() && file_name.as_deref().map_or(true, str::is_empty) {
            return Ok(None);
        }
        return UserPhoto::from_upload(
            bytes.to_vec(),
            declared_mime.as_deref(),
            file_name.as_deref().filter(|name| !name.is_empty()),
            max_bytes,
        )
        .map(Some)
        .map_err(|err| err.to_string());
    }
    Ok(None)
}
