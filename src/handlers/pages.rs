use axum::response::Html;
use pulldown_cmark::{html, Event, Options, Parser, Tag};
use url::Url;

use crate::wizard::WizardStep;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Info(String),
    Warning(String),
    Error(String),
}

impl Notice {
    fn class(&self) -> &'static str {
        match self {
            Notice::Success(_) => "success",
            Notice::Info(_) => "info",
            Notice::Warning(_) => "warning",
            Notice::Error(_) => "error",
        }
    }

    fn text(&self) -> &str {
        match self {
            Notice::Success(text) | Notice::Info(text) | Notice::Warning(text) | Notice::Error(text) => text,
        }
    }

    pub fn to_html(&self) -> String {
        format!(
            "<div class=\"notice {}\">{}</div>\n",
            self.class(),
            escape_html(self.text()).replace('\n', "<br>")
        )
    }
}

pub struct Page {
    pub step: WizardStep,
    pub title: &'static str,
    pub header: Option<&'static str>,
    pub notices: Vec<Notice>,
    pub body: String,
}

impl Page {
    pub fn new(step: WizardStep, title: &'static str) -> Self {
        Self {
            step,
            title,
            header: None,
            notices: Vec::new(),
            body: String::new(),
        }
    }

    pub fn header(mut self, header: &'static str) -> Self {
        self.header = Some(header);
        self
    }

    pub fn notice(mut self, notice: Notice) -> Self {
        self.notices.push(notice);
        self
    }

    pub fn body(mut self, body: String) -> Self {
        self.body = body;
        self
    }

    pub fn render(&self) -> Html<String> {
        let mut out = String::with_capacity(4096 + self.body.len());
        out.push_str("<!doctype html>\n<html lang=\"ko\">\n<head>\n<meta charset=\"utf-8\">\n");
        out.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
        out.push_str("<title>소개팅 매칭 페이지</title>\n<style>");
        out.push_str(STYLE);
        out.push_str("</style>\n</head>\n<body>\n<main>\n");
        out.push_str(&step_nav(self.step));
        out.push_str(&format!("<h1>{}</h1>\n", escape_html(self.title)));
        if let Some(header) = self.header {
            out.push_str(&format!("<h2>{}</h2>\n", escape_html(header)));
        }
        for notice in &self.notices {
            out.push_str(&notice.to_html());
        }
        out.push_str(&self.body);
        out.push_str(
            "<form method=\"post\" action=\"/restart\" class=\"restart\"><button type=\"submit\">처음부터 다시 하기</button></form>\n",
        );
        out.push_str("</main>\n</body>\n</html>\n");
        Html(out)
    }
}

const STYLE: &str = "body{font-family:sans-serif;background:#fafafa;color:#222}\
main{max-width:720px;margin:2rem auto;padding:0 1rem}\
nav{display:flex;gap:.5rem;flex-wrap:wrap;margin-bottom:1.5rem}\
nav a{padding:.4rem .8rem;border-radius:1rem;border:1px solid #ccc;text-decoration:none;color:#333}\
nav a.active{background:#ff4b4b;color:#fff;border-color:#ff4b4b}\
.notice{padding:.75rem 1rem;border-radius:.5rem;margin:.75rem 0}\
.success{background:#e6f4ea}.info{background:#e8f0fe}.warning{background:#fff4e5}.error{background:#fdecea}\
fieldset{border:none;padding:0;margin:1rem 0}\
.restart{margin-top:3rem}";

fn step_nav(current: WizardStep) -> String {
    let mut out = String::from("<p>단계를 선택하세요 👇</p>\n<nav>");
    for step in WizardStep::ALL {
        let class = if step == current { " class=\"active\"" } else { "" };
        out.push_str(&format!(
            "<a href=\"{}\"{}>{}</a>",
            step.path(),
            class,
            escape_html(step.label())
        ));
    }
    out.push_str("</nav>\n");
    out
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn is_web_destination(dest: &str) -> bool {
    Url::parse(dest)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}

/// Renders model output as Markdown. Raw HTML in the output is shown as text,
/// and links or images that do not point at http(s) keep only their text.
pub fn markdown_to_html(text: &str) -> String {
    let parser = Parser::new_ext(text, Options::ENABLE_STRIKETHROUGH).filter_map(|event| match event {
        Event::Html(raw) => Some(Event::Text(raw)),
        Event::Start(Tag::Link(_, ref dest, _))
        | Event::End(Tag::Link(_, ref dest, _))
        | Event::Start(Tag::Image(_, ref dest, _))
        | Event::End(Tag::Image(_, ref dest, _))
            if !is_web_destination(dest) =>
        {
            None
        }
        other => Some(other),
    });
    let mut out = String::new();
    html::push_html(&mut out, parser);
    out
}

pub struct RadioOption<'a> {
    pub value: &'a str,
    pub label: &'a str,
}

pub fn radio_group(name: &str, question: &str, options: &[RadioOption<'_>], selected: Option<&str>) -> String {
    let selected = selected.or_else(|| options.first().map(|option| option.value));
    let mut out = format!("<fieldset>\n<legend>{}</legend>\n", escape_html(question));
    for option in options {
        let checked = if Some(option.value) == selected { " checked" } else { "" };
        out.push_str(&format!(
            "<label><input type=\"radio\" name=\"{}\" value=\"{}\"{}> {}</label><br>\n",
            escape_html(name),
            escape_html(option.value),
            checked,
            escape_html(option.label)
        ));
    }
    out.push_str("</fieldset>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_html("<b>\"a\" & 'b'</b>"), "&lt;b&gt;&quot;a&quot; &amp; &#39;b&#39;&lt;/b&gt;");
    }

    #[test]
    fn markdown_keeps_formatting_but_not_raw_html() {
        let html = markdown_to_html("**굵게**\n\n<script>alert(1)</script>");
        assert!(html.contains("<strong>굵게</strong>"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn markdown_drops_non_web_links() {
        let html = markdown_to_html("[x](javascript:alert(1)) ![y](data:image/png;base64,AAAA)");
        assert!(!html.contains("href"));
        assert!(!html.contains("<img"));
        assert!(!html.contains("javascript:"));
        assert!(html.contains('x'));
        assert!(html.contains('y'));

        let html = markdown_to_html("[프로필](https://example.com/a)");
        assert!(html.contains("<a href=\"https://example.com/a\">프로필</a>"));
    }

    #[test]
    fn first_option_is_checked_by_default() {
        let options = [
            RadioOption { value: "granted", label: "네" },
            RadioOption { value: "declined", label: "아니오" },
        ];
        let html = radio_group("consent", "Q", &options, None);
        assert!(html.contains("value=\"granted\" checked"));
        let html = radio_group("consent", "Q", &options, Some("declined"));
        assert!(html.contains("value=\"declined\" checked"));
        assert!(!html.contains("value=\"granted\" checked"));
    }

    #[test]
    fn nav_marks_current_step() {
        let page = Page::new(WizardStep::Consent, "t").render().0;
        assert!(page.contains("<a href=\"/consent\" class=\"active\">"));
        assert!(page.contains("<a href=\"/result\">"));
    }
}
