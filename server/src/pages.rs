use axum::response::Html;
use handlebars::{Handlebars, RenderError};
use serde::Serialize;
use serde_json::json;

const TEMPLATES: [(&str, &str); 4] = [
    ("layout", include_str!("../templates/layout.hbs")),
    ("index", include_str!("../templates/index.hbs")),
    ("solution", include_str!("../templates/solution.hbs")),
    ("compose", include_str!("../templates/compose.hbs")),
];

/// HTML pages, each rendered into the shared `layout` template.
pub struct Pages {
    engine: Handlebars<'static>,
}

impl Pages {
    pub fn new() -> anyhow::Result<Self> {
        let mut engine = Handlebars::new();
        for (name, source) in TEMPLATES {
            engine.register_template_string(name, source)?;
        }
        Ok(Self { engine })
    }

    pub fn render<T: Serialize>(&self, page: &str, title: &str, data: &T) -> Result<Html<String>, RenderError> {
        let contents = self.engine.render(page, data)?;
        let html = self.engine.render("layout", &json!({ "title": title, "contents": contents }))?;
        Ok(Html(html))
    }
}

/// Minimal standalone page for error responses, which have no access to the engine.
pub fn error_page(heading: &str, message: &str) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>{h}</title></head>\n<body>\n<h1>{h}</h1>\n<pre><code>{m}</code></pre>\n<p><a href=\"/\">Back to all solutions</a></p>\n</body>\n</html>\n",
        h = handlebars::html_escape(heading),
        m = handlebars::html_escape(message),
    ))
}
