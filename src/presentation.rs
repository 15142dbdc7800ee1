//! Server-side HTML for the upload form flow.
//!
//! Quick scans render as a metrics card; markdown results are rendered with
//! pulldown-cmark. Raw HTML coming back from a model is shown as text.

use pulldown_cmark::{html, Event, Options, Parser};

use crate::models::{AnalysisResult, AnalysisType, MarkdownResult, QuickScanResult};

pub const INDEX_HTML: &str = include_str!("../static/index.html");

const STYLE: &str = "body{font-family:system-ui,sans-serif;background:#f5f7fb;color:#1f2937;margin:0;padding:2rem}\
main{max-width:720px;margin:0 auto;background:#fff;border-radius:16px;padding:2rem;box-shadow:0 1px 3px rgba(0,0,0,.08)}\
.metrics{display:grid;grid-template-columns:1fr 1fr;gap:2rem}\
.label{font-size:.85rem;color:#6b7280;margin:0}\
.value{font-size:2rem;font-weight:700;margin:.25rem 0}\
.bar{height:8px;background:#eef0f4;border-radius:4px;overflow:hidden}\
.bar>div{height:100%;background:linear-gradient(90deg,#3b82f6,#6366f1)}\
.error{color:#b91c1c}";

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    // writing into a String cannot fail
    let _ = pulldown_cmark_escape::escape_html(&mut out, text);
    out
}

/// Confidence as a whole percentage, clamped to 0..=100
pub fn confidence_percent(confidence: f64) -> u32 {
    (confidence.clamp(0.0, 1.0) * 100.0).round() as u32
}

pub fn markdown_to_html(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });

    let mut out = String::new();
    html::push_html(&mut out, parser);
    out
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{}</title>\n<style>{}</style>\n</head>\n<body>\n<main>\n{}\n\
         <p><a href=\"/\">&larr; Analyze another photo</a></p>\n</main>\n</body>\n</html>\n",
        escape_html(title),
        STYLE,
        body
    )
}

fn render_metrics(result: &QuickScanResult) -> String {
    let percent = confidence_percent(result.confidence);
    format!(
        "<h1>{name}</h1>\n\
         <div class=\"metrics\">\n\
         <div><p class=\"label\">Calories</p><p class=\"value\">{calories} <small>kcal</small></p></div>\n\
         <div><p class=\"label\">Serving Size</p><p class=\"value\">{serving}</p></div>\n\
         </div>\n\
         <p class=\"label\">Confidence Score <strong>{percent}%</strong></p>\n\
         <div class=\"bar\"><div style=\"width:{percent}%\"></div></div>",
        name = escape_html(&result.food_name),
        calories = result.calories,
        serving = escape_html(&result.serving_size),
        percent = percent,
    )
}

fn render_markdown(result: &MarkdownResult) -> String {
    format!(
        "<article class=\"markdown\">\n{}</article>\n<p class=\"label\">Confidence Score <strong>{}%</strong></p>",
        markdown_to_html(&result.markdown),
        confidence_percent(result.confidence)
    )
}

/// Full result page for one analysis
pub fn render_result(kind: AnalysisType, result: &AnalysisResult) -> String {
    let body = match result {
        AnalysisResult::Quick(metrics) => render_metrics(metrics),
        AnalysisResult::Markdown(markdown) => render_markdown(markdown),
    };
    page(&kind.to_string(), &body)
}

pub fn render_error(message: &str) -> String {
    page(
        "Analysis failed",
        &format!("<h1>Analysis failed</h1>\n<p class=\"error\">{}</p>", escape_html(message)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<b>\"Fish\" & Chips</b>"), "&lt;b&gt;&quot;Fish&quot; &amp; Chips&lt;/b&gt;");
    }

    #[test]
    fn test_confidence_percent() {
        assert_eq!(confidence_percent(0.85), 85);
        assert_eq!(confidence_percent(0.5), 50);
        assert_eq!(confidence_percent(1.7), 100);
        assert_eq!(confidence_percent(-0.2), 0);
    }

    #[test]
    fn test_quick_result_renders_metrics() {
        let result = AnalysisResult::Quick(QuickScanResult {
            food_name: "Grilled <chicken>".to_string(),
            calories: 165,
            serving_size: "100g (estimated)".to_string(),
            confidence: 0.85,
        });

        let html = render_result(AnalysisType::Quick, &result);

        assert!(html.contains("<title>Quick Scan</title>"));
        assert!(html.contains("Grilled &lt;chicken&gt;"));
        assert!(html.contains("165 <small>kcal</small>"));
        assert!(html.contains("100g (estimated)"));
        assert!(html.contains("width:85%"));
        assert!(!html.contains("<article"));
    }

    #[test]
    fn test_markdown_result_renders_markdown() {
        let result = AnalysisResult::Markdown(MarkdownResult {
            markdown: "# Pasta\n## Nutritional Information\n- Calories: 400 kcal\n".to_string(),
            confidence: 0.95,
        });

        let html = render_result(AnalysisType::Detailed, &result);

        assert!(html.contains("<h1>Pasta</h1>"));
        assert!(html.contains("<h2>Nutritional Information</h2>"));
        assert!(html.contains("<li>Calories: 400 kcal</li>"));
        assert!(html.contains("<strong>95%</strong>"));
        assert!(!html.contains("class=\"metrics\""));
    }

    #[test]
    fn test_model_html_is_not_passed_through() {
        let html = markdown_to_html("# Soup\n\n<script>alert(1)</script>\n");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_render_error_escapes_message() {
        let html = render_error("Image <missing>");
        assert!(html.contains("Image &lt;missing&gt;"));
    }
}
