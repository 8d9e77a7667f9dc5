//! Renders an unsaved card draft to HTML.
//!
//! Pure function of its input. Every user value is escaped; fenced blocks in
//! the answer become `<pre><code>` with a `language-*` class.

use serde::{Deserialize, Serialize};

use crate::constants::catalog::CODE_FENCE;
use crate::models::card::answer_has_code;

const UNCATEGORIZED: &str = "Uncategorized";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PreviewRequest {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Preview {
    pub html: String,
    pub has_code: bool,
}

#[must_use]
pub fn render_preview(draft: &PreviewRequest) -> Preview {
    let category = draft.category.trim();
    let category = if category.is_empty() {
        UNCATEGORIZED
    } else {
        category
    };

    let mut html = String::from("<article class=\"card-preview\">");
    html.push_str("<h2 class=\"question\">");
    html.push_str(&html_escape::encode_text(draft.question.trim()));
    html.push_str("</h2><p class=\"category\">");
    html.push_str(&html_escape::encode_text(category));
    html.push_str("</p>");

    let tags: Vec<&str> = draft
        .tags
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .collect();
    if !tags.is_empty() {
        html.push_str("<ul class=\"tags\">");
        for tag in tags {
            html.push_str("<li>");
            html.push_str(&html_escape::encode_text(tag));
            html.push_str("</li>");
        }
        html.push_str("</ul>");
    }

    html.push_str("<div class=\"answer\">");
    render_answer(&draft.answer, &mut html);
    html.push_str("</div></article>");

    Preview {
        html,
        has_code: answer_has_code(&draft.answer),
    }
}

/// Alternates text and fenced segments. An unterminated fence runs to the end.
fn render_answer(answer: &str, out: &mut String) {
    let mut rest = answer;

    while let Some(start) = rest.find(CODE_FENCE) {
        push_text(&rest[..start], out);

        let after_fence = &rest[start + CODE_FENCE.len()..];
        let (info, body_start) = match after_fence.find('\n') {
            Some(nl) => (after_fence[..nl].trim(), &after_fence[nl + 1..]),
            None => (after_fence.trim(), ""),
        };

        let (code, remainder) = match body_start.find(CODE_FENCE) {
            Some(end) => (&body_start[..end], &body_start[end + CODE_FENCE.len()..]),
            None => (body_start, ""),
        };

        let language = info.split_whitespace().next().unwrap_or_default();
        if language.is_empty() {
            out.push_str("<pre><code>");
        } else {
            out.push_str("<pre><code class=\"language-");
            out.push_str(&html_escape::encode_double_quoted_attribute(language));
            out.push_str("\">");
        }
        out.push_str(&html_escape::encode_text(code.trim_end_matches('\n')));
        out.push_str("</code></pre>");

        rest = remainder;
    }

    push_text(rest, out);
}

fn push_text(text: &str, out: &mut String) {
    for paragraph in text.split("\n\n").map(str::trim).filter(|p| !p.is_empty()) {
        out.push_str("<p>");
        out.push_str(&html_escape::encode_text(paragraph).replace('\n', "<br>"));
        out.push_str("</p>");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(question: &str, answer: &str, category: &str) -> PreviewRequest {
        PreviewRequest {
            question: question.to_string(),
            answer: answer.to_string(),
            category: category.to_string(),
            tags: vec![],
        }
    }

    #[test]
    fn test_values_are_escaped() {
        let preview = render_preview(&PreviewRequest {
            tags: vec!["<b>".to_string()],
            ..draft("<script>alert(1)</script>", "a & b", "x\"y")
        });

        assert!(!preview.html.contains("<script>"));
        assert!(preview.html.contains("&lt;script&gt;"));
        assert!(preview.html.contains("a &amp; b"));
        assert!(preview.html.contains("<li>&lt;b&gt;</li>"));
        assert!(!preview.has_code);
    }

    #[test]
    fn test_empty_category_is_uncategorized() {
        let preview = render_preview(&draft("Q", "A", "   "));
        assert!(preview.html.contains("<p class=\"category\">Uncategorized</p>"));
    }

    #[test]
    fn test_fenced_code_block() {
        let answer = "Use this:\n```rust\nlet v = vec![1 < 2];\n```\nDone.";
        let preview = render_preview(&draft("Q", answer, "Rust"));

        assert!(preview.has_code);
        assert!(
            preview
                .html
                .contains("<pre><code class=\"language-rust\">let v = vec![1 &lt; 2];</code></pre>"),
            "{}",
            preview.html
        );
        assert!(preview.html.contains("<p>Use this:</p>"));
        assert!(preview.html.contains("<p>Done.</p>"));
    }

    #[test]
    fn test_unterminated_fence_runs_to_end() {
        let preview = render_preview(&draft("Q", "```\nfn main() {}", "c"));
        assert!(preview.html.contains("<pre><code>fn main() {}</code></pre>"));
    }
}
