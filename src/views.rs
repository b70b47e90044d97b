//! HTML rendering for the form page

use std::fmt::Write;

use crate::features::{FeatureVector, FEATURE_COUNT, FEATURE_DEFAULTS, FEATURE_LAYOUT};
use crate::model::{ClassificationResult, Label};

/// Human-readable captions, in layout order
const FIELD_CAPTIONS: [&str; FEATURE_COUNT] = [
    "Followers",
    "Following",
    "Statuses",
    "Account age (days)",
    "Has profile picture (0/1)",
    "Default profile (0/1)",
    "Verified (0/1)",
    "Listed count",
];

/// Escape text for HTML body and attribute context
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render the index page
///
/// `values` pre-fills the inputs; `result` adds the verdict block; `flash`
/// is shown above the form.
pub fn render_index(
    values: Option<&FeatureVector>,
    result: Option<&ClassificationResult>,
    flash: Option<&str>,
) -> String {
    let mut html = String::with_capacity(4096);

    html.push_str(concat!(
        "<!doctype html>\n<html lang=\"en\">\n<head>\n",
        "<meta charset=\"utf-8\">\n",
        "<title>Fake Account Detector</title>\n",
        "</head>\n<body>\n",
        "<h1>Fake Account Detector</h1>\n",
    ));

    if let Some(message) = flash {
        let _ = writeln!(html, "<p class=\"flash\">{}</p>", escape_html(message));
    }

    html.push_str("<form method=\"post\" action=\"/\">\n");
    for (i, name) in FEATURE_LAYOUT.iter().enumerate() {
        let value = values
            .and_then(|v| v.get(i))
            .map(|v| v.to_string())
            .unwrap_or_default();
        let _ = writeln!(
            html,
            "<label for=\"{name}\">{caption}</label>\n<input type=\"text\" id=\"{name}\" name=\"{name}\" value=\"{value}\" placeholder=\"{default}\"><br>",
            name = name,
            caption = FIELD_CAPTIONS[i],
            value = escape_html(&value),
            default = FEATURE_DEFAULTS[i],
        );
    }
    html.push_str("<button type=\"submit\">Check account</button>\n</form>\n");

    if let Some(result) = result {
        let class = match result.label {
            Label::Fake => "fake",
            Label::Real => "real",
        };
        let _ = writeln!(
            html,
            "<div class=\"result {}\">\n<h2>Prediction: {}</h2>",
            class, result.label
        );
        if let Some(confidence) = result.confidence {
            let _ = writeln!(html, "<p>Probability fake: {:.1}%</p>", confidence * 100.0);
        }
        html.push_str("</div>\n");
    }

    html.push_str("</body>\n</html>\n");
    html
}
