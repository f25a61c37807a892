//! Safe rendering of traced markup.
//!
//! Markup coming back from a tracer is never embedded as-is: it is first run
//! through [`sanitize_svg`], then embedded inertly as an image data URL.

use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};

use log::warn;

use crate::metrics::Metrics;
use crate::preset::Preset;
use crate::source::SourceImage;
use crate::StudioResult;

/// Elements removed together with their whole subtree.
const BLOCKED_ELEMENTS: [&str; 6] = ["script", "foreignobject", "iframe", "object", "embed", "handler"];
/// Attributes whose values may hold a URL, including animation targets.
const URL_ATTRIBUTES: [&str; 7] = ["href", "src", "style", "to", "from", "by", "values"];
/// URL schemes that execute or render active content.
const BLOCKED_SCHEMES: [&str; 3] = ["javascript:", "vbscript:", "data:text/html"];

const SOURCE_PLACEHOLDER: &str = "Upload an image to begin.";
const OUTPUT_PLACEHOLDER: &str = "SVG preview appears here.";

/// Strip executable content from SVG markup.
pub fn sanitize_svg(markup: &str) -> StudioResult<String> {
    let mut reader = Reader::from_str(markup);
    let mut writer = Writer::new(Vec::new());
    let mut skip_depth = 0usize;

    loop {
        let event = reader.read_event()?;
        if skip_depth > 0 {
            match event {
                Event::Start(_) => skip_depth += 1,
                Event::End(_) => skip_depth -= 1,
                Event::Eof => break,
                _ => {}
            }
            continue;
        }

        match event {
            Event::Start(start) => {
                if is_blocked(&start) {
                    skip_depth = 1;
                } else {
                    writer.write_event(Event::Start(clean_attributes(&start)?))?;
                }
            }
            Event::Empty(start) => {
                if !is_blocked(&start) {
                    writer.write_event(Event::Empty(clean_attributes(&start)?))?;
                }
            }
            // Entity declarations and processing instructions have no place in a preview.
            Event::DocType(_) | Event::PI(_) => {}
            Event::Eof => break,
            other => writer.write_event(other)?,
        }
    }

    Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
}

fn is_blocked(start: &BytesStart) -> bool {
    let name = String::from_utf8_lossy(start.local_name().as_ref()).to_ascii_lowercase();
    BLOCKED_ELEMENTS.contains(&name.as_str())
}

fn clean_attributes(start: &BytesStart) -> StudioResult<BytesStart<'static>> {
    let mut clean = start.to_owned();
    clean.clear_attributes();
    for attr in start.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).to_ascii_lowercase();
        if key.starts_with("on") {
            continue;
        }
        if URL_ATTRIBUTES.contains(&key.as_str()) {
            let unsafe_value = attr
                .unescape_value()
                .map(|value| references_active_content(&value))
                .unwrap_or(true);
            if unsafe_value {
                continue;
            }
        }
        clean.push_attribute(attr);
    }
    Ok(clean)
}

fn references_active_content(value: &str) -> bool {
    let compact: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();
    BLOCKED_SCHEMES.iter().any(|scheme| compact.contains(scheme))
}

/// Inert embedding of markup as `data:image/svg+xml;base64,...`.
pub fn svg_data_url(markup: &str) -> String {
    format!(
        "data:image/svg+xml;base64,{}",
        BASE64_STANDARD.encode(markup.as_bytes())
    )
}

/// Everything needed to draw the two preview panes and the metrics line.
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    pub preset: Preset,
    pub source_data_url: Option<String>,
    /// Sanitized output markup, if any.
    pub svg_markup: Option<String>,
    pub metrics: Option<Metrics>,
    pub error: Option<String>,
}

impl Preview {
    /// Build both panes. Markup that cannot be sanitized leaves the output pane
    /// empty and is reported through `error`.
    pub fn new(
        preset: Preset,
        source: Option<&SourceImage>,
        markup: &str,
        mut error: Option<String>,
    ) -> Self {
        let svg_markup = if markup.is_empty() {
            None
        } else {
            match sanitize_svg(markup) {
                Ok(clean) => Some(clean),
                Err(err) => {
                    warn!("Output preview unavailable: {err}");
                    let message = format!("Output preview unavailable: {err}");
                    error = Some(match error {
                        Some(earlier) => format!("{earlier}; {message}"),
                        None => message,
                    });
                    None
                }
            }
        };
        Self {
            preset,
            source_data_url: source.map(|s| s.data_url().to_string()),
            svg_markup,
            metrics: Metrics::of(markup),
            error,
        }
    }

    /// Render a self-contained HTML page with both panes.
    pub fn to_html(&self) -> String {
        let original = match &self.source_data_url {
            Some(url) => format!(
                r#"<img src="{}" alt="Uploaded source logo">"#,
                escape(url.as_str())
            ),
            None => format!("<span>{SOURCE_PLACEHOLDER}</span>"),
        };
        let output = match &self.svg_markup {
            Some(markup) => format!(
                r#"<img src="{}" alt="Vector output">"#,
                svg_data_url(markup)
            ),
            None => format!("<span>{OUTPUT_PLACEHOLDER}</span>"),
        };
        let metrics = self
            .metrics
            .map(|m| format!("\n  <p class=\"metrics\">Output: {}</p>", escape(m.to_string().as_str())))
            .unwrap_or_default();
        let error = self
            .error
            .as_deref()
            .map(|e| format!("\n  <p class=\"error\">{}</p>", escape(e)))
            .unwrap_or_default();

        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Logo Vectorizer</title>
</head>
<body>
  <p class="tip">{preset}: {hint}</p>
  <div class="preview-columns">
    <div>
      <h2 class="preview-title">Original</h2>
      <div class="preview-panel">{original}</div>
    </div>
    <div>
      <h2 class="preview-title">Vector output</h2>
      <div class="preview-panel">{output}</div>
    </div>
  </div>{metrics}{error}
</body>
</html>
"#,
            preset = escape(self.preset.label()),
            hint = escape(self.preset.hint()),
        )
    }
}
