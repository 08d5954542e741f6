//! Rich-text fields as delivered by the content API
//!
//! A field arrives either as a plain string or as a sequence of structured
//! blocks. [`RichField`] is the only place that distinguishes the two, so
//! every fetch path normalizes through the same conversion.

use serde::{Deserialize, Serialize};

use crate::helpers::html_escape;

/// A rich-text field: plain string or block sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RichField {
    Plain(String),
    Blocks(Vec<Block>),
}

impl Default for RichField {
    fn default() -> Self {
        RichField::Blocks(Vec::new())
    }
}

impl From<&str> for RichField {
    fn from(s: &str) -> Self {
        RichField::Plain(s.to_string())
    }
}

impl RichField {
    /// Plain-text rendition (titles, authors, headings)
    pub fn as_text(&self) -> String {
        match self {
            RichField::Plain(s) => s.clone(),
            RichField::Blocks(blocks) => as_text(blocks),
        }
    }

    /// HTML rendition (body content). Plain strings are taken as HTML already.
    pub fn as_html(&self) -> String {
        match self {
            RichField::Plain(s) => s.clone(),
            RichField::Blocks(blocks) => as_html(blocks),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            RichField::Plain(s) => s.trim().is_empty(),
            RichField::Blocks(blocks) => blocks.is_empty(),
        }
    }
}

/// One block of a rich-text sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Block {
    #[serde(rename = "paragraph")]
    Paragraph(TextBlock),
    #[serde(rename = "heading1")]
    Heading1(TextBlock),
    #[serde(rename = "heading2")]
    Heading2(TextBlock),
    #[serde(rename = "heading3")]
    Heading3(TextBlock),
    #[serde(rename = "heading4")]
    Heading4(TextBlock),
    #[serde(rename = "heading5")]
    Heading5(TextBlock),
    #[serde(rename = "heading6")]
    Heading6(TextBlock),
    #[serde(rename = "preformatted")]
    Preformatted(TextBlock),
    #[serde(rename = "list-item")]
    ListItem(TextBlock),
    #[serde(rename = "o-list-item")]
    OrderedListItem(TextBlock),
    #[serde(rename = "image")]
    Image(ImageBlock),
    #[serde(rename = "embed")]
    Embed(EmbedBlock),
    #[serde(other)]
    Unknown,
}

impl Block {
    /// Text carried by the block, if any
    pub fn text_block(&self) -> Option<&TextBlock> {
        match self {
            Block::Paragraph(t)
            | Block::Heading1(t)
            | Block::Heading2(t)
            | Block::Heading3(t)
            | Block::Heading4(t)
            | Block::Heading5(t)
            | Block::Heading6(t)
            | Block::Preformatted(t)
            | Block::ListItem(t)
            | Block::OrderedListItem(t) => Some(t),
            Block::Image(_) | Block::Embed(_) | Block::Unknown => None,
        }
    }

    pub fn paragraph(text: &str) -> Self {
        Block::Paragraph(TextBlock::new(text))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub spans: Vec<Span>,
}

impl TextBlock {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            spans: Vec::new(),
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.spans.push(span);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageBlock {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub alt: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmbedBlock {
    #[serde(default)]
    pub oembed: Oembed,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Oembed {
    #[serde(default)]
    pub embed_url: Option<String>,
    #[serde(default)]
    pub html: Option<String>,
}

/// Inline formatting over a character range of a text block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub data: Option<SpanData>,
}

impl Span {
    pub fn new(kind: &str, start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            kind: kind.to_string(),
            data: None,
        }
    }

    pub fn link(start: usize, end: usize, url: &str) -> Self {
        Self {
            data: Some(SpanData {
                url: Some(url.to_string()),
                ..SpanData::default()
            }),
            ..Self::new("hyperlink", start, end)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpanData {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
}

/// Join the text of every text-bearing block with a single space
pub fn as_text(blocks: &[Block]) -> String {
    blocks
        .iter()
        .filter_map(Block::text_block)
        .map(|b| b.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Convert a block sequence to HTML
pub fn as_html(blocks: &[Block]) -> String {
    let mut out = String::new();
    // Open list element, if consecutive list items are being grouped
    let mut open_list: Option<&'static str> = None;

    for block in blocks {
        let list_tag = match block {
            Block::ListItem(_) => Some("ul"),
            Block::OrderedListItem(_) => Some("ol"),
            _ => None,
        };

        if open_list != list_tag {
            if let Some(tag) = open_list {
                out.push_str(&format!("</{}>", tag));
            }
            if let Some(tag) = list_tag {
                out.push_str(&format!("<{}>", tag));
            }
            open_list = list_tag;
        }

        match block {
            Block::Paragraph(t) => wrap(&mut out, "p", t),
            Block::Heading1(t) => wrap(&mut out, "h1", t),
            Block::Heading2(t) => wrap(&mut out, "h2", t),
            Block::Heading3(t) => wrap(&mut out, "h3", t),
            Block::Heading4(t) => wrap(&mut out, "h4", t),
            Block::Heading5(t) => wrap(&mut out, "h5", t),
            Block::Heading6(t) => wrap(&mut out, "h6", t),
            Block::Preformatted(t) => wrap(&mut out, "pre", t),
            Block::ListItem(t) | Block::OrderedListItem(t) => wrap(&mut out, "li", t),
            Block::Image(img) => {
                out.push_str(&format!(
                    r#"<p class="block-img"><img src="{}" alt="{}" /></p>"#,
                    html_escape(&img.url),
                    html_escape(img.alt.as_deref().unwrap_or(""))
                ));
            }
            Block::Embed(embed) => {
                out.push_str(&format!(
                    r#"<div data-oembed="{}">{}</div>"#,
                    html_escape(embed.oembed.embed_url.as_deref().unwrap_or("")),
                    embed.oembed.html.as_deref().unwrap_or("")
                ));
            }
            Block::Unknown => {}
        }
    }

    if let Some(tag) = open_list {
        out.push_str(&format!("</{}>", tag));
    }

    out
}

fn wrap(out: &mut String, tag: &str, block: &TextBlock) {
    out.push_str(&format!("<{}>", tag));
    out.push_str(&render_text(block));
    out.push_str(&format!("</{}>", tag));
}

/// Render a text block with its spans applied
fn render_text(block: &TextBlock) -> String {
    let chars: Vec<char> = block.text.chars().collect();
    let mut spans: Vec<&Span> = block
        .spans
        .iter()
        .filter(|s| s.start < s.end && s.start < chars.len())
        .collect();
    // Outer spans first: earlier start, then longer range
    spans.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));
    render_range(&chars, &spans, 0, chars.len())
}

fn render_range(chars: &[char], spans: &[&Span], start: usize, end: usize) -> String {
    let mut out = String::new();
    let mut pos = start;
    let mut i = 0;

    while i < spans.len() {
        let span = spans[i];
        let span_start = span.start.clamp(pos, end);
        let span_end = span.end.clamp(span_start, end);

        // Spans nested inside this one
        let mut j = i + 1;
        while j < spans.len() && spans[j].start < span_end && spans[j].end <= span.end {
            j += 1;
        }

        if span_start < span_end {
            out.push_str(&escape_chars(&chars[pos..span_start]));
            let (open, close) = span_tags(span);
            out.push_str(&open);
            out.push_str(&render_range(chars, &spans[i + 1..j], span_start, span_end));
            out.push_str(close);
            pos = span_end;
        }
        i = j;
    }

    out.push_str(&escape_chars(&chars[pos..end]));
    out
}

fn span_tags(span: &Span) -> (String, &'static str) {
    let data = span.data.as_ref();
    match span.kind.as_str() {
        "strong" => ("<strong>".to_string(), "</strong>"),
        "em" => ("<em>".to_string(), "</em>"),
        "hyperlink" => {
            let url = data.and_then(|d| d.url.as_deref()).unwrap_or("");
            let open = match data.and_then(|d| d.target.as_deref()) {
                Some(target) => format!(
                    r#"<a href="{}" target="{}" rel="noopener">"#,
                    html_escape(url),
                    html_escape(target)
                ),
                None => format!(r#"<a href="{}">"#, html_escape(url)),
            };
            (open, "</a>")
        }
        "label" => {
            let label = data.and_then(|d| d.label.as_deref()).unwrap_or("");
            (format!(r#"<span class="{}">"#, html_escape(label)), "</span>")
        }
        _ => (String::new(), ""),
    }
}

fn escape_chars(chars: &[char]) -> String {
    let text: String = chars.iter().collect();
    html_escape(&text).replace('\n', "<br />")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn field(value: serde_json::Value) -> RichField {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_plain_string_passes_through() {
        let f = field(json!("Como utilizar Hooks"));
        assert_eq!(f, RichField::Plain("Como utilizar Hooks".to_string()));
        assert_eq!(f.as_text(), "Como utilizar Hooks");
        assert_eq!(f.as_html(), "Como utilizar Hooks");

        let html = field(json!("<p>already <b>html</b></p>"));
        assert_eq!(html.as_html(), "<p>already <b>html</b></p>");
    }

    #[test]
    fn test_blocks_as_text() {
        let f = field(json!([
            {"type": "heading1", "text": "Criando um app", "spans": []},
            {"type": "image", "url": "https://images.example/a.png"},
            {"type": "paragraph", "text": "do zero", "spans": [{"start": 0, "end": 2, "type": "strong"}]}
        ]));
        let text = f.as_text();
        assert_eq!(text, "Criando um app do zero");
        assert!(!text.contains('{'));
        assert!(!text.contains("spans"));
    }

    #[test]
    fn test_unknown_block_is_tolerated() {
        let f = field(json!([
            {"type": "table", "rows": []},
            {"type": "paragraph", "text": "ok"}
        ]));
        assert_eq!(f.as_text(), "ok");
        assert_eq!(f.as_html(), "<p>ok</p>");
    }

    #[test]
    fn test_as_html_blocks_and_lists() {
        let blocks = vec![
            Block::Heading2(TextBlock::new("Title")),
            Block::ListItem(TextBlock::new("one")),
            Block::ListItem(TextBlock::new("two")),
            Block::OrderedListItem(TextBlock::new("first")),
            Block::paragraph("end"),
        ];
        assert_eq!(
            as_html(&blocks),
            "<h2>Title</h2><ul><li>one</li><li>two</li></ul><ol><li>first</li></ol><p>end</p>"
        );
    }

    #[test]
    fn test_as_html_escapes_and_breaks_lines() {
        let blocks = vec![Block::paragraph("a < b\nc & d")];
        assert_eq!(as_html(&blocks), "<p>a &lt; b<br />c &amp; d</p>");
    }

    #[test]
    fn test_spans_nest() {
        let block = TextBlock::new("Hello brave world")
            .with_span(Span::new("em", 6, 11))
            .with_span(Span::new("strong", 0, 11));
        assert_eq!(
            as_html(&[Block::Paragraph(block)]),
            "<p><strong>Hello <em>brave</em></strong> world</p>"
        );
    }

    #[test]
    fn test_hyperlink_and_label_spans() {
        let block = TextBlock::new("see docs here")
            .with_span(Span::link(4, 8, "https://example.com/?a=1&b=2"))
            .with_span(Span {
                data: Some(SpanData {
                    label: Some("code".to_string()),
                    ..SpanData::default()
                }),
                ..Span::new("label", 9, 13)
            });
        assert_eq!(
            as_html(&[Block::Paragraph(block)]),
            r#"<p>see <a href="https://example.com/?a=1&amp;b=2">docs</a> <span class="code">here</span></p>"#
        );
    }

    #[test]
    fn test_overlapping_spans_are_clamped() {
        let block = TextBlock::new("abcdef")
            .with_span(Span::new("strong", 0, 4))
            .with_span(Span::new("em", 2, 6));
        assert_eq!(
            as_html(&[Block::Paragraph(block)]),
            "<p><strong>abcd</strong><em>ef</em></p>"
        );
    }

    #[test]
    fn test_spans_use_character_offsets() {
        let block = TextBlock::new("ação rápida").with_span(Span::new("strong", 5, 11));
        assert_eq!(
            as_html(&[Block::Paragraph(block)]),
            "<p>ação <strong>rápida</strong></p>"
        );
    }

    #[test]
    fn test_image_and_embed() {
        let f = field(json!([
            {"type": "image", "url": "https://img/x.png", "alt": "x"},
            {"type": "embed", "oembed": {"embed_url": "https://youtu.be/1", "html": "<iframe></iframe>"}}
        ]));
        assert_eq!(
            f.as_html(),
            r#"<p class="block-img"><img src="https://img/x.png" alt="x" /></p><div data-oembed="https://youtu.be/1"><iframe></iframe></div>"#
        );
        assert_eq!(f.as_text(), "");
    }

    #[test]
    fn test_missing_field_defaults_to_empty() {
        let f = RichField::default();
        assert!(f.is_empty());
        assert_eq!(f.as_text(), "");
        assert_eq!(f.as_html(), "");
    }
}
