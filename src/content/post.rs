//! Display-ready posts and the normalizer that produces them

use chrono::Locale;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::document::Document;
use crate::config::SiteConfig;
use crate::error::{BlogError, Result};
use crate::helpers::{count_words, format_publication_date};

/// A post as shown in the listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostSummary {
    pub uid: String,
    pub first_publication_date: String,
    pub data: SummaryData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryData {
    pub title: String,
    pub subtitle: String,
    pub author: String,
}

/// A post as shown on its own page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub uid: String,
    pub first_publication_date: String,
    pub data: PostData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostData {
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub banner: Banner,
    pub content: Vec<Section>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Banner {
    pub url: String,
    pub alt: String,
}

/// A content section: plain-text heading and HTML body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub heading: String,
    pub body: String,
}

impl Post {
    /// Words across every section body, markup excluded
    pub fn word_count(&self) -> usize {
        self.data
            .content
            .iter()
            .map(|section| count_words(&section.body))
            .sum()
    }
}

/// Converts raw documents into display-ready posts
#[derive(Debug, Clone)]
pub struct Normalizer {
    tz: Tz,
    locale: Locale,
    date_format: String,
}

impl Normalizer {
    pub fn new(tz: Tz, locale: Locale, date_format: &str) -> Self {
        Self {
            tz,
            locale,
            date_format: date_format.to_string(),
        }
    }

    pub fn from_config(config: &SiteConfig) -> Self {
        Self::new(config.tz(), config.locale(), &config.date_format)
    }

    /// Normalize a document for the listing
    pub fn summary(&self, doc: &Document) -> Result<PostSummary> {
        let uid = require_uid(doc)?;
        Ok(PostSummary {
            uid,
            first_publication_date: self.publication_date(doc),
            data: SummaryData {
                title: doc.data.title.as_text(),
                subtitle: doc.data.subtitle.as_text(),
                author: doc.data.author.as_text(),
            },
        })
    }

    /// Normalize a document for its detail page
    pub fn post(&self, doc: &Document) -> Result<Post> {
        let uid = require_uid(doc)?;
        if doc.data.content.is_empty() {
            return Err(BlogError::InvalidDocument {
                uid,
                reason: "post has no content".to_string(),
            });
        }

        let banner = doc
            .data
            .banner
            .as_ref()
            .map(|b| Banner {
                url: b.url.clone().unwrap_or_default(),
                alt: b.alt.clone().unwrap_or_default(),
            })
            .unwrap_or_default();

        let content = doc
            .data
            .content
            .iter()
            .map(|section| Section {
                heading: section.heading.as_text(),
                body: section.body.as_html(),
            })
            .collect();

        Ok(Post {
            uid,
            first_publication_date: self.publication_date(doc),
            data: PostData {
                title: doc.data.title.as_text(),
                subtitle: doc.data.subtitle.as_text(),
                author: doc.data.author.as_text(),
                banner,
                content,
            },
        })
    }

    /// Normalize every document that can be listed, skipping the rest
    pub fn summaries(&self, docs: &[Document]) -> Vec<PostSummary> {
        docs.iter()
            .filter_map(|doc| match self.summary(doc) {
                Ok(summary) => Some(summary),
                Err(e) => {
                    tracing::warn!("Skipping document {}: {}", doc.id, e);
                    None
                }
            })
            .collect()
    }

    fn publication_date(&self, doc: &Document) -> String {
        doc.first_publication_date
            .as_deref()
            .or(doc.last_publication_date.as_deref())
            .and_then(|raw| {
                format_publication_date(raw, &self.tz, self.locale, &self.date_format)
            })
            .unwrap_or_default()
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::from_config(&SiteConfig::default())
    }
}

fn require_uid(doc: &Document) -> Result<String> {
    match doc.uid.as_deref().map(str::trim) {
        Some(uid) if !uid.is_empty() => Ok(uid.to_string()),
        _ => Err(BlogError::InvalidDocument {
            uid: doc.id.clone(),
            reason: "document has no uid".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: serde_json::Value) -> Document {
        serde_json::from_value(value).unwrap()
    }

    fn rich_doc() -> Document {
        doc(json!({
            "id": "1",
            "uid": "como-utilizar-hooks",
            "type": "posts",
            "first_publication_date": "2021-03-15T19:25:28+0000",
            "data": {
                "title": [{"type": "heading1", "text": "Como utilizar Hooks", "spans": []}],
                "subtitle": [{"type": "paragraph", "text": "Pensando em sincronização", "spans": []}],
                "author": [{"type": "paragraph", "text": "Joseph Oliveira", "spans": []}],
                "banner": {"url": "https://images.prismic.io/banner.png"},
                "content": [{
                    "heading": [{"type": "heading2", "text": "Proin et varius", "spans": []}],
                    "body": [{"type": "paragraph", "text": "Lorem ipsum dolor", "spans": [{"start": 0, "end": 5, "type": "strong"}]}]
                }]
            }
        }))
    }

    #[test]
    fn test_summary_from_blocks() {
        let summary = Normalizer::default().summary(&rich_doc()).unwrap();
        assert_eq!(summary.uid, "como-utilizar-hooks");
        assert_eq!(summary.first_publication_date, "15 de março de 2021");
        assert_eq!(summary.data.title, "Como utilizar Hooks");
        assert_eq!(summary.data.subtitle, "Pensando em sincronização");
        assert_eq!(summary.data.author, "Joseph Oliveira");
    }

    #[test]
    fn test_plain_strings_are_identity() {
        let d = doc(json!({
            "uid": "plain",
            "data": {
                "title": "[Título] com {chaves}",
                "subtitle": "Sub",
                "author": "Danilo",
                "content": [{"heading": "Head", "body": "<p>already html</p>"}]
            }
        }));
        let post = Normalizer::default().post(&d).unwrap();
        assert_eq!(post.data.title, "[Título] com {chaves}");
        assert_eq!(post.data.subtitle, "Sub");
        assert_eq!(post.data.author, "Danilo");
        assert_eq!(post.data.content[0].heading, "Head");
        assert_eq!(post.data.content[0].body, "<p>already html</p>");
    }

    #[test]
    fn test_post_from_blocks_has_no_node_markers() {
        let post = Normalizer::default().post(&rich_doc()).unwrap();
        assert_eq!(post.data.banner.url, "https://images.prismic.io/banner.png");
        assert_eq!(post.data.content[0].heading, "Proin et varius");
        assert_eq!(
            post.data.content[0].body,
            "<p><strong>Lorem</strong> ipsum dolor</p>"
        );
        for s in [&post.data.title, &post.data.author, &post.data.content[0].heading] {
            assert!(!s.contains("\"type\""));
            assert!(!s.contains("spans"));
            assert!(!s.starts_with('['));
        }
    }

    #[test]
    fn test_post_without_content_is_invalid() {
        let d = doc(json!({"uid": "empty", "data": {"title": "x", "content": []}}));
        assert!(matches!(
            Normalizer::default().post(&d),
            Err(BlogError::InvalidDocument { .. })
        ));
        // The listing does not need content
        assert!(Normalizer::default().summary(&d).is_ok());
    }

    #[test]
    fn test_document_without_uid_is_skipped() {
        let docs = vec![
            doc(json!({"id": "1", "data": {"title": "no uid"}})),
            doc(json!({"id": "2", "uid": "b", "data": {"title": "b"}})),
        ];
        let summaries = Normalizer::default().summaries(&docs);
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].uid, "b");
    }

    #[test]
    fn test_date_falls_back_and_tolerates_garbage() {
        let d = doc(json!({
            "uid": "a",
            "last_publication_date": "2021-03-25T19:25:28+0000",
            "data": {}
        }));
        assert_eq!(
            Normalizer::default().summary(&d).unwrap().first_publication_date,
            "25 de março de 2021"
        );

        let d = doc(json!({"uid": "a", "first_publication_date": "soon", "data": {}}));
        assert_eq!(
            Normalizer::default().summary(&d).unwrap().first_publication_date,
            ""
        );
    }

    #[test]
    fn test_word_count_strips_markup() {
        let d = doc(json!({
            "uid": "a",
            "data": {
                "content": [
                    {"heading": "ignored heading words", "body": "<p>one <a href=\"x y z\">two</a></p>"},
                    {"heading": "", "body": [{"type": "paragraph", "text": "three four", "spans": []}]}
                ]
            }
        }));
        let post = Normalizer::default().post(&d).unwrap();
        assert_eq!(post.word_count(), 4);
    }
}
