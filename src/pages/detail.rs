//! Post detail page

use crate::content::{ContentSource, Normalizer, Post};
use crate::error::{BlogError, Result};

/// Minutes needed to read `words` words, rounded up. No words means no time.
pub fn reading_time(words: usize, words_per_minute: usize) -> usize {
    words.div_ceil(words_per_minute.max(1))
}

/// What the detail route shows for a slug
#[derive(Debug, Clone, PartialEq)]
pub enum DetailView {
    /// The post is still being fetched
    Loading,
    Found { post: Post, reading_time: usize },
    NotFound { slug: String },
}

impl DetailView {
    pub fn found(post: Post, words_per_minute: usize) -> Self {
        let minutes = reading_time(post.word_count(), words_per_minute);
        DetailView::Found {
            post,
            reading_time: minutes,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DetailView::NotFound { .. })
    }
}

/// Whether `slug` looks like a uid the content API could have issued
///
/// Lowercase ASCII letters, digits, `-` and `_` only, so a slug can never
/// name a path outside `public/post/`.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'_')
}

/// Fetch and normalize the post for `slug`
pub async fn fetch_post<S>(
    source: &S,
    normalizer: &Normalizer,
    document_type: &str,
    slug: &str,
) -> Result<Post>
where
    S: ContentSource + ?Sized,
{
    match source.get_by_uid(document_type, slug).await? {
        Some(doc) => normalizer.post(&doc),
        None => Err(BlogError::NotFound(slug.to_string())),
    }
}

/// Resolve what the detail route shows for `slug`
///
/// Missing documents and documents that cannot be shown as a post both
/// resolve to [`DetailView::NotFound`]; transport failures are errors.
pub async fn resolve<S>(
    source: &S,
    normalizer: &Normalizer,
    document_type: &str,
    slug: &str,
    words_per_minute: usize,
) -> Result<DetailView>
where
    S: ContentSource + ?Sized,
{
    if !is_valid_slug(slug) {
        tracing::debug!("Rejected slug {:?}", slug);
        return Ok(DetailView::NotFound {
            slug: slug.to_string(),
        });
    }

    match fetch_post(source, normalizer, document_type, slug).await {
        Ok(post) => Ok(DetailView::found(post, words_per_minute)),
        Err(e) if e.is_not_found() => {
            tracing::warn!("Cannot display {}: {}", slug, e);
            Ok(DetailView::NotFound {
                slug: slug.to_string(),
            })
        }
        Err(e) => Err(e),
    }
}
