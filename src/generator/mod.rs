//! Generator module - renders the home page and every post into the public directory

use anyhow::{Context as _, Result};
use std::fs;
use std::path::PathBuf;

use crate::content::{ContentSource, Cursor, Document, Normalizer};
use crate::pages::{detail, DetailView, Listing};
use crate::templates::{TemplateRenderer, LOGO, STYLESHEET};
use crate::Blog;

/// What a generation run produced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerateStats {
    pub posts: usize,
    pub skipped: usize,
}

/// Static site generator
pub struct Generator {
    blog: Blog,
    renderer: TemplateRenderer,
    normalizer: Normalizer,
}

impl Generator {
    /// Create a new generator
    pub fn new(blog: &Blog) -> Result<Self> {
        let renderer = TemplateRenderer::new(&blog.config)?;
        let normalizer = Normalizer::from_config(&blog.config);

        Ok(Self {
            blog: blog.clone(),
            renderer,
            normalizer,
        })
    }

    pub fn renderer(&self) -> &TemplateRenderer {
        &self.renderer
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Generate the entire site
    pub async fn generate<S>(&self, source: &S) -> Result<GenerateStats>
    where
        S: ContentSource + ?Sized,
    {
        fs::create_dir_all(&self.blog.public_dir)?;
        self.write_assets()?;

        self.generate_home(source)
            .await
            .context("Failed to generate the home page")?;
        let stats = self.generate_post_pages(source).await?;

        tracing::info!(
            "Generated {} post pages ({} skipped)",
            stats.posts,
            stats.skipped
        );
        Ok(stats)
    }

    /// Home page with the first page of posts; returns the rendered HTML
    pub async fn generate_home<S>(&self, source: &S) -> crate::error::Result<String>
    where
        S: ContentSource + ?Sized,
    {
        let config = &self.blog.config;
        let response = source.query(&config.document_type, config.page_size).await?;
        let listing = Listing::from_response(&self.normalizer, response);

        let html = self.renderer.render_home(&listing)?;
        let output_path = self.blog.public_dir.join("index.html");
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&output_path, &html)?;
        tracing::debug!("Generated: {:?}", output_path);

        Ok(html)
    }

    /// One page per post, walking every page of the query
    async fn generate_post_pages<S>(&self, source: &S) -> Result<GenerateStats>
    where
        S: ContentSource + ?Sized,
    {
        let config = &self.blog.config;
        let mut stats = GenerateStats::default();
        let mut response = source
            .query(&config.document_type, config.paths_page_size)
            .await
            .context("Failed to list posts")?;

        loop {
            for doc in &response.results {
                if self.generate_document(doc)? {
                    stats.posts += 1;
                } else {
                    stats.skipped += 1;
                }
            }

            match Cursor::from_next_page(response.next_page.take()) {
                Some(cursor) => {
                    response = source
                        .fetch_page(&cursor)
                        .await
                        .with_context(|| format!("Failed to fetch {}", cursor))?;
                }
                None => break,
            }
        }

        Ok(stats)
    }

    /// Render one document; returns false when it cannot be shown as a post
    fn generate_document(&self, doc: &Document) -> Result<bool> {
        let uid = doc.uid.clone().unwrap_or_default();
        if !detail::is_valid_slug(&uid) {
            tracing::warn!("Skipping document {} with unusable uid {:?}", doc.id, uid);
            return Ok(false);
        }

        match self.normalizer.post(doc) {
            Ok(post) => {
                let view = DetailView::found(post, self.blog.config.words_per_minute);
                self.write_post(&uid, &view)?;
                Ok(true)
            }
            Err(e) => {
                tracing::warn!("Skipping post {}: {}", uid, e);
                Ok(false)
            }
        }
    }

    /// Resolve a single post at request time and keep the result on disk
    pub async fn generate_post<S>(&self, source: &S, slug: &str) -> crate::error::Result<DetailView>
    where
        S: ContentSource + ?Sized,
    {
        let config = &self.blog.config;
        let view = detail::resolve(
            source,
            &self.normalizer,
            &config.document_type,
            slug,
            config.words_per_minute,
        )
        .await?;

        if let DetailView::Found { .. } = view {
            if let Err(e) = self.write_post(slug, &view) {
                tracing::warn!("Failed to store generated post {}: {}", slug, e);
            }
        }
        Ok(view)
    }

    /// Where the page for `slug` lives
    pub fn post_output_path(&self, slug: &str) -> PathBuf {
        self.blog
            .public_dir
            .join("post")
            .join(slug)
            .join("index.html")
    }

    fn write_post(&self, slug: &str, view: &DetailView) -> Result<()> {
        let html = self.renderer.render_detail(view)?;
        let output_path = self.post_output_path(slug);
        write_file(&output_path, &html)?;
        tracing::debug!("Generated post: {:?}", output_path);
        Ok(())
    }

    fn write_assets(&self) -> Result<()> {
        write_file(&self.blog.public_dir.join("style.css"), STYLESHEET)?;
        write_file(&self.blog.public_dir.join("images/logo.svg"), LOGO)?;
        Ok(())
    }
}

fn write_file(path: &std::path::Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| anyhow::anyhow!("Failed to create dir {:?}: {}", parent, e))?;
    }
    fs::write(path, contents).map_err(|e| anyhow::anyhow!("Failed to write {:?}: {}", path, e))?;
    Ok(())
}
