//! Built-in theme templates using the Tera template engine
//!
//! Templates and static assets are embedded in the binary.

use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::config::SiteConfig;
use crate::content::PostSummary;
use crate::error::Result;
use crate::helpers::{strip_html, truncate};
use crate::pages::{DetailView, Listing};

/// Stylesheet served at `/style.css`
pub const STYLESHEET: &str = include_str!("theme/style.css");

/// Logo served at `/images/logo.svg`
pub const LOGO: &str = include_str!("theme/logo.svg");

/// Seconds the loading placeholder waits before asking again
const LOADING_REFRESH_SECS: u64 = 1;

/// Site values exposed to templates
///
/// Deliberately a separate type from [`SiteConfig`]: nothing here may carry
/// the access token or its variable name into rendered HTML.
#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub description: String,
    pub language: String,
}

impl From<&SiteConfig> for SiteData {
    fn from(config: &SiteConfig) -> Self {
        Self {
            title: config.title.clone(),
            description: config.description.clone(),
            language: config.language.clone(),
        }
    }
}

/// Template renderer with the embedded theme
pub struct TemplateRenderer {
    tera: Tera,
    site: SiteData,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new(config: &SiteConfig) -> Result<Self> {
        let mut tera = Tera::default();

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("theme/layout.html")),
            ("index.html", include_str!("theme/index.html")),
            ("post.html", include_str!("theme/post.html")),
            ("post_items.html", include_str!("theme/post_items.html")),
            ("loading.html", include_str!("theme/loading.html")),
            ("not_found.html", include_str!("theme/not_found.html")),
            // Partials
            (
                "partials/header.html",
                include_str!("theme/partials/header.html"),
            ),
            (
                "partials/post_item.html",
                include_str!("theme/partials/post_item.html"),
            ),
        ])?;

        tera.register_filter("excerpt", excerpt_filter);

        Ok(Self {
            tera,
            site: SiteData::from(config),
        })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }

    fn base_context(&self) -> Context {
        let mut context = Context::new();
        context.insert("site", &self.site);
        context.insert("version", env!("CARGO_PKG_VERSION"));
        context
    }

    /// Home page: the listing's posts and, while a cursor remains, the "load more" control
    pub fn render_home(&self, listing: &Listing) -> Result<String> {
        let mut context = self.base_context();
        context.insert("posts", listing.posts());
        context.insert("next_page", &listing.next_page().map(|c| c.encode()));
        self.render("index.html", &context)
    }

    /// List items appended by "load more"
    pub fn render_post_items(&self, posts: &[PostSummary]) -> Result<String> {
        let mut context = self.base_context();
        context.insert("posts", posts);
        self.render("post_items.html", &context)
    }

    /// Detail route, whatever state it is in
    pub fn render_detail(&self, view: &DetailView) -> Result<String> {
        let mut context = self.base_context();
        match view {
            DetailView::Loading => {
                context.insert("refresh_secs", &LOADING_REFRESH_SECS);
                self.render("loading.html", &context)
            }
            DetailView::Found { post, reading_time } => {
                context.insert("post", post);
                context.insert("reading_time", reading_time);
                self.render("post.html", &context)
            }
            DetailView::NotFound { slug } => {
                context.insert("slug", slug);
                self.render("not_found.html", &context)
            }
        }
    }
}

/// Tera filter: plain-text excerpt of HTML content
fn excerpt_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("excerpt", "value", String, value);
    let length = match args.get("length") {
        Some(val) => tera::try_get_value!("excerpt", "length", usize, val),
        None => 150,
    };
    let text = strip_html(&s).split_whitespace().collect::<Vec<_>>().join(" ");
    Ok(tera::Value::String(truncate(&text, length, None)))
}
