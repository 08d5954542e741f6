//! Site configuration (_config.yml)

use anyhow::Result;
use chrono::Locale;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub language: String,
    pub timezone: String,
    pub date_format: String,

    // Content API
    pub api_endpoint: String,
    pub document_type: String,
    /// Posts shown on the home page and fetched per "load more"
    pub page_size: usize,
    /// Batch size used when walking every post at build time
    pub paths_page_size: usize,
    /// Name of the environment variable holding the API access token
    pub access_token_env: String,

    // Rendering
    pub words_per_minute: usize,
    pub public_dir: String,
    /// How long a request for an ungenerated post waits before the placeholder is shown
    pub fallback_wait_ms: u64,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "spacetraveling".to_string(),
            description: String::new(),
            language: "pt-BR".to_string(),
            timezone: "America/Sao_Paulo".to_string(),
            date_format: "%d de %B de %Y".to_string(),

            api_endpoint: "https://spacetraveling.cdn.prismic.io/api/v2".to_string(),
            document_type: "posts".to_string(),
            page_size: 1,
            paths_page_size: 100,
            access_token_env: "PRISMIC_ACCESS_TOKEN".to_string(),

            words_per_minute: 200,
            public_dir: "public".to_string(),
            fallback_wait_ms: 500,

            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the renderers cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 || self.paths_page_size == 0 {
            anyhow::bail!("page_size and paths_page_size must be at least 1");
        }
        if self.words_per_minute == 0 {
            anyhow::bail!("words_per_minute must be at least 1");
        }
        if self.timezone.parse::<Tz>().is_err() {
            anyhow::bail!("unknown timezone: {}", self.timezone);
        }
        Ok(())
    }

    /// Timezone publication dates are displayed in
    pub fn tz(&self) -> Tz {
        self.timezone.parse().unwrap_or(chrono_tz::America::Sao_Paulo)
    }

    /// Locale used for month names
    pub fn locale(&self) -> Locale {
        match self.language.replace('-', "_").as_str() {
            "en" | "en_US" => Locale::en_US,
            "en_GB" => Locale::en_GB,
            "pt_PT" => Locale::pt_PT,
            "es" | "es_ES" => Locale::es_ES,
            _ => Locale::pt_BR,
        }
    }

    /// Read the API access token from the configured environment variable
    pub fn access_token(&self) -> Option<String> {
        std::env::var(&self.access_token_env)
            .ok()
            .filter(|token| !token.trim().is_empty())
    }
}
