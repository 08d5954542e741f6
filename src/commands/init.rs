//! Initialize a new blog directory

use anyhow::{bail, Result};
use std::fs;
use std::path::Path;

/// Starter configuration written by `init`
const DEFAULT_CONFIG: &str = r#"# spacetraveling configuration

# Site
title: spacetraveling
description: ''
language: pt-BR
timezone: America/Sao_Paulo
date_format: '%d de %B de %Y'

# Content API
api_endpoint: https://spacetraveling.cdn.prismic.io/api/v2
document_type: posts
# The token itself is read from this environment variable, never from this file
access_token_env: PRISMIC_ACCESS_TOKEN

# Listing
page_size: 1
paths_page_size: 100

# Post pages
words_per_minute: 200
fallback_wait_ms: 500

# Directory
public_dir: public
"#;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    let config_path = target_dir.join("_config.yml");
    if config_path.exists() {
        bail!("{:?} already exists", config_path);
    }

    fs::create_dir_all(target_dir)?;
    fs::write(&config_path, DEFAULT_CONFIG)?;
    tracing::debug!("Wrote {:?}", config_path);

    Ok(())
}
