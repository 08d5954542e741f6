//! Generate static files

use anyhow::Result;

use crate::generator::Generator;
use crate::Blog;

/// Fetch every post from the content API and render the site
pub async fn run(blog: &Blog) -> Result<()> {
    let start = std::time::Instant::now();

    let client = blog.client()?;
    if blog.config.access_token().is_none() {
        tracing::warn!(
            "{} is not set; querying the content API without a token",
            blog.config.access_token_env
        );
    }

    let generator = Generator::new(blog)?;
    let stats = generator.generate(&client).await?;

    let duration = start.elapsed();
    tracing::info!(
        "Generated {} posts in {:.2}s",
        stats.posts,
        duration.as_secs_f64()
    );

    Ok(())
}
