//! List posts available from the content API

use anyhow::{Context as _, Result};

use crate::content::{ContentSource, Normalizer};
use crate::pages::Listing;
use crate::Blog;

/// Print every post, following the API's pagination to the end
pub async fn run(blog: &Blog) -> Result<()> {
    let client = blog.client()?;
    let normalizer = Normalizer::from_config(&blog.config);
    let config = &blog.config;

    let response = client
        .query(&config.document_type, config.paths_page_size)
        .await
        .context("Failed to query posts")?;
    let mut listing = Listing::from_response(&normalizer, response);
    listing
        .load_all(&client, &normalizer)
        .await
        .context("Failed to fetch the remaining pages")?;

    let posts = listing.into_posts();
    println!("Posts ({}):", posts.len());
    for post in posts {
        println!(
            "  {} - {} [{}]",
            post.first_publication_date, post.data.title, post.uid
        );
    }

    Ok(())
}
