//! Content module - fetching documents and normalizing them into posts

pub mod client;
mod cursor;
mod document;
mod post;
pub mod richtext;

pub use client::{ContentClient, ContentSource};
pub use cursor::Cursor;
pub use document::{Document, DocumentData, QueryResponse, RawBanner, RawSection};
pub use post::{Banner, Normalizer, Post, PostData, PostSummary, Section, SummaryData};
pub use richtext::RichField;

#[cfg(test)]
pub(crate) mod fake;
