//! Raw documents and query responses from the content API

use serde::{Deserialize, Deserializer, Serialize};

use super::richtext::RichField;

/// A post document exactly as the content API returns it
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(rename = "type", default)]
    pub doc_type: String,
    #[serde(default)]
    pub first_publication_date: Option<String>,
    #[serde(default)]
    pub last_publication_date: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: DocumentData,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: RichField,
    #[serde(default, deserialize_with = "null_as_default")]
    pub subtitle: RichField,
    #[serde(default, deserialize_with = "null_as_default")]
    pub author: RichField,
    #[serde(default)]
    pub banner: Option<RawBanner>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: Vec<RawSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawBanner {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub alt: Option<String>,
}

/// One heading/body group of a post's content
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawSection {
    #[serde(default, deserialize_with = "null_as_default")]
    pub heading: RichField,
    #[serde(default, deserialize_with = "null_as_default")]
    pub body: RichField,
}

/// Empty fields come back as `null`; treat them like missing keys
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One page of a document query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub results_per_page: u32,
    #[serde(default)]
    pub results_size: u32,
    #[serde(default)]
    pub total_results_size: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub next_page: Option<String>,
    #[serde(default)]
    pub prev_page: Option<String>,
    #[serde(default)]
    pub results: Vec<Document>,
}
