//! Helper functions shared by the normalizer and templates

mod date;
mod html;

pub use date::*;
pub use html::*;
