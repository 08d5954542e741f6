//! Page models - what the listing and detail views show

pub mod detail;
pub mod listing;

pub use detail::{reading_time, DetailView};
pub use listing::{Listing, ListingState};
