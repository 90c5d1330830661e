// src/types/mod.rs
pub mod job_listing;

pub use job_listing::{JobListing, JobQuery, ListingDefaults, RawListing};
